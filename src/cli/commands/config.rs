use crate::{
    cli::{CliError, CommandResult},
    config::Config,
};

/// Prints the effective configuration as TOML, or its JSON schema.
///
/// # Errors
/// Returns `CliError::SerializationError` if the output cannot be produced.
pub(crate) fn execute(config: &Config, schema: bool) -> CommandResult {
    if schema {
        let schema = schemars::schema_for!(Config);
        return serde_json::to_string_pretty(&schema)
            .map_err(|e| CliError::SerializationError(e.to_string()));
    }

    Ok(config.to_toml_string()?)
}
