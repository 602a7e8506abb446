use std::path::Path;

use crate::{
    catalog::{Catalog, WorkRecord},
    cli::{
        CommandResult,
        formatting::{format_description, format_field, format_header, format_subheader},
    },
};

/// Lists every work with the parameters its players would get.
///
/// # Errors
/// Returns `CliError::ConfigError` if the catalog cannot be loaded.
pub(crate) fn execute(path: &Path) -> CommandResult {
    let catalog = Catalog::load(path)?;

    let mut output = format_header(&format!("{} works", catalog.len()));
    for work in catalog.works() {
        output.push('\n');
        output.push_str(&describe(work));
    }

    Ok(output)
}

fn describe(work: &WorkRecord) -> String {
    let preview = match work.preview_segment() {
        Some(segment) => format!(
            "{}s - {}s, {}{}",
            segment.start_offset_seconds,
            segment.end_offset_seconds,
            if segment.loop_playback { "loop" } else { "pause at end" },
            if segment.is_well_formed() { "" } else { " (end before start)" },
        ),
        None => String::from("still only"),
    };

    let background = match work.detail_background() {
        Some((_, start)) => format!("from {start}s, full length"),
        None => String::from("none"),
    };

    format!(
        "\n{} {}\n{}\n{}\n{}",
        format_subheader(&work.slug),
        format_description(&work.title),
        format_field(1, "source", work.source_id().unwrap_or("none")),
        format_field(1, "preview", preview),
        format_field(1, "detail background", background),
    )
}
