use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::{
    catalog::Catalog,
    cli::{
        CliError, CommandResult, SimulateArgs,
        formatting::{format_field, format_header, format_subheader},
    },
    config::Config,
    page::{PageRuntime, page_surface},
    services::video::{
        ClockMode, EmbedPlayer, MemorySurface, PlaybackTarget, SimulatedEmbed, SimulationOptions,
    },
};

const LOAD_LATENCY: Duration = Duration::from_millis(250);
const READY_LATENCY: Duration = Duration::from_millis(150);

/// Runs a page against the simulated embed and reports its final state.
///
/// # Errors
/// Returns `CliError::InvalidArguments` for a work without a catalog or a
/// duration that is negative or too large, and `CliError::ConfigError` for
/// an unknown work.
pub(crate) async fn execute(config: Config, args: SimulateArgs) -> CommandResult {
    let run_for = Duration::try_from_secs_f64(args.seconds).map_err(|_| {
        CliError::InvalidArguments(format!(
            "--seconds must be a non-negative number of seconds, got {}",
            args.seconds
        ))
    })?;

    let work = match (&args.work, &args.catalog) {
        (Some(slug), Some(path)) => Some(Catalog::load(path)?.get(slug)?.clone()),
        (Some(_), None) => {
            return Err(CliError::InvalidArguments(String::from(
                "--work requires --catalog",
            )));
        }
        (None, _) => None,
    };

    let surface = Arc::new(
        page_surface(&config.mounts).map_err(|e| CliError::SimulationError(e.to_string()))?,
    );
    let embed = Arc::new(SimulatedEmbed::new(SimulationOptions {
        failed_loads: args.fail_loads,
        never_ready: args.never_ready,
        load_latency: LOAD_LATENCY,
        ready_latency: READY_LATENCY,
        autoplay_blocked: args.block_autoplay,
        clock: ClockMode::Realtime,
        ..SimulationOptions::default()
    }));

    let page = PageRuntime::new(config, embed.clone(), surface.clone());
    page.start().await;

    if let Some(work) = &work {
        info!(slug = %work.slug, "Opening work in simulation");
        page.open_work(work).await;
    }

    tokio::time::sleep(run_for).await;

    if args.close {
        page.close_work().await;
    }

    let mut lines = report(&page, &embed, &surface).await;

    page.shutdown().await;
    lines.push(String::new());
    lines.push(format_field(
        0,
        "live players after shutdown",
        embed.live_players().len(),
    ));

    Ok(lines.join("\n"))
}

async fn report(
    page: &PageRuntime,
    embed: &SimulatedEmbed,
    surface: &MemorySurface,
) -> Vec<String> {
    let mut lines = vec![format_header("Simulation report")];

    let gate = page.gate().state();
    lines.extend([
        String::new(),
        format_subheader("readiness"),
        format_field(1, "ready", gate.is_ready),
        format_field(1, "load attempts", gate.attempts),
        format_field(
            1,
            "retries",
            format!("{}/{}", gate.retry_count, gate.max_retries),
        ),
        format_field(1, "fallback", gate.fallback_applied),
    ]);

    let background = page.background();
    for target in PlaybackTarget::ALL {
        let state = background.slot_state(target).await;
        lines.extend([
            String::new(),
            format_subheader(&format!("{target} background")),
            format_field(1, "state", format!("{state:?}")),
        ]);
        if let Some(source_id) = background.source_id(target).await {
            lines.push(format_field(1, "source", source_id));
        }
    }

    let preview = page.preview().state();
    lines.extend([
        String::new(),
        format_subheader("preview"),
        format_field(1, "source", preview.source_id().unwrap_or("none")),
        format_field(1, "playing", preview.is_playing),
        format_field(1, "muted", preview.is_muted),
        format_field(1, "monitoring", page.preview().is_monitoring().await),
    ]);

    let live = embed.live_players();
    lines.extend([
        String::new(),
        format_subheader("players"),
        format_field(1, "live", live.len()),
    ]);
    for player in &live {
        let position = player
            .current_time()
            .map(|seconds| format!("{seconds:.1}s"))
            .unwrap_or_else(|e| e.to_string());
        lines.push(format_field(
            2,
            player.mount().as_str(),
            format!("{} {} at {position}", player.options().source_id, player.state()),
        ));
    }

    lines.extend([String::new(), format_subheader("surface")]);
    for id in surface.element_ids() {
        let Some(element) = surface.element(&id) else {
            continue;
        };
        let mut notes = Vec::new();
        if let Some(fill) = &element.background {
            notes.push(format!("background {fill}"));
        }
        if !element.flags.is_empty() {
            notes.push(format!("{:?}", element.flags));
        }
        notes.push(format!("{:?}", element.visibility));
        lines.push(format_field(1, id.as_str(), notes.join(", ")));
    }

    lines
}
