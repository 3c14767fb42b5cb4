use clap::Args;
use serde::Serialize;
use todotimer_core::{Config, Snapshot, WindowSize};

use super::{with_app, CliResult};

#[derive(Args)]
pub struct StatusArgs {
    /// Screen height used to size the window
    #[arg(long, default_value_t = 1080)]
    pub screen_height: u32,
    /// Size for the compact view
    #[arg(long)]
    pub compact: bool,
}

#[derive(Serialize)]
struct StatusView {
    #[serde(flatten)]
    snapshot: Snapshot,
    window: WindowSize,
}

/// Outside a `run` session the timer is always idle; this shows what a
/// session would start from and the window size a front end would request.
pub fn run(args: StatusArgs) -> CliResult {
    let layout = Config::load_or_default().layout();
    with_app(|app| {
        let snapshot = app.snapshot();
        let window = layout.target(snapshot.task_count, args.compact, args.screen_height);
        let view = StatusView { snapshot, window };
        println!("{}", serde_json::to_string_pretty(&view)?);
        Ok(())
    })
}
