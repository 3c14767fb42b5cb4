//! Interactive run session.
//!
//! A current-thread tokio runtime multiplexes the one-second interval,
//! stdin lines and the autosave deadline, so every operation on the app
//! runs to completion before the next input is looked at.

use std::io::Write;
use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use todotimer_core::timer::format_mm_ss;
use todotimer_core::{
    AutoSave, Config, Debouncer, Event, Heartbeat, JsonFileStore, RunStatus, SilentPlayer,
    Snapshot, SoundError, SoundObserver, SoundPlayer, StopReason, TodoTimer,
};

use super::session::{self, SessionCommand, HELP};
use super::{open_app, position_to_index, CliResult};

const TICK: Duration = Duration::from_secs(1);

#[derive(Args)]
pub struct RunArgs {
    /// Start immediately at this position (1-based)
    #[arg(long)]
    pub from: Option<usize>,
    /// Quit once the run-through finishes
    #[arg(long)]
    pub exit_when_done: bool,
}

/// Heartbeat state owned by the app. The session loop watches the
/// generation and rebuilds its interval whenever it changes, so a cancel
/// drops any tick the old interval still had pending.
#[derive(Debug, Default)]
struct SessionHeartbeat {
    armed: bool,
    generation: u64,
}

impl Heartbeat for SessionHeartbeat {
    fn arm(&mut self) {
        self.armed = true;
        self.generation += 1;
    }

    fn cancel(&mut self) {
        self.armed = false;
        self.generation += 1;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Rings the terminal bell.
struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play(&mut self) -> Result<(), SoundError> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| SoundError::Playback(e.to_string()))
    }
}

fn new_interval() -> Interval {
    let mut interval = interval_at(Instant::now() + TICK, TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
    interval
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn debounce_deadline(pending: bool, delay: Duration) {
    if pending {
        sleep(delay).await;
    } else {
        std::future::pending::<()>().await;
    }
}

fn status_line<H: Heartbeat>(app: &TodoTimer<H>) -> String {
    let snap = app.snapshot();
    let icon = match snap.status {
        RunStatus::Running => ">",
        RunStatus::Paused => "||",
        RunStatus::Idle => "-",
    };
    match (&snap.active_task, snap.active_index) {
        (Some(task), Some(index)) => format!(
            "[{icon}] {}/{} {}  {} / {}  repeat:{}",
            index + 1,
            snap.task_count,
            task.name,
            format_mm_ss(snap.total_secs - snap.remaining_secs.min(snap.total_secs)),
            format_mm_ss(snap.total_secs),
            snap.repeat_mode,
        ),
        _ => format!("[{icon}] idle  {} task(s)  repeat:{}", snap.task_count, snap.repeat_mode),
    }
}

fn render<H: Heartbeat>(app: &TodoTimer<H>) {
    print!("\r{}\x1b[K", status_line(app));
    let _ = std::io::stdout().flush();
}

fn print_tasks<H: Heartbeat>(app: &TodoTimer<H>) {
    println!();
    for (i, task) in app.tasks().iter().enumerate() {
        let marker = if app.engine().active_index() == Some(i) { "*" } else { " " };
        println!("{marker}{:>3}. {:<30} {:>4} min", i + 1, task.name, task.duration);
    }
}

/// Prints one line per transition worth telling the user about.
fn announce(event: &Event, snapshot: &Snapshot) {
    let message = match event {
        Event::TaskAdvanced { to_index, .. } => snapshot
            .active_task
            .as_ref()
            .map(|t| format!("next: {}. {}", to_index + 1, t.name)),
        Event::TimerStopped { reason, .. } => Some(match reason {
            StopReason::Finished => "all tasks done".to_string(),
            StopReason::ActiveTaskRemoved => "active task was removed; timer stopped".to_string(),
            StopReason::ListCleared => "task list cleared; timer stopped".to_string(),
            StopReason::ActiveTaskLost => "active task moved; timer stopped".to_string(),
            StopReason::User => "stopped".to_string(),
        }),
        _ => None,
    };
    if let Some(message) = message {
        println!("\r{message}\x1b[K");
    }
}

/// Apply one command. Returns `false` when the session should end.
fn apply<H: Heartbeat>(app: &mut TodoTimer<H>, cmd: SessionCommand) -> CliResult<bool> {
    match cmd {
        SessionCommand::Start(pos) => app.start(position_to_index(pos)?)?,
        SessionCommand::TogglePause => app.toggle_pause(),
        SessionCommand::Skip => app.skip(),
        SessionCommand::Stop => app.stop(),
        SessionCommand::Seek(pct) => app.seek(pct / 100.0),
        SessionCommand::ToggleRepeat => {
            app.toggle_repeat_mode();
        }
        SessionCommand::Add { name, duration } => {
            app.add_task(&name, duration)?;
        }
        SessionCommand::List => print_tasks(app),
        SessionCommand::Help => println!("\n{HELP}"),
        SessionCommand::Quit => return Ok(false),
    }
    Ok(true)
}

pub fn run(args: RunArgs) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(session_loop(args))
}

async fn session_loop(args: RunArgs) -> CliResult {
    let config = Config::load_or_default();
    let store = JsonFileStore::open_default()?;
    let mut app = open_app(&store, SessionHeartbeat::default())?;
    let mut autosave = AutoSave::new(store, Debouncer::new(config.debounce()));

    if config.sound.enabled {
        app.subscribe(Box::new(SoundObserver::new(TerminalBell)));
    } else {
        app.subscribe(Box::new(SoundObserver::new(SilentPlayer)));
    }
    app.subscribe(Box::new(announce));

    if let Some(pos) = args.from {
        app.start(position_to_index(pos)?)?;
    }
    println!("{HELP}");
    render(&app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval: Option<Interval> = None;
    let mut seen_generation = u64::MAX;
    let mut was_active = app.engine().status() != RunStatus::Idle;

    loop {
        let generation = app.heartbeat().generation;
        if generation != seen_generation {
            seen_generation = generation;
            interval = app.heartbeat().is_armed().then(new_interval);
            debug!(generation, armed = interval.is_some(), "heartbeat re-synced");
        }

        tokio::select! {
            _ = next_tick(&mut interval) => {
                app.tick();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed, ending session");
                    break;
                };
                match session::parse(&line) {
                    Ok(Some(cmd)) => match apply(&mut app, cmd) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => println!("\r{e}\x1b[K"),
                    },
                    Ok(None) => {}
                    Err(e) => println!("\r{e}\x1b[K"),
                }
            }
            _ = debounce_deadline(autosave.is_pending(), config.debounce()) => {}
        }

        autosave.poll(&mut app, std::time::Instant::now());
        render(&app);

        let active = app.engine().status() != RunStatus::Idle;
        if args.exit_when_done && was_active && !active {
            break;
        }
        was_active = active;
    }

    println!();
    autosave.flush(&mut app)?;
    Ok(())
}
