//! Line commands understood by an interactive `run` session.

use todotimer_core::task::{parse_duration, validate_name};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Start the task at a 1-based position.
    Start(usize),
    TogglePause,
    Skip,
    Stop,
    /// Seek to a percentage (0..=100) of the active task.
    Seek(f64),
    ToggleRepeat,
    Add { name: String, duration: u32 },
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  n <pos>            start the task at position <pos>
  p                  pause / resume
  s                  skip to the next task
  x                  stop
  g <percent>        seek within the current task (0-100)
  r                  cycle repeat mode (off -> current -> all)
  a <minutes> <name> add a task
  l                  list tasks
  h                  this help
  q                  quit";

pub fn parse(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let cmd = match head {
        "n" | "start" => {
            let pos = rest
                .parse::<usize>()
                .map_err(|_| format!("expected a position, got '{rest}'"))?;
            if pos == 0 {
                return Err("positions start at 1".into());
            }
            SessionCommand::Start(pos)
        }
        "p" | "pause" | "resume" => SessionCommand::TogglePause,
        "s" | "skip" => SessionCommand::Skip,
        "x" | "stop" => SessionCommand::Stop,
        "g" | "seek" => {
            let pct = rest
                .trim_end_matches('%')
                .parse::<f64>()
                .map_err(|_| format!("expected a percentage, got '{rest}'"))?;
            SessionCommand::Seek(pct)
        }
        "r" | "repeat" => SessionCommand::ToggleRepeat,
        "a" | "add" => {
            let (minutes, name) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: a <minutes> <name>".to_string())?;
            let duration = parse_duration(minutes).map_err(|e| e.to_string())?;
            let name = validate_name(name).map_err(|e| e.to_string())?;
            SessionCommand::Add { name, duration }
        }
        "l" | "list" => SessionCommand::List,
        "h" | "help" | "?" => SessionCommand::Help,
        "q" | "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}' (h for help)")),
    };
    Ok(Some(cmd))
}
