//! Task management commands for CLI.

use clap::Subcommand;
use todotimer_core::task::{parse_duration, validate_name};
use todotimer_core::{Config, TaskUpdate, ValidationError};

use super::{position_to_index, resolve_id, with_app, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of the list
    Add {
        /// Task name
        name: String,
        /// Duration in whole minutes (default: defaults.duration_min)
        #[arg(allow_negative_numbers = true)]
        duration: Option<String>,
    },
    /// List tasks in run order
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename a task or change its duration
    Update {
        /// Task ID (or unique prefix)
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New duration in minutes
        #[arg(long, allow_negative_numbers = true)]
        duration: Option<String>,
    },
    /// Delete a task
    Remove {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// Move a task to another position (1-based)
    Move {
        from: usize,
        to: usize,
    },
    /// Delete every task
    Clear,
}

/// Render a validation error the way a form shows it next to the field.
fn field_error(e: ValidationError) -> Box<dyn std::error::Error> {
    format!("{}: {e}", e.field()).into()
}

pub fn run(action: TaskAction) -> CliResult {
    match action {
        TaskAction::Add { name, duration } => {
            let name = validate_name(&name).map_err(field_error)?;
            let duration = match duration {
                Some(d) => parse_duration(&d).map_err(field_error)?,
                None => Config::load_or_default().defaults.duration_min,
            };
            with_app(|app| {
                let task = app.add_task(&name, duration).map_err(field_error)?;
                println!("Task created: {}", task.id);
                println!("{}", serde_json::to_string_pretty(&task)?);
                Ok(())
            })
        }
        TaskAction::List { json } => with_app(|app| {
            if json {
                println!("{}", serde_json::to_string_pretty(app.tasks())?);
                return Ok(());
            }
            if app.tasks().is_empty() {
                println!("No tasks.");
                return Ok(());
            }
            for (i, task) in app.tasks().iter().enumerate() {
                println!("{:>3}. {:<30} {:>4} min  {}", i + 1, task.name, task.duration, task.id);
            }
            println!("repeat: {}", app.engine().repeat_mode());
            Ok(())
        }),
        TaskAction::Update { id, name, duration } => {
            let update = TaskUpdate {
                name: name.map(|n| validate_name(&n)).transpose().map_err(field_error)?,
                duration: duration
                    .map(|d| parse_duration(&d))
                    .transpose()
                    .map_err(field_error)?,
            };
            if update.is_empty() {
                return Err("nothing to update (use --name and/or --duration)".into());
            }
            with_app(|app| {
                let id = resolve_id(app.tasks(), &id)?;
                app.update_task(&id, update).map_err(field_error)?;
                if let Some(task) = app.tasks().get(&id) {
                    println!("{}", serde_json::to_string_pretty(task)?);
                }
                Ok(())
            })
        }
        TaskAction::Remove { id } => with_app(|app| {
            let id = resolve_id(app.tasks(), &id)?;
            app.remove_task(&id);
            println!("Task deleted: {id}");
            Ok(())
        }),
        TaskAction::Move { from, to } => with_app(|app| {
            app.reorder_tasks(position_to_index(from)?, position_to_index(to)?)?;
            for (i, task) in app.tasks().iter().enumerate() {
                println!("{:>3}. {}", i + 1, task.name);
            }
            Ok(())
        }),
        TaskAction::Clear => with_app(|app| {
            let count = app.tasks().len();
            app.clear_tasks();
            println!("Deleted {count} task(s)");
            Ok(())
        }),
    }
}
