use todotimer_core::RepeatMode;

use super::{with_app, CliResult};

pub fn run(mode: Option<RepeatMode>) -> CliResult {
    with_app(|app| {
        let mode = match mode {
            Some(mode) => {
                app.set_repeat_mode(mode);
                mode
            }
            None => app.toggle_repeat_mode(),
        };
        println!("repeat: {mode}");
        Ok(())
    })
}
