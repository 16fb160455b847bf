// File: services/eventify_backend/src/main.rs
mod app_state;
mod commands;

use app_state::AppState;
use eventify_common::{config_error, logging, EventifyError};
use eventify_config::load_config;
use std::process::ExitCode;

fn try_main() -> Result<String, EventifyError> {
    let config = load_config().map_err(config_error)?;
    logging::init_from_config(&config.logging);

    let command = commands::parse_args(std::env::args().skip(1))?;
    let state = AppState::new(config)?;
    commands::run(&state, command)
}

fn main() -> ExitCode {
    match logging::log_result(try_main(), "Command finished", "Command failed") {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
