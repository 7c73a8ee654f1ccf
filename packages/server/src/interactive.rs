//! Interactive mode for the dashboard host.
//!
//! Prompts for the bind address, port, and default dataset before
//! starting the server.

use std::path::PathBuf;

use accident_dashboard_config::DashboardConfig;
use dialoguer::{Confirm, Input};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Each prompt defaults to the value already in `config`. Answers override
/// it before delegating to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(mut config: DashboardConfig) -> std::io::Result<()> {
    println!("{}", config.title);
    println!();

    config.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(config.bind_addr.clone())
        .interact_text()
        .unwrap_or(config.bind_addr);

    config.port = Input::new()
        .with_prompt("Port")
        .default(config.port)
        .interact_text()
        .unwrap_or(config.port);

    let dataset: String = Input::new()
        .with_prompt("Default dataset")
        .default(config.default_dataset.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| config.default_dataset.display().to_string());
    config.default_dataset = PathBuf::from(dataset);

    if !config.default_dataset.is_file() {
        log::warn!(
            "{} does not exist yet; the dashboard will fail until it does or a file is uploaded",
            config.default_dataset.display()
        );
    }

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{}?",
            config.bind_addr, config.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}
