#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone binary for the accident dashboard host.
//!
//! Reads `dashboard.toml` and the environment, then serves the dashboard.

use accident_dashboard_config::DashboardConfig;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = DashboardConfig::load(None)?;
    accident_dashboard_server::run_server(config).await?;

    Ok(())
}
