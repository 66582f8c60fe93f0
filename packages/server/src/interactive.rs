//! Interactive mode for the server.
//!
//! Prompts the user for bind address, port, and outline asset before
//! starting the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::{ServerConfig, StartupError};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Defaults for each prompt come from [`ServerConfig::from_env`].
///
/// # Errors
///
/// Returns [`StartupError`] if the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> Result<(), StartupError> {
    println!("Trips Map Server");
    println!();

    let defaults = ServerConfig::from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let outlines: String = Input::new()
        .with_prompt("Country outlines (GeoJSON)")
        .default(defaults.outlines_path.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| defaults.outlines_path.display().to_string());

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerConfig {
        bind_addr,
        port,
        outlines_path: PathBuf::from(outlines),
    })
    .await
}
