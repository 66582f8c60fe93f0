//! Generates a `.env` file with a unique Nominatim user agent.

use std::path::Path;

use trips_map_geocoder::config::USER_AGENT_ENV_VAR;

/// Prefix of generated user agents.
const USER_AGENT_PREFIX: &str = "trips_map";

/// Writes `NOMINATIM_USER_AGENT=trips_map_<uuid>` to `path`.
///
/// Returns the generated user agent.
///
/// # Errors
///
/// Returns an error if `path` exists and `force` is not set, or if the
/// write fails.
pub fn write(path: &Path, force: bool) -> Result<String, Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        )
        .into());
    }

    let user_agent = generate_user_agent();
    std::fs::write(path, render(&user_agent))?;

    Ok(user_agent)
}

fn generate_user_agent() -> String {
    format!("{USER_AGENT_PREFIX}_{}", uuid::Uuid::new_v4())
}

fn render(user_agent: &str) -> String {
    format!("{USER_AGENT_ENV_VAR}={user_agent}\n")
}
