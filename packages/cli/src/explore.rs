//! Interactive filter loop over one trips file.
//!
//! Mirrors the web front end: pick a year and companions, see the table
//! and stats, adjust, repeat. Coordinates looked up in one round are
//! reused by every later round.

use std::path::Path;
use std::time::Instant;

use dialoguer::{Confirm, Input, MultiSelect};
use trips_map_cli_utils::MultiProgress;
use trips_map_render::TripSession;
use trips_map_trip_models::{CompanionOption, TripFilter, YearBounds};

use crate::pipeline::{self, Workspace};

/// Runs the explore loop until the user is done.
///
/// A failed render (unknown country or city) is reported and the user
/// gets to pick different filters; it does not end the session.
///
/// # Errors
///
/// Returns an error if setup fails or a prompt cannot be shown.
#[allow(clippy::future_not_send)]
pub async fn run(
    file: &Path,
    outlines: &Path,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workspace = Workspace::open(outlines)?;
    let session = pipeline::load_session(file)?;

    if session.trips().is_empty() {
        println!("{} contains no trips.", file.display());
    }

    loop {
        let trip_filter = prompt_filter(&session)?;

        let start = Instant::now();
        match workspace.render(&session, &trip_filter, multi).await {
            Ok(view) => {
                pipeline::print_view(&view);
                log::debug!("Rendered in {:.1}s", start.elapsed().as_secs_f64());
            }
            Err(e) => {
                log::error!("{e}");
                println!("Could not render the map: {e}");
            }
        }

        let again = Confirm::new()
            .with_prompt("Change filters?")
            .default(true)
            .interact()?;
        if !again {
            return Ok(());
        }
    }
}

fn prompt_filter(session: &TripSession) -> Result<TripFilter, Box<dyn std::error::Error>> {
    let year = match session.year_bounds() {
        Some(bounds) => prompt_year(bounds)?,
        None => None,
    };

    let options = session.companion_options();
    let companions = if options.is_empty() {
        None
    } else {
        prompt_companions(&options)?
    };

    Ok(TripFilter { year, companions })
}

fn prompt_year(bounds: YearBounds) -> Result<Option<i64>, Box<dyn std::error::Error>> {
    let filter = Confirm::new()
        .with_prompt("Filter by year?")
        .default(false)
        .interact()?;
    if !filter {
        return Ok(None);
    }

    let year: i64 = Input::new()
        .with_prompt(format!("Year ({}-{})", bounds.min, bounds.max))
        .default(bounds.max)
        .validate_with(|year: &i64| check_year(bounds, *year))
        .interact_text()?;

    Ok(Some(year))
}

fn prompt_companions(
    options: &[CompanionOption],
) -> Result<Option<Vec<CompanionOption>>, Box<dyn std::error::Error>> {
    let filter = Confirm::new()
        .with_prompt("Filter by travel companion?")
        .default(false)
        .interact()?;
    if !filter {
        return Ok(None);
    }

    let labels: Vec<String> = options.iter().map(ToString::to_string).collect();
    let selected = MultiSelect::new()
        .with_prompt("Travel companions (space=toggle, a=all, enter=confirm)")
        .items(&labels)
        .max_length(20)
        .interact()?;

    Ok(Some(
        selected.into_iter().map(|i| options[i].clone()).collect(),
    ))
}

/// Accepts years within the file's range.
fn check_year(bounds: YearBounds, year: i64) -> Result<(), String> {
    if bounds.contains(year) {
        Ok(())
    } else {
        Err(format!(
            "Pick a year between {} and {}",
            bounds.min, bounds.max
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_years_within_bounds() {
        let bounds = YearBounds {
            min: 2019,
            max: 2022,
        };
        assert!(check_year(bounds, 2019).is_ok());
        assert!(check_year(bounds, 2022).is_ok());
        assert!(check_year(bounds, 2023).unwrap_err().contains("2019"));
    }

    #[test]
    fn handles_extreme_year_span() {
        let bounds = YearBounds {
            min: i64::MIN,
            max: i64::MAX,
        };
        assert!(check_year(bounds, i64::MIN).is_ok());
        assert!(check_year(bounds, 0).is_ok());
        assert!(check_year(bounds, i64::MAX).is_ok());
    }
}
