//! Command-line report: load a visit CSV, render the unfiltered views and
//! print them as JSON for inspection.

use anyhow::{Context, Result};
use visit_insights::{DashboardConfig, FilterSelection, Session};

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: report <visits.csv>")?;

    let session = Session::from_path(&path, DashboardConfig::default())
        .with_context(|| format!("Failed to load visit data from {path}"))?;

    let options = session.options();
    log::info!(
        "Filter options: age bounds {:?}, {} genders, {} diagnoses",
        options.age_bounds,
        options.genders.len(),
        options.diagnoses.len()
    );

    let views = session.render(&FilterSelection::default())?;
    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}
