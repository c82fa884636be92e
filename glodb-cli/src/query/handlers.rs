use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use glodb_query::QueryPlan;

use crate::utils::write_output;

pub fn run_query(matches: &ArgMatches) -> Result<()> {
    let plan_path = matches
        .get_one::<String>("plan")
        .expect("--plan is required");
    let plan = QueryPlan::try_from(std::path::Path::new(plan_path))
        .with_context(|| format!("Failed to read query plan {}", plan_path))?;

    let result = plan.run().context("Query evaluation failed")?;
    info!("{}", result);

    write_output(&result, matches.get_one::<String>("output"))
}
