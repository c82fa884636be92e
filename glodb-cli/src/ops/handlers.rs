use anyhow::{Context, Result};
use clap::ArgMatches;
use log::debug;

use glodb_query::{Operator, Spacing, apply};

use crate::utils::{load_track, write_output};

pub fn run_ops(matches: &ArgMatches) -> Result<()> {
    let operator: Operator = matches
        .get_one::<String>("operator")
        .expect("--operator is required")
        .parse()
        .context("Invalid --operator")?;

    let min_pos = *matches
        .get_one::<i64>("min-pos")
        .expect("--min-pos has a default");
    // a single bound means an exact gap
    let max_pos = matches.get_one::<i64>("max-pos").copied().unwrap_or(min_pos);
    let spacing = Spacing::new(min_pos, max_pos);

    let left = load_track(matches, "BED_A")?;
    let right = load_track(matches, "BED_B")?;
    debug!("{} {} {}", left, operator, right);

    let result = apply(&left, operator, &right, &spacing);
    write_output(&result, matches.get_one::<String>("output"))
}
