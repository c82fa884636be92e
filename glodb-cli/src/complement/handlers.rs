use anyhow::{Context, Result};
use clap::ArgMatches;

use glodb_core::SequencePool;
use glodb_query::{complement, complement_or_empty};

use crate::utils::{load_track, write_output};

pub fn run_complement(matches: &ArgMatches) -> Result<()> {
    let track = load_track(matches, "input")?;
    let cs_path = matches
        .get_one::<String>("chrom-sizes")
        .expect("--chrom-sizes is required");
    let sequences = SequencePool::try_from(cs_path.as_str())
        .with_context(|| format!("Failed to read chrom sizes from {}", cs_path))?;

    let result = if matches.get_flag("strict") {
        complement(&track, &sequences)?
    } else {
        complement_or_empty(&track, &sequences)
    };
    write_output(&result, matches.get_one::<String>("output"))
}
