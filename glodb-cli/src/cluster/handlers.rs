use anyhow::Result;
use clap::ArgMatches;

use crate::utils::{load_track, write_output};

pub fn run_cluster(matches: &ArgMatches) -> Result<()> {
    let track = load_track(matches, "input")?;
    let max_space = *matches
        .get_one::<u32>("max-space")
        .expect("--max-space is required");
    let threshold = *matches
        .get_one::<usize>("threshold")
        .expect("--threshold has a default");

    write_output(
        &track.cluster(max_space, threshold),
        matches.get_one::<String>("output"),
    )
}
