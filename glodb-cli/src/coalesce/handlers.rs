use anyhow::Result;
use clap::ArgMatches;

use crate::utils::{load_track, write_output};

pub fn run_coalesce(matches: &ArgMatches) -> Result<()> {
    let track = load_track(matches, "input")?;
    write_output(&track.coalesced(), matches.get_one::<String>("output"))
}
