use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use glodb_core::Track;

/// Read the BED file passed as argument `id`, `-` reading from stdin.
pub fn load_track(matches: &ArgMatches, id: &str) -> Result<Track> {
    let path = matches
        .get_one::<String>(id)
        .unwrap_or_else(|| panic!("{} is required", id));
    Track::from_path_or_stdin(path).with_context(|| format!("Failed to load BED file {}", path))
}

/// Write `track` as BED to `output`, or to stdout without one.
pub fn write_output(track: &Track, output: Option<&String>) -> Result<()> {
    match output {
        Some(p) => {
            track
                .to_bed(Path::new(p))
                .with_context(|| format!("Failed to write output to {}", p))?;
            info!("{} written to {}", track, p);
        }
        None => {
            let stdout = io::stdout();
            write_bed(track, &mut stdout.lock())?;
        }
    }
    Ok(())
}

fn write_bed<W: Write>(track: &Track, out: &mut W) -> Result<()> {
    for line in track.as_bed_lines() {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}
