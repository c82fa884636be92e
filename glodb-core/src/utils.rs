use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use fxhash::FxHashMap as HashMap;

use crate::errors::{Result, TrackError};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)
        .map_err(|e| TrackError::FileReadError(format!("{}: {}", path.display(), e)))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Get a reader for a file path, or stdin when the path is '-'
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> Result<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(std::io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

///
/// Read a two column `name<TAB>length` chrom.sizes file.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn get_chrom_sizes<T: AsRef<Path>>(path: T) -> Result<HashMap<String, u32>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut chrom_sizes: HashMap<String, u32> = HashMap::default();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (Some(name), Some(size)) = (parts.next(), parts.next()) else {
            return Err(TrackError::ChromSizesParseError(line));
        };
        let size = size
            .parse::<u32>()
            .map_err(|_| TrackError::ChromSizesParseError(line.clone()))?;

        chrom_sizes.insert(name.to_string(), size);
    }

    Ok(chrom_sizes)
}

/// Parse the first three columns of a BED line as `(chr, start, end)`.
pub fn parse_bed3(line: &str) -> Option<(&str, u32, u32)> {
    let mut fields = line.split('\t');
    let chr = fields.next()?;
    let start = fields.next()?.trim().parse::<u32>().ok()?;
    let end = fields.next()?.trim().parse::<u32>().ok()?;
    Some((chr, start, end))
}
