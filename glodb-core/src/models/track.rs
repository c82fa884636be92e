use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::ops::Bound;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TrackError};
use crate::models::interval::{Feature, Interval};
use crate::utils::{get_dynamic_reader, get_dynamic_reader_w_stdin, parse_bed3};

///
/// Track struct, a collection of intervals grouped by the sequence they
/// are anchored to. Each sequence holds a duplicate free set of intervals
/// sorted by (start, end).
///
#[derive(Clone, Debug, Default)]
pub struct Track {
    pub id: Option<String>,
    sources: BTreeMap<String, BTreeSet<Interval>>,
}

impl PartialEq for Track {
    /// Two tracks are equal when they hold the same intervals, whatever their ids.
    fn eq(&self, other: &Self) -> bool {
        self.sources == other.sources
    }
}

impl Eq for Track {}

impl TryFrom<&Path> for Track {
    type Error = TrackError;

    ///
    /// Create a new [Track] from a bed file.
    ///
    /// BED records are half-open, `[start, end)`; they are stored closed,
    /// as `[start, end - 1]`.
    ///
    /// # Arguments:
    /// - value: path to bed file on disk.
    fn try_from(value: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(value)?;
        let mut track = Track::from_bed_reader(reader, &value.display().to_string())?;

        track.id = value
            .file_name()
            .and_then(|f| f.to_str())
            .map(|f| f.split('.').next().unwrap_or(f).to_string());

        Ok(track)
    }
}

impl TryFrom<&str> for Track {
    type Error = TrackError;

    fn try_from(value: &str) -> Result<Self> {
        Track::try_from(Path::new(value))
    }
}

impl TryFrom<String> for Track {
    type Error = TrackError;

    fn try_from(value: String) -> Result<Self> {
        Track::try_from(Path::new(&value))
    }
}

impl TryFrom<PathBuf> for Track {
    type Error = TrackError;

    fn try_from(value: PathBuf) -> Result<Self> {
        Track::try_from(value.as_path())
    }
}

impl<S: Into<String>> FromIterator<(S, Interval)> for Track {
    fn from_iter<T: IntoIterator<Item = (S, Interval)>>(iter: T) -> Self {
        let mut track = Track::new();
        for (seq, interval) in iter {
            track.add(seq, interval);
        }
        track
    }
}

impl Track {
    ///
    /// Read BED records from `reader`. `source` names the input in errors.
    ///
    pub fn from_bed_reader<R: BufRead>(reader: R, source: &str) -> Result<Self> {
        let mut track = Track::new();
        let mut first_line = true;

        for line in reader.lines() {
            let line = line?;

            if line.trim().is_empty()
                || line.starts_with("browser")
                || line.starts_with("track")
                || line.starts_with('#')
            {
                continue;
            }

            let parsed = parse_bed3(&line);

            // column headers like `chr start end` without a leading #
            if first_line {
                first_line = false;
                if parsed.is_none() && line.split('\t').count() >= 3 {
                    continue;
                }
            }

            let (chr, start, end) =
                parsed.ok_or_else(|| TrackError::RegionParseError(line.clone()))?;
            if end <= start {
                return Err(TrackError::RegionParseError(format!(
                    "Zero or negative width region: {}",
                    line
                )));
            }
            track.add(chr, Interval { start, end: end - 1 });
        }

        if track.is_empty() {
            return Err(TrackError::EmptyTrack(source.to_string()));
        }
        Ok(track)
    }

    /// Read a BED file, or stdin when `path` is `-`.
    pub fn from_path_or_stdin(path: &str) -> Result<Self> {
        if path == "-" {
            let reader = get_dynamic_reader_w_stdin(path)?;
            Track::from_bed_reader(reader, "stdin")
        } else {
            Track::try_from(Path::new(path))
        }
    }

    pub fn new() -> Self {
        Track::default()
    }

    pub fn with_id<S: Into<String>>(id: S) -> Self {
        Track {
            id: Some(id.into()),
            sources: BTreeMap::new(),
        }
    }

    /// Total number of intervals across all sequences.
    pub fn count(&self) -> usize {
        self.sources.values().map(|s| s.len()).sum()
    }

    pub fn sequence_count(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.values().all(|s| s.is_empty())
    }

    pub fn by_sequence(&self) -> &BTreeMap<String, BTreeSet<Interval>> {
        &self.sources
    }

    pub fn intervals_on(&self, sequence: &str) -> Option<&BTreeSet<Interval>> {
        self.sources.get(sequence)
    }

    pub fn contains_sequence(&self, sequence: &str) -> bool {
        self.sources.contains_key(sequence)
    }

    pub fn sequences(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(|s| s.as_str())
    }

    pub fn contains(&self, sequence: &str, interval: &Interval) -> bool {
        self.sources
            .get(sequence)
            .is_some_and(|set| set.contains(interval))
    }

    ///
    /// Add an interval to the track. Returns `false` when an identical
    /// interval was already present on that sequence.
    ///
    pub fn add<S: Into<String>>(&mut self, sequence: S, interval: Interval) -> bool {
        self.sources
            .entry(sequence.into())
            .or_default()
            .insert(interval)
    }

    pub fn add_all<S, I>(&mut self, sequence: S, intervals: I)
    where
        S: Into<String>,
        I: IntoIterator<Item = Interval>,
    {
        let mut intervals = intervals.into_iter().peekable();
        if intervals.peek().is_none() {
            return;
        }
        self.sources
            .entry(sequence.into())
            .or_default()
            .extend(intervals);
    }

    /// Add every interval of `other` to this track.
    pub fn add_track(&mut self, other: &Track) {
        for (seq, intervals) in &other.sources {
            self.add_all(seq.as_str(), intervals.iter().copied());
        }
    }

    ///
    /// Install a whole per-sequence set. Empty sets are dropped so that no
    /// sequence is ever left without intervals.
    ///
    pub fn insert_sequence<S: Into<String>>(&mut self, sequence: S, intervals: BTreeSet<Interval>) {
        if intervals.is_empty() {
            return;
        }
        match self.sources.entry(sequence.into()) {
            Entry::Occupied(mut e) => e.get_mut().extend(intervals),
            Entry::Vacant(e) => {
                e.insert(intervals);
            }
        }
    }

    pub fn remove(&mut self, sequence: &str, interval: &Interval) -> bool {
        let Some(set) = self.sources.get_mut(sequence) else {
            return false;
        };
        let removed = set.remove(interval);
        if set.is_empty() {
            self.sources.remove(sequence);
        }
        removed
    }

    /// Swap the contents of the track for the given features, keeping the id.
    pub fn replace_contents<S, I>(&mut self, features: I)
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Interval)>,
    {
        self.sources.clear();
        for (seq, interval) in features {
            self.add(seq, interval);
        }
    }

    pub fn clear(&mut self) {
        self.sources.clear();
    }

    /// Drop sequences whose interval set became empty.
    pub(crate) fn prune(&mut self) {
        self.sources.retain(|_, set| !set.is_empty());
    }

    pub(crate) fn sources_mut(&mut self) -> &mut BTreeMap<String, BTreeSet<Interval>> {
        &mut self.sources
    }

    /// Iterate over all features, ordered by (sequence, start, end).
    pub fn iter(&self) -> impl Iterator<Item = Feature<'_>> {
        self.sources.iter().flat_map(|(seq, set)| {
            set.iter().map(move |interval| Feature {
                sequence: seq.as_str(),
                interval: *interval,
            })
        })
    }

    ///
    /// The feature that follows `position` in (sequence, start, end) order,
    /// or the first feature when `position` is `None`.
    ///
    /// This lets a cursor walk the track without holding a borrow on it.
    ///
    pub fn next_after(&self, position: Option<(&str, Interval)>) -> Option<Feature<'_>> {
        let Some((seq, interval)) = position else {
            return self.iter().next();
        };

        if let Some(set) = self.sources.get(seq) {
            if let Some(next) = set
                .range((Bound::Excluded(interval), Bound::Unbounded))
                .next()
            {
                return Some(Feature {
                    sequence: self.sources.get_key_value(seq)?.0.as_str(),
                    interval: *next,
                });
            }
        }

        self.sources
            .range::<str, _>((Bound::Excluded(seq), Bound::Unbounded))
            .find_map(|(s, set)| {
                set.iter().next().map(|i| Feature {
                    sequence: s.as_str(),
                    interval: *i,
                })
            })
    }

    /// Smallest start position over all sequences.
    pub fn min_position(&self) -> Option<u32> {
        self.sources
            .values()
            .filter_map(|set| set.first().map(|i| i.start))
            .min()
    }

    /// Largest end position over all sequences.
    pub fn max_position(&self) -> Option<u32> {
        self.sources
            .values()
            .filter_map(|set| set.iter().map(|i| i.end).max())
            .max()
    }

    ///
    /// BED lines for the track, converting back to half-open coordinates.
    ///
    pub fn as_bed_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|f| {
            format!(
                "{}\t{}\t{}",
                f.sequence,
                f.interval.start,
                f.interval.end as u64 + 1
            )
        })
    }

    ///
    /// Save the track as a bed file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn to_bed<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();
        if path.exists() {
            log::warn!("Bed file already exists. Overwriting existing file");
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = BufWriter::new(File::create(path)?);
        for line in self.as_bed_lines() {
            writeln!(file, "{}", line)?;
        }
        file.flush()
    }
}

/// The intervals of `set` ordered by descending end, then descending start.
pub fn sorted_by_end_desc(set: &BTreeSet<Interval>) -> Vec<Interval> {
    let mut intervals: Vec<Interval> = set.iter().copied().collect();
    intervals.sort_unstable_by(|a, b| b.end.cmp(&a.end).then(b.start.cmp(&a.start)));
    intervals
}

impl Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Track {} ({} features on {} sequences)",
            self.id.as_deref().unwrap_or("<unnamed>"),
            self.count(),
            self.sequence_count()
        )
    }
}
