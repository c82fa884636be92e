use glodb_core::{Interval, SequencePool, Track};
use log::warn;

use crate::errors::{QueryError, Result};

///
/// The gaps left by `track` on each of its sequences, bounded by the
/// sequence length found in `sequences`. The track is coalesced first.
///
/// Sequences the track does not touch are not reported.
///
/// # Errors
/// - [QueryError::BoundsExceeded] when an interval ends at or past the
///   length of its sequence
/// - an unknown sequence error when a sequence has no registered length
pub fn complement(track: &Track, sequences: &SequencePool) -> Result<Track> {
    let merged = track.coalesced();
    let mut out = Track::new();

    for (seq, set) in merged.by_sequence() {
        let length = sequences.length_of(seq)?;
        let mut gaps = Vec::new();
        // first position not yet covered or reported
        let mut free = 0u64;

        for interval in set {
            if interval.end >= length {
                return Err(QueryError::BoundsExceeded {
                    sequence: seq.clone(),
                    end: interval.end,
                    length,
                });
            }
            if interval.start as u64 > free {
                gaps.push(Interval {
                    start: free as u32,
                    end: interval.start - 1,
                });
            }
            free = interval.end as u64 + 1;
        }

        if free < length as u64 {
            gaps.push(Interval {
                start: free as u32,
                end: length - 1,
            });
        }

        out.add_all(seq.as_str(), gaps);
    }

    Ok(out)
}

///
/// [complement], logging and returning an empty track when the track and
/// the sequence lengths disagree.
///
pub fn complement_or_empty(track: &Track, sequences: &SequencePool) -> Track {
    match complement(track, sequences) {
        Ok(gaps) => gaps,
        Err(e) => {
            warn!("Unable to negate {}: {}", track, e);
            Track::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glodb_core::TrackError;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn make_track(intervals: Vec<(&str, u32, u32)>) -> Track {
        intervals
            .into_iter()
            .map(|(seq, start, end)| (seq, Interval::new(start, end).unwrap()))
            .collect()
    }

    #[fixture]
    fn sequences() -> SequencePool {
        vec![("S", 40), ("T", 10)].into_iter().collect()
    }

    #[rstest]
    fn test_complement(sequences: SequencePool) {
        let track = make_track(vec![("S", 5, 9), ("S", 15, 19)]);
        assert_eq!(
            complement(&track, &sequences).unwrap(),
            make_track(vec![("S", 0, 4), ("S", 10, 14), ("S", 20, 39)])
        );
    }

    #[rstest]
    fn test_complement_merges_first(sequences: SequencePool) {
        let track = make_track(vec![("S", 0, 9), ("S", 5, 20), ("S", 21, 39), ("T", 3, 3)]);
        assert_eq!(
            complement(&track, &sequences).unwrap(),
            make_track(vec![("T", 0, 2), ("T", 4, 9)])
        );
    }

    #[rstest]
    fn test_complement_bounds_exceeded(sequences: SequencePool) {
        let track = make_track(vec![("S", 5, 9), ("S", 30, 40)]);
        assert!(matches!(
            complement(&track, &sequences),
            Err(QueryError::BoundsExceeded { end: 40, length: 40, .. })
        ));
        assert!(complement_or_empty(&track, &sequences).is_empty());
    }

    #[rstest]
    fn test_complement_unknown_sequence(sequences: SequencePool) {
        let track = make_track(vec![("chrX", 5, 9)]);
        assert!(matches!(
            complement(&track, &sequences),
            Err(QueryError::Track(TrackError::UnknownSequence(_)))
        ));
    }

    #[rstest]
    fn test_complement_twice_gives_coalesced(sequences: SequencePool) {
        let track = make_track(vec![("S", 5, 9), ("S", 8, 12), ("S", 30, 31)]);
        let twice = complement(&complement(&track, &sequences).unwrap(), &sequences).unwrap();
        assert_eq!(twice, track.coalesced());
    }
}
