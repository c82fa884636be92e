use std::path::Path;

use fxhash::FxHashMap as HashMap;

use crate::errors::{Result, TrackError};
use crate::utils::get_chrom_sizes;

///
/// A named coordinate space, e.g. a chromosome. Valid positions run
/// from 0 to `length - 1`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Sequence {
    pub id: String,
    pub length: u32,
}

impl Sequence {
    pub fn new<S: Into<String>>(id: S, length: u32) -> Self {
        Sequence {
            id: id.into(),
            length,
        }
    }

    pub fn length(&self) -> u32 {
        self.length
    }
}

///
/// Registry of the sequences known to a session, keyed by id.
///
#[derive(Debug, Clone, Default)]
pub struct SequencePool {
    sequences: HashMap<String, Sequence>,
}

impl TryFrom<&Path> for SequencePool {
    type Error = TrackError;

    /// Build the pool from a chrom.sizes file.
    fn try_from(value: &Path) -> Result<Self> {
        let sizes = get_chrom_sizes(value)?;
        Ok(sizes.into_iter().collect())
    }
}

impl TryFrom<&str> for SequencePool {
    type Error = TrackError;

    fn try_from(value: &str) -> Result<Self> {
        SequencePool::try_from(Path::new(value))
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for SequencePool {
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        let mut pool = SequencePool::new();
        for (id, length) in iter {
            pool.add(Sequence::new(id, length));
        }
        pool
    }
}

impl SequencePool {
    pub fn new() -> Self {
        SequencePool::default()
    }

    /// Add a sequence, replacing any previous sequence with that id.
    pub fn add(&mut self, sequence: Sequence) -> Option<Sequence> {
        self.sequences.insert(sequence.id.clone(), sequence)
    }

    pub fn get(&self, id: &str) -> Option<&Sequence> {
        self.sequences.get(id)
    }

    pub fn length_of(&self, id: &str) -> Result<u32> {
        self.get(id)
            .map(|s| s.length())
            .ok_or_else(|| TrackError::UnknownSequence(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sequences.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::path::PathBuf;

    #[rstest]
    fn test_pool_from_chrom_sizes() {
        let path = PathBuf::from("../tests/data/tracks/test.chrom.sizes");
        let pool = SequencePool::try_from(path.as_path()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.length_of("S").unwrap(), 40);
        assert_eq!(pool.get("T").map(|s| s.length()), Some(100));
    }

    #[rstest]
    fn test_unknown_sequence() {
        let pool: SequencePool = vec![("S", 40)].into_iter().collect();
        assert!(matches!(
            pool.length_of("chrX"),
            Err(TrackError::UnknownSequence(_))
        ));
    }

    #[rstest]
    fn test_add_replaces() {
        let mut pool = SequencePool::new();
        assert!(pool.add(Sequence::new("S", 10)).is_none());
        assert_eq!(pool.add(Sequence::new("S", 40)), Some(Sequence::new("S", 10)));
        assert_eq!(pool.length_of("S").unwrap(), 40);
    }
}
