use fxhash::FxHashMap as HashMap;
use log::warn;

use crate::errors::{Result, TrackError};
use crate::models::Track;

///
/// Registry of named tracks. Ids are unique; inserting under an id that
/// is taken fails unless the caller asks for a replacement or a generated id.
///
#[derive(Debug, Clone, Default)]
pub struct TrackPool {
    tracks: HashMap<String, Track>,
    generated: u64,
}

impl TrackPool {
    pub fn new() -> Self {
        TrackPool::default()
    }

    ///
    /// Register `track` under `id`.
    ///
    /// # Errors
    /// [TrackError::DuplicateId] when `id` is already registered.
    pub fn insert(&mut self, id: &str, mut track: Track) -> Result<()> {
        if self.tracks.contains_key(id) {
            return Err(TrackError::DuplicateId(id.to_string()));
        }
        track.id = Some(id.to_string());
        self.tracks.insert(id.to_string(), track);
        Ok(())
    }

    /// Register `track` under `id`, overwriting any existing track.
    pub fn replace(&mut self, id: &str, mut track: Track) -> Option<Track> {
        if self.tracks.contains_key(id) {
            warn!("Track \"{}\" already existed and has been overwritten.", id);
        }
        track.id = Some(id.to_string());
        self.tracks.insert(id.to_string(), track)
    }

    ///
    /// Register `track` under `id`, or under a generated `_<id>_<n>` id when
    /// `id` is taken. Returns the id used.
    ///
    pub fn insert_or_rename(&mut self, id: &str, mut track: Track) -> String {
        let mut new_id = id.to_string();
        while self.tracks.contains_key(&new_id) {
            self.generated += 1;
            new_id = format!("_{}_{}", id, self.generated);
        }
        // the id is free at this point
        track.id = Some(new_id.clone());
        self.tracks.insert(new_id.clone(), track);
        new_id
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Track> {
        self.tracks.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tracks.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.tracks.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interval;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn track() -> Track {
        vec![("chr1", Interval::new(0, 9).unwrap())]
            .into_iter()
            .collect()
    }

    #[rstest]
    fn test_insert_duplicate(track: Track) {
        let mut pool = TrackPool::new();
        pool.insert("t1", track.clone()).unwrap();
        assert!(matches!(
            pool.insert("t1", track),
            Err(TrackError::DuplicateId(id)) if id == "t1"
        ));
        assert_eq!(pool.get("t1").unwrap().id.as_deref(), Some("t1"));
    }

    #[rstest]
    fn test_replace(track: Track) {
        let mut pool = TrackPool::new();
        assert!(pool.replace("t1", track.clone()).is_none());
        assert!(pool.replace("t1", Track::new()).is_some());
        assert!(pool.get("t1").unwrap().is_empty());
    }

    #[rstest]
    fn test_insert_or_rename(track: Track) {
        let mut pool = TrackPool::new();
        assert_eq!(pool.insert_or_rename("t1", track.clone()), "t1");
        assert_eq!(pool.insert_or_rename("t1", track.clone()), "_t1_1");
        assert_eq!(pool.insert_or_rename("t1", track), "_t1_2");
        assert_eq!(pool.ids(), vec!["_t1_1", "_t1_2", "t1"]);
        assert_eq!(pool.get("_t1_2").unwrap().id.as_deref(), Some("_t1_2"));
    }

    #[rstest]
    fn test_insert_or_rename_keeps_intervals(track: Track) {
        let mut named = track.clone();
        named.id = Some("original".to_string());
        let mut pool = TrackPool::new();
        pool.insert("t1", Track::new()).unwrap();

        let id = pool.insert_or_rename("t1", named);
        let stored = pool.get(&id).unwrap();
        assert_eq!(stored, &track);
        assert_eq!(stored.id.as_deref(), Some("_t1_1"));
        assert!(pool.get("t1").unwrap().is_empty());
    }
}
