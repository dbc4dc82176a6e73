use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

/// How long an un-downloaded image stays retrievable.
pub const DEFAULT_BLOB_TTL: Duration = Duration::from_secs(10 * 60);

/// One generated image waiting to be downloaded.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub id:         String,
    pub content:    Vec<u8>,
    pub filename:   String,
    pub created_at: Instant,
}

/// In-memory, single-use handles for generated images.
///
/// Every entry can be taken at most once and disappears after the TTL even
/// if nobody asked for it. All operations go through one mutex, so a
/// `take_once` racing with another `take_once` or with a sweep yields the
/// content to exactly one of them.
pub struct BlobStore {
    ttl:     Duration,
    entries: Mutex<HashMap<String, StoredBlob>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_BLOB_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        BlobStore { ttl, entries: Mutex::new(HashMap::new()) }
    }

    /// Stores `content` under a fresh random id and returns the id.
    pub fn put(&self, content: Vec<u8>, filename: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        let blob = StoredBlob {
            id:         id.clone(),
            content,
            filename:   filename.into(),
            created_at: Instant::now(),
        };
        self.lock().insert(id.clone(), blob);
        id
    }

    /// Removes and returns the entry for `id`.
    ///
    /// Returns `None` for unknown ids, ids that were already taken, and
    /// entries past their TTL that the sweeper has not reached yet.
    pub fn take_once(&self, id: &str) -> Option<StoredBlob> {
        let blob = self.lock().remove(id)?;
        if blob.created_at.elapsed() >= self.ttl {
            return None;
        }
        Some(blob)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, blob| blob.created_at.elapsed() < ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredBlob>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;

    #[test]
    fn take_once_yields_content_exactly_once() {
        let store = BlobStore::new();
        let id = store.put(vec![1, 2, 3], "shoe.jpg");

        let blob = store.take_once(&id).expect("first take succeeds");
        assert_eq!(blob.content, vec![1, 2, 3]);
        assert_eq!(blob.filename, "shoe.jpg");
        assert_eq!(blob.id, id);

        assert!(store.take_once(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_unique_uuids() {
        let store = BlobStore::new();
        let a = store.put(vec![0], "a.jpg");
        let b = store.put(vec![0], "a.jpg");
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unknown_id_is_absent() {
        let store = BlobStore::new();
        assert!(store.take_once("not-a-real-id").is_none());
    }

    #[test]
    fn expired_entry_is_absent_even_before_sweep() {
        let store = BlobStore::with_ttl(Duration::from_millis(20));
        let id = store.put(vec![9], "late.jpg");
        thread::sleep(Duration::from_millis(40));
        assert!(store.take_once(&id).is_none());
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let store = BlobStore::with_ttl(Duration::from_millis(50));
        store.put(vec![1], "old.jpg");
        thread::sleep(Duration::from_millis(80));
        let fresh = store.put(vec![2], "new.jpg");

        assert_eq!(store.sweep_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.take_once(&fresh).is_some());
    }

    #[test]
    fn concurrent_takes_have_one_winner() {
        let store = Arc::new(BlobStore::new());
        let id = store.put(vec![7; 64], "race.jpg");
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let id = id.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    store.take_once(&id).is_some()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
