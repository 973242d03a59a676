use std::hash::Hash;
use std::time::{Duration, Instant};

use indexmap::IndexMap;

#[derive(Debug, Clone)]
struct Pending {
    text: String,
    deadline: Instant,
}

/// Per-key text buffers that commit after a quiet period.
///
/// Each edit replaces the buffered text and restarts the key's timer. The
/// caller polls [`fire_due`](Self::fire_due) from its event loop and persists
/// whatever comes back. Keys are fired in the order they were first edited.
#[derive(Debug, Clone)]
pub struct DebouncedEdits<K> {
    window: Duration,
    pending: IndexMap<K, Pending>,
}

impl<K: Hash + Eq + Clone> DebouncedEdits<K> {
    pub fn new(window: Duration) -> Self {
        DebouncedEdits {
            window,
            pending: IndexMap::new(),
        }
    }

    pub fn edit(&mut self, key: K, text: String, now: Instant) {
        let deadline = now + self.window;
        match self.pending.get_mut(&key) {
            Some(entry) => {
                entry.text = text;
                entry.deadline = deadline;
            }
            None => {
                self.pending.insert(key, Pending { text, deadline });
            }
        }
    }

    /// Buffered text for `key`, if an edit is waiting to be committed
    pub fn text(&self, key: &K) -> Option<&str> {
        self.pending.get(key).map(|p| p.text.as_str())
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Earliest deadline among pending edits
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Remove and return every edit whose timer has run out.
    /// Empty text comes back as `None`.
    pub fn fire_due(&mut self, now: Instant) -> Vec<(K, Option<String>)> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(k, _)| k.clone())
            .collect();
        due.into_iter()
            .filter_map(|key| {
                self.pending
                    .shift_remove(&key)
                    .map(|p| (key, normalize(p.text)))
            })
            .collect()
    }

    /// Remove and return every pending edit regardless of its timer.
    pub fn flush_all(&mut self) -> Vec<(K, Option<String>)> {
        self.pending
            .drain(..)
            .map(|(key, p)| (key, normalize(p.text)))
            .collect()
    }

    /// Drop pending edits matching `pred` without committing them.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|k, _| !pred(k));
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }
}

fn normalize(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
