//! Query cache keyed by query, invalidated by tag after mutations.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    tags: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct QueryCache<V> {
    entries: HashMap<String, Entry<V>>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).map(|e| e.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry and its tags.
    pub fn insert(&mut self, key: impl Into<String>, value: V, tags: &[&str]) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        );
    }

    /// Drops every entry carrying `tag`. Returns how many were dropped.
    pub fn invalidate_tag(&mut self, tag: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.tags.contains(tag));
        before - self.entries.len()
    }

    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache key of a board's task list.
pub fn board_tasks_key(board_id: &str) -> String {
    format!("board:{}:tasks", board_id)
}

/// Tag shared by every query that reads a board.
pub fn board_tag(board_id: &str) -> String {
    format!("board:{}", board_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidating_a_tag_only_drops_tagged_entries() {
        let mut cache = QueryCache::new();
        cache.insert("board:1:tasks", vec![1, 2], &["board:1"]);
        cache.insert("board:1:summary", vec![3], &["board:1", "boards"]);
        cache.insert("board:2:tasks", vec![4], &["board:2"]);

        assert_eq!(cache.invalidate_tag("board:1"), 2);
        assert_eq!(cache.get("board:1:tasks"), None);
        assert_eq!(cache.get("board:2:tasks"), Some(vec![4]));
        assert_eq!(cache.invalidate_tag("board:1"), 0);
    }

    #[test]
    fn reinserting_replaces_tags() {
        let mut cache = QueryCache::new();
        cache.insert("k", 1, &["a"]);
        cache.insert("k", 2, &["b"]);
        assert_eq!(cache.invalidate_tag("a"), 0);
        assert_eq!(cache.get("k"), Some(2));
        assert!(cache.invalidate("k"));
        assert!(cache.is_empty());
    }
}
