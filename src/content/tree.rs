use std::collections::HashMap;

use crate::client::{ContentItem, ItemType};

/// Folders of a discovered subtree keyed by id.
///
/// Iteration follows discovery order so generated files are stable between
/// runs. The first folder registered under an id wins.
#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    folders: Vec<ContentItem>,
    positions: HashMap<String, usize>,
}

impl FolderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a folder; returns false when the id is already present
    pub fn insert(&mut self, folder: ContentItem) -> bool {
        if self.positions.contains_key(&folder.id) {
            return false;
        }

        self.positions.insert(folder.id.clone(), self.folders.len());
        self.folders.push(folder);
        true
    }

    /// Merge another index into this one, keeping existing entries
    pub fn merge(&mut self, other: FolderIndex) {
        for folder in other.folders {
            self.insert(folder);
        }
    }

    pub fn get(&self, id: &str) -> Option<&ContentItem> {
        self.positions.get(id).map(|&pos| &self.folders[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentItem> {
        self.folders.iter()
    }
}

/// Result of walking a folder subtree
#[derive(Debug, Clone, Default)]
pub struct ContentTree {
    pub folders: FolderIndex,
    /// Non-folder items in traversal order
    pub content: Vec<ContentItem>,
    /// (parent, child) folder links skipped because the child was already an ancestor
    pub cyclic_links: Vec<(String, String)>,
}

impl ContentTree {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.content.is_empty()
    }

    /// Non-folder items of one type
    pub fn content_of_type(&self, item_type: &ItemType) -> Vec<&ContentItem> {
        self.content
            .iter()
            .filter(|item| &item.item_type == item_type)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, name: &str) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            item_type: ItemType::Folder,
            name: name.to_string(),
            description: None,
            parent_id: String::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_first_seen_wins() {
        let mut index = FolderIndex::new();
        assert!(index.insert(folder("F1", "original")));
        assert!(!index.insert(folder("F1", "duplicate")));

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("F1").unwrap().name, "original");
    }

    #[test]
    fn test_merge_keeps_order_and_existing_entries() {
        let mut left = FolderIndex::new();
        left.insert(folder("A", "a"));
        left.insert(folder("B", "b"));

        let mut right = FolderIndex::new();
        right.insert(folder("B", "b-late"));
        right.insert(folder("C", "c"));

        left.merge(right);

        let ids: Vec<&str> = left.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(left.get("B").unwrap().name, "b");
    }
}
