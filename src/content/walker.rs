use std::collections::HashSet;

use super::tree::ContentTree;
use crate::client::{ContentClient, ContentItem};
use crate::error::ExportResult;

/// Anything that can resolve a folder id to the folder and its direct children
pub trait FolderSource {
    fn get_folder(&self, folder_id: &str) -> ExportResult<ContentItem>;
}

impl FolderSource for ContentClient {
    fn get_folder(&self, folder_id: &str) -> ExportResult<ContentItem> {
        ContentClient::get_folder(self, folder_id)
    }
}

/// Recursively discovers a folder subtree
pub struct ContentWalker<'a> {
    source: &'a dyn FolderSource,
}

impl<'a> ContentWalker<'a> {
    pub fn new(source: &'a dyn FolderSource) -> Self {
        Self { source }
    }

    /// Walk the subtree rooted at `root_folder_id`.
    ///
    /// A root that is not a folder yields an empty tree. Folder links that
    /// point back to an ancestor are recorded in `cyclic_links` and not
    /// followed; a folder reachable twice is only walked the first time.
    pub fn discover(&self, root_folder_id: &str) -> ExportResult<ContentTree> {
        let mut ancestors = HashSet::new();
        let mut visited = HashSet::new();
        self.walk(root_folder_id, &mut ancestors, &mut visited)
    }

    fn walk(
        &self,
        folder_id: &str,
        ancestors: &mut HashSet<String>,
        visited: &mut HashSet<String>,
    ) -> ExportResult<ContentTree> {
        let mut tree = ContentTree::default();
        let folder = self.source.get_folder(folder_id)?;

        if !folder.is_folder() {
            return Ok(tree);
        }

        ancestors.insert(folder.id.clone());
        visited.insert(folder.id.clone());
        let children = folder.children.clone();
        let parent_id = folder.id.clone();
        tree.folders.insert(folder);

        for child in children {
            if !child.is_folder() {
                tree.content.push(child);
                continue;
            }

            if ancestors.contains(&child.id) {
                tree.cyclic_links.push((parent_id.clone(), child.id.clone()));
                continue;
            }

            if visited.contains(&child.id) {
                continue;
            }

            let subtree = self.walk(&child.id, ancestors, visited)?;
            tree.folders.merge(subtree.folders);
            tree.content.extend(subtree.content);
            tree.cyclic_links.extend(subtree.cyclic_links);
        }

        ancestors.remove(&parent_id);
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ItemType;
    use crate::error::ExportError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct StaticSource {
        folders: HashMap<String, ContentItem>,
        fetched: RefCell<Vec<String>>,
    }

    impl FolderSource for StaticSource {
        fn get_folder(&self, folder_id: &str) -> ExportResult<ContentItem> {
            self.fetched.borrow_mut().push(folder_id.to_string());
            self.folders
                .get(folder_id)
                .cloned()
                .ok_or_else(|| ExportError::NotFound {
                    id: folder_id.to_string(),
                })
        }
    }

    fn item(id: &str, item_type: ItemType, parent: &str) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            item_type,
            name: format!("name-{}", id),
            description: None,
            parent_id: parent.to_string(),
            children: Vec::new(),
        }
    }

    fn folder(id: &str, parent: &str, children: Vec<ContentItem>) -> ContentItem {
        ContentItem {
            children,
            ..item(id, ItemType::Folder, parent)
        }
    }

    fn source(folders: Vec<ContentItem>) -> StaticSource {
        StaticSource {
            folders: folders.into_iter().map(|f| (f.id.clone(), f)).collect(),
            fetched: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_discover_partitions_folders_and_content() {
        let source = source(vec![
            folder(
                "F1",
                "P",
                vec![
                    item("D1", ItemType::Dashboard, "F1"),
                    item("F2", ItemType::Folder, "F1"),
                    item("S1", ItemType::Search, "F1"),
                ],
            ),
            folder(
                "F2",
                "F1",
                vec![
                    item("S2", ItemType::Search, "F2"),
                    item("F3", ItemType::Folder, "F2"),
                ],
            ),
            folder("F3", "F2", vec![item("D2", ItemType::Dashboard, "F3")]),
        ]);

        let tree = ContentWalker::new(&source).discover("F1").unwrap();

        let folder_ids: Vec<&str> = tree.folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(folder_ids, vec!["F1", "F2", "F3"]);

        let content_ids: Vec<&str> = tree.content.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(content_ids, vec!["D1", "S2", "D2", "S1"]);
        assert_eq!(tree.content_of_type(&ItemType::Dashboard).len(), 2);
        assert!(tree.cyclic_links.is_empty());
    }

    #[test]
    fn test_non_folder_root_yields_empty_tree() {
        let source = source(vec![item("D1", ItemType::Dashboard, "F1")]);

        let tree = ContentWalker::new(&source).discover("D1").unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_cyclic_parent_reference_does_not_loop() {
        let source = source(vec![
            folder("F1", "P", vec![item("F2", ItemType::Folder, "F1")]),
            folder(
                "F2",
                "F1",
                vec![
                    item("F1", ItemType::Folder, "F2"),
                    item("S1", ItemType::Search, "F2"),
                ],
            ),
        ]);

        let tree = ContentWalker::new(&source).discover("F1").unwrap();

        assert_eq!(tree.folders.len(), 2);
        assert_eq!(tree.content.len(), 1);
        assert_eq!(
            tree.cyclic_links,
            vec![("F2".to_string(), "F1".to_string())]
        );
        assert_eq!(*source.fetched.borrow(), vec!["F1", "F2"]);
    }

    #[test]
    fn test_missing_child_folder_propagates_error() {
        let source = source(vec![folder(
            "F1",
            "P",
            vec![item("F9", ItemType::Folder, "F1")],
        )]);

        let err = ContentWalker::new(&source).discover("F1").unwrap_err();
        assert!(matches!(err, ExportError::NotFound { ref id } if id == "F9"));
    }

    #[test]
    fn test_counts_match_generated_tree() {
        // Wide tree: root with 5 sub-folders, each holding 3 searches
        let mut folders = Vec::new();
        let mut root_children = Vec::new();
        for i in 0..5 {
            let id = format!("F{}", i);
            root_children.push(item(&id, ItemType::Folder, "ROOT"));
            let leaves = (0..3)
                .map(|j| item(&format!("S{}{}", i, j), ItemType::Search, &id))
                .collect();
            folders.push(folder(&id, "ROOT", leaves));
        }
        folders.push(folder("ROOT", "P", root_children));
        let source = source(folders);

        let tree = ContentWalker::new(&source).discover("ROOT").unwrap();

        assert_eq!(tree.folders.len(), 6);
        assert_eq!(tree.content.len(), 15);
    }
}
