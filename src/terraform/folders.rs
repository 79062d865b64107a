use super::registry::ResourceNameRegistry;
use super::{FOLDER_RESOURCE, FOLDER_SUFFIX, INTEGRATION_STEM, integration_folder_reference};
use crate::client::ContentItem;
use crate::content::FolderIndex;
use crate::error::{ExportError, ExportResult};

/// Where a folder sits relative to the import root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderPlacement {
    /// Direct child of the import root
    ChildOfImport,
    /// The import root itself, emitted as the integration folder
    ImportRoot,
    /// Deeper folder whose parent is another emitted folder
    Nested { parent_id: String },
}

/// Classify `folder`. The checks run in a fixed order: a child of the root
/// is matched before the root itself, and the registry lookup comes last.
///
/// Only the root becomes the integration folder. Any other folder whose
/// parent was not emitted (the personal folder included) is `UnknownParent`.
pub fn classify(
    folder: &ContentItem,
    root_id: &str,
    folders: &FolderIndex,
) -> ExportResult<FolderPlacement> {
    if folder.parent_id == root_id && folder.id != root_id {
        return Ok(FolderPlacement::ChildOfImport);
    }

    if folder.id == root_id {
        return Ok(FolderPlacement::ImportRoot);
    }

    if folders.contains(&folder.parent_id) {
        return Ok(FolderPlacement::Nested {
            parent_id: folder.parent_id.clone(),
        });
    }

    Err(ExportError::UnknownParent {
        folder_id: folder.id.clone(),
        parent_id: folder.parent_id.clone(),
    })
}

/// Rendered `folders.tf` plus the names allocated for each folder
#[derive(Debug, Clone)]
pub struct FolderModule {
    pub text: String,
    pub registry: ResourceNameRegistry,
}

/// Allocate a resource name for every folder, root first.
pub fn register_folders(folders: &FolderIndex, root_id: &str) -> ResourceNameRegistry {
    let mut registry = ResourceNameRegistry::new(FOLDER_RESOURCE, FOLDER_SUFFIX);
    registry.register_exact(root_id, INTEGRATION_STEM);

    for folder in folders.iter() {
        registry.register(&folder.id, &folder.name);
    }

    registry
}

/// Render one `sumologic_folder` resource per folder in discovery order
pub fn render_folders(folders: &FolderIndex, root_id: &str) -> ExportResult<FolderModule> {
    let registry = register_folders(folders, root_id);
    let mut text = String::new();

    for folder in folders.iter() {
        let placement = classify(folder, root_id, folders)?;
        let integration_name = format!("{}{}", INTEGRATION_STEM, FOLDER_SUFFIX);

        let (resource_name, name_var, description_var, parent_ref) = match &placement {
            FolderPlacement::ImportRoot => (
                integration_name,
                "var.integration_name".to_string(),
                "var.integration_description".to_string(),
                "var.integration_root_dir".to_string(),
            ),
            FolderPlacement::ChildOfImport | FolderPlacement::Nested { .. } => {
                let entry = registry
                    .get(&folder.id)
                    .ok_or_else(|| ExportError::NotFound {
                        id: folder.id.clone(),
                    })?;

                let parent_ref = match &placement {
                    FolderPlacement::Nested { parent_id } => registry
                        .reference(parent_id)
                        .ok_or_else(|| ExportError::UnknownParent {
                            folder_id: folder.id.clone(),
                            parent_id: parent_id.clone(),
                        })?,
                    _ => integration_folder_reference(),
                };

                (
                    entry.name.clone(),
                    format!("var.{}_name", entry.name),
                    format!("var.{}_description", entry.name),
                    parent_ref,
                )
            }
        };

        text.push_str(&format!(
            "resource \"{}\" \"{}\" {{\n",
            FOLDER_RESOURCE, resource_name
        ));
        text.push_str(&format!("  name        = {}\n", name_var));
        text.push_str(&format!("  description = {}\n", description_var));
        text.push_str(&format!("  parent_id   = {}\n", parent_ref));
        text.push_str("}\n\n");
    }

    Ok(FolderModule { text, registry })
}
