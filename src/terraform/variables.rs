use super::registry::ResourceNameRegistry;
use super::slug::hcl_string;
use crate::content::FolderIndex;

/// Variables describing where and under which name the integration is installed
pub const STATIC_VARIABLES: &[(&str, &str)] = &[
    (
        "integration_root_dir",
        "The folder in which app should be installed.",
    ),
    ("integration_name", "The name of the integration"),
    ("integration_description", "The description of the integration"),
];

fn render_variable(text: &mut String, name: &str, description: &str, default: &str) {
    text.push_str(&format!("variable \"{}\" {{\n", name));
    text.push_str("  type        = string\n");
    text.push_str(&format!("  description = {}\n", hcl_string(description)));
    text.push_str(&format!("  default     = {}\n", hcl_string(default)));
    text.push_str("}\n\n");
}

pub fn render_static_variables() -> String {
    let mut text = String::new();
    for (name, description) in STATIC_VARIABLES {
        render_variable(&mut text, name, description, "");
    }
    text
}

/// Name and description variables for every folder except the import root,
/// which reuses the static integration variables.
pub fn render_folder_variables(
    folders: &FolderIndex,
    root_id: &str,
    registry: &ResourceNameRegistry,
) -> String {
    let mut text = String::new();

    for folder in folders.iter() {
        if folder.id == root_id {
            continue;
        }

        let Some(entry) = registry.get(&folder.id) else {
            continue;
        };

        render_variable(
            &mut text,
            &format!("{}_name", entry.name),
            &format!("{} folder name", entry.stem),
            &folder.name,
        );
        render_variable(
            &mut text,
            &format!("{}_description", entry.name),
            &format!("{} folder description", entry.stem),
            folder.description.as_deref().unwrap_or(""),
        );
    }

    text
}

/// Complete `variables.tf`: static variables first, then per-folder ones
pub fn render_variables(
    folders: &FolderIndex,
    root_id: &str,
    registry: &ResourceNameRegistry,
) -> String {
    let mut text = render_static_variables();
    text.push_str(&render_folder_variables(folders, root_id, registry));
    text
}
