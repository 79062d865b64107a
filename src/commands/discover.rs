use anyhow::Result;
use clap::Args;
use std::collections::HashMap;

use crate::config::Settings;
use crate::content::ContentTree;
use crate::context::Context;

/// Print the folder tree and content below a folder without generating anything
#[derive(Debug, Args)]
pub struct DiscoverCommand {
    /// Folder id (16 hex digits or decimal)
    #[arg(long)]
    pub folder_id: String,
}

impl DiscoverCommand {
    pub fn execute(self, ctx: &Context, settings: &Settings) -> Result<ContentTree> {
        settings.validate(false)?;
        let client = super::content_client(ctx, settings)?;

        ctx.output.section("Content Discovery");
        let (root_id, tree) = super::discover_folder(&client, &self.folder_id)?;
        ctx.output.key_value("Folder", &root_id);
        ctx.output
            .key_value("Folders", &tree.folders.len().to_string());
        ctx.output
            .key_value("Content items", &tree.content.len().to_string());

        ctx.output.subsection("Folders");
        let mut depth: HashMap<&str, usize> = HashMap::new();
        for folder in tree.folders.iter() {
            let level = depth.get(folder.parent_id.as_str()).map_or(0, |d| d + 1);
            depth.insert(folder.id.as_str(), level);
            ctx.output.list_item(&format!(
                "{}{} ({})",
                "  ".repeat(level),
                folder.name,
                folder.id
            ));
        }

        if !tree.content.is_empty() {
            ctx.output.subsection("Content");
            for item in &tree.content {
                let kind: String = item.item_type.clone().into();
                ctx.output
                    .list_item(&format!("[{}] {} ({})", kind, item.name, item.id));
            }
        }

        for (parent, child) in &tree.cyclic_links {
            ctx.output.warning(&format!(
                "Folder {} lists its ancestor {} as a child; link skipped",
                parent, child
            ));
        }

        Ok(tree)
    }
}
