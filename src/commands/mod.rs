pub mod discover;
pub mod import;
pub mod screenshots;

pub use discover::DiscoverCommand;
pub use import::ImportCommand;
pub use screenshots::ScreenshotsCommand;

use std::collections::HashSet;

use anyhow::{Context as AnyhowContext, Result};

use crate::client::{ContentClient, Dashboard, ItemType, normalize_content_id};
use crate::config::Settings;
use crate::content::{ContentTree, ContentWalker};
use crate::context::Context;

/// Content client for the configured deployment, using the context's HTTP client
pub(crate) fn content_client(ctx: &Context, settings: &Settings) -> Result<ContentClient> {
    let endpoints = settings.endpoints()?;
    Ok(ContentClient::new(ctx.http.clone(), endpoints).with_export_poll(settings.export_poll()))
}

/// Normalize the folder id and walk its subtree; an empty result is an error
pub(crate) fn discover_folder(client: &ContentClient, folder_id: &str) -> Result<(String, ContentTree)> {
    let root_id = normalize_content_id(folder_id)?;

    let tree = ContentWalker::new(client)
        .discover(&root_id)
        .with_context(|| format!("Failed to discover content of folder {}", root_id))?;

    if tree.is_empty() {
        anyhow::bail!("{} is not a folder or has no content", root_id);
    }

    Ok((root_id, tree))
}

/// Resolve the dashboards of a discovered tree through the dashboards API
pub(crate) fn tree_dashboards(client: &ContentClient, tree: &ContentTree) -> Result<Vec<Dashboard>> {
    let content_ids: HashSet<String> = tree
        .content_of_type(&ItemType::Dashboard)
        .into_iter()
        .map(|item| item.id.clone())
        .collect();

    if content_ids.is_empty() {
        return Ok(Vec::new());
    }

    let dashboards = client
        .list_dashboards(&content_ids)
        .context("Failed to list dashboards")?;

    Ok(dashboards)
}
