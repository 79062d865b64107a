use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;

use crate::config::Settings;
use crate::context::Context;
use crate::screenshots::{ScreenshotReport, capture_all};

/// Capture preview screenshots for every dashboard below a folder
#[derive(Debug, Args)]
pub struct ScreenshotsCommand {
    /// Folder id (16 hex digits or decimal)
    #[arg(long)]
    pub folder_id: String,

    /// App directory receiving assets/images/preview
    #[arg(long)]
    pub dest: PathBuf,

    /// App manifest to update (defaults to <dest>/manifest.yaml)
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

impl ScreenshotsCommand {
    pub fn execute(self, ctx: &Context, settings: &Settings) -> Result<ScreenshotReport> {
        settings.validate(false)?;

        let manifest = self
            .manifest
            .unwrap_or_else(|| self.dest.join("manifest.yaml"));
        if !ctx.fs.is_file(&manifest) {
            bail!("Manifest not found: {}", manifest.display());
        }

        let client = super::content_client(ctx, settings)?;

        ctx.output.section("Dashboard Screenshots");
        let (root_id, tree) = super::discover_folder(&client, &self.folder_id)?;
        ctx.output.key_value("Folder", &root_id);

        let dashboards = super::tree_dashboards(&client, &tree)?;
        if dashboards.is_empty() {
            ctx.output.dimmed("No dashboards found");
            return Ok(ScreenshotReport::default());
        }

        let report = capture_all(
            ctx,
            &client,
            &dashboards,
            &self.dest,
            &manifest,
            settings.job_poll(),
        );

        ctx.output.blank();
        if report.failures.is_empty() {
            ctx.output
                .success(&format!("Saved {} screenshot(s)", report.saved.len()));
        } else {
            ctx.output.warning(&format!(
                "Saved {} screenshot(s), {} failed",
                report.saved.len(),
                report.failures.len()
            ));
        }

        Ok(report)
    }
}
