//! Adapter around the external `terraformer` dashboard importer

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::client::Credentials;
use crate::context::Context;
use crate::error::ExportError;

/// Deployments the importer only reaches through an explicit base URL
const BASE_URL_DEPLOYMENTS: &[&str] = &["stag", "long"];

/// Platform name passed to the importer; also the first directory it writes
const PLATFORM: &str = "sumologic";

/// Canonical name of the imported dashboards file inside `<dest>/resources`
pub const DASHBOARDS_FILE: &str = "dashboards.tf";

/// Everything needed to run the importer for one destination
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    pub terraformer_path: String,
    pub deployment: String,
    pub base_url: String,
    pub credentials: Option<Credentials>,
    /// Directory handed to the importer as `-o`; removed afterwards
    pub scratch_dir: PathBuf,
}

impl ImporterConfig {
    /// Fresh scratch directory under the system temp dir
    pub fn default_scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("app-packager-{}", uuid::Uuid::new_v4()))
    }
}

/// Result of one import attempt. Failures are returned, never raised.
#[derive(Debug)]
pub enum ImportOutcome {
    /// Dashboards file moved into place; `warning` is set when the importer
    /// exited non-zero but still left a file behind
    Imported {
        path: PathBuf,
        warning: Option<ExportError>,
    },
    /// Nothing to import
    Skipped,
    Failed(ExportError),
}

/// Command-line arguments for importing `dashboard_ids` into `output_dir`
pub fn importer_args(dashboard_ids: &[String], output_dir: &Path) -> Vec<String> {
    vec![
        "import".to_string(),
        PLATFORM.to_string(),
        "-v".to_string(),
        "--resources=dashboard".to_string(),
        "--filter".to_string(),
        format!("Name=id;Value={}", dashboard_ids.join(":")),
        "-o".to_string(),
        output_dir.display().to_string(),
    ]
}

/// Environment handed to the importer process
pub fn importer_env(
    deployment: &str,
    base_url: &str,
    credentials: Option<&Credentials>,
) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();

    if BASE_URL_DEPLOYMENTS.contains(&deployment) {
        env.insert("SUMOLOGIC_BASE_URL".to_string(), base_url.to_string());
    } else {
        env.insert("SUMOLOGIC_ENVIRONMENT".to_string(), deployment.to_string());
    }

    if let Some(creds) = credentials {
        env.insert("SUMOLOGIC_ACCESS_ID".to_string(), creds.access_id.clone());
        env.insert("SUMOLOGIC_ACCESS_KEY".to_string(), creds.access_key.clone());
    }

    env
}

pub struct TerraformerImporter {
    config: ImporterConfig,
}

impl TerraformerImporter {
    pub fn new(config: ImporterConfig) -> Self {
        Self { config }
    }

    /// Import `dashboard_ids` and move the generated file to
    /// `<dest>/resources/dashboards.tf`.
    pub fn import(&self, ctx: &Context, dashboard_ids: &[String], dest: &Path) -> ImportOutcome {
        if dashboard_ids.is_empty() {
            ctx.output.dimmed("No dashboards to import");
            return ImportOutcome::Skipped;
        }

        let scratch = &self.config.scratch_dir;
        let args = importer_args(dashboard_ids, scratch);
        let env = importer_env(
            &self.config.deployment,
            &self.config.base_url,
            self.config.credentials.as_ref(),
        );

        ctx.output.info(&format!(
            "Running {} {}",
            self.config.terraformer_path,
            args.join(" ")
        ));

        if let Err(e) = ctx.fs.create_dir_all(scratch) {
            return ImportOutcome::Failed(self.failure(format!("{:#}", e), None));
        }

        let outcome = self.run_and_collect(ctx, &args, &env, dest);
        self.cleanup(ctx);
        outcome
    }

    fn run_and_collect(
        &self,
        ctx: &Context,
        args: &[String],
        env: &BTreeMap<String, String>,
        dest: &Path,
    ) -> ImportOutcome {
        let output = match ctx.command.execute_with_env(
            &self.config.terraformer_path,
            args,
            env,
            &self.config.scratch_dir,
        ) {
            Ok(output) => output,
            Err(e) => return ImportOutcome::Failed(self.failure(format!("{:#}", e), None)),
        };

        let warning = if output.status.success() {
            None
        } else {
            Some(self.failure(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
                output.status.code(),
            ))
        };

        let Some(generated) = self.locate_generated_file(ctx) else {
            let message = match warning {
                Some(ExportError::SubprocessFailure { message, .. }) if !message.is_empty() => {
                    format!("no dashboard file was generated: {}", message)
                }
                _ => "no dashboard file was generated".to_string(),
            };
            return ImportOutcome::Failed(self.failure(message, output.status.code()));
        };

        let target = dest.join("resources").join(DASHBOARDS_FILE);
        if let Err(e) = ctx.fs.rename(&generated, &target) {
            return ImportOutcome::Failed(ExportError::Io(std::io::Error::other(format!(
                "Failed to move {} to {}: {:#}",
                generated.display(),
                target.display(),
                e
            ))));
        }

        ImportOutcome::Imported {
            path: target,
            warning,
        }
    }

    /// The importer writes `<scratch>/sumologic/dashboard/*.tf`; prefer `dashboard.tf`
    fn locate_generated_file(&self, ctx: &Context) -> Option<PathBuf> {
        let dashboard_dir = self
            .config
            .scratch_dir
            .join(PLATFORM)
            .join("dashboard");

        let mut candidates: Vec<PathBuf> = ctx
            .fs
            .walk_dir(&dashboard_dir, 1)
            .ok()?
            .into_iter()
            .filter(|p| ctx.fs.is_file(p) && p.extension().is_some_and(|ext| ext == "tf"))
            .collect();
        candidates.sort();

        let preferred = dashboard_dir.join("dashboard.tf");
        if candidates.contains(&preferred) {
            return Some(preferred);
        }

        candidates.into_iter().next()
    }

    fn cleanup(&self, ctx: &Context) {
        let scratch = &self.config.scratch_dir;
        if ctx.fs.exists(scratch)
            && let Err(e) = ctx.fs.remove_dir_all(scratch)
        {
            ctx.output.warning(&format!(
                "Failed to remove scratch directory {}: {:#}",
                scratch.display(),
                e
            ));
        }
    }

    fn failure(&self, message: String, exit_code: Option<i32>) -> ExportError {
        ExportError::SubprocessFailure {
            command: self.config.terraformer_path.clone(),
            message,
            exit_code,
        }
    }
}
