use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::client::{ContentClient, Dashboard};
use crate::config::Settings;
use crate::context::Context;
use crate::error::ExportError;
use crate::importer::{ImportOutcome, ImporterConfig, TerraformerImporter};
use crate::postprocess::postprocess_dashboard_file;
use crate::screenshots::capture_all;
use crate::terraform::{OutputNames, render_folders, render_outputs, render_searches, render_variables};

const RESOURCES_DIR: &str = "resources";
const FOLDERS_FILE: &str = "folders.tf";
const VARIABLES_FILE: &str = "variables.tf";
const SEARCHES_FILE: &str = "log-searches.tf";
const OUTPUT_FILE: &str = "output.tf";

/// Export a folder tree and generate the Terraform module for it
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Folder id to export (16 hex digits or decimal)
    #[arg(long)]
    pub folder_id: String,

    /// Destination directory; files are written under <dest>/resources
    #[arg(long)]
    pub dest: PathBuf,

    /// Do not run the external dashboard importer
    #[arg(long)]
    pub skip_dashboards: bool,

    /// Do not capture dashboard preview screenshots
    #[arg(long)]
    pub skip_screenshots: bool,

    /// App manifest receiving screenshot entries (defaults to <dest>/manifest.yaml)
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

/// What one import run produced
#[derive(Debug, Default)]
pub struct RunReport {
    pub files_written: Vec<PathBuf>,
    pub folders: usize,
    pub searches: usize,
    pub dashboards: usize,
    pub screenshots: usize,
    /// Best-effort failures; the run still completed
    pub warnings: Vec<ExportError>,
}

impl RunReport {
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl ImportCommand {
    pub fn execute(self, ctx: &Context, settings: &Settings) -> Result<RunReport> {
        let scratch = ImporterConfig::default_scratch_dir();
        self.execute_with_scratch(ctx, settings, scratch)
    }

    /// Run the pipeline using `scratch_dir` as the importer's output directory
    pub fn execute_with_scratch(
        self,
        ctx: &Context,
        settings: &Settings,
        scratch_dir: PathBuf,
    ) -> Result<RunReport> {
        settings.validate(!self.skip_dashboards)?;
        let client = super::content_client(ctx, settings)?;
        let mut report = RunReport::default();

        ctx.output.section("Content Export");
        let (root_id, tree) = super::discover_folder(&client, &self.folder_id)?;
        ctx.output.key_value("Folder", &root_id);
        ctx.output.key_value("Destination", &self.dest.display().to_string());

        for (parent, child) in &tree.cyclic_links {
            ctx.output.warning(&format!(
                "Folder {} lists its ancestor {} as a child; link skipped",
                parent, child
            ));
        }

        let personal = client
            .get_personal_folder()
            .context("Failed to fetch the personal folder")?;

        if let Some(root) = tree.folders.get(&root_id)
            && root.parent_id != personal.id
        {
            ctx.output
                .dimmed("Folder is outside the personal folder; exporting it as the app root");
        }

        // Emitter phase: everything here is load-bearing, so errors abort the run
        ctx.output.subsection("Generating folders and variables");
        let folder_module = render_folders(&tree.folders, &root_id)?;
        let variables = render_variables(&tree.folders, &root_id, &folder_module.registry);
        report.folders = folder_module.registry.len();

        ctx.output.subsection("Exporting saved searches");
        let searches = render_searches(&tree.folders, &folder_module.registry, &client)
            .context("Failed to export saved searches")?;
        report.searches = searches.registry.len();

        let resources = self.dest.join(RESOURCES_DIR);
        ctx.fs
            .create_dir_all(&resources)
            .with_context(|| format!("Failed to create {}", resources.display()))?;

        self.write_if_not_empty(ctx, &mut report, &resources.join(FOLDERS_FILE), &folder_module.text)?;
        self.write_if_not_empty(ctx, &mut report, &resources.join(VARIABLES_FILE), &variables)?;
        self.write_if_not_empty(ctx, &mut report, &resources.join(SEARCHES_FILE), &searches.text)?;

        let needs_dashboards = !self.skip_dashboards || !self.skip_screenshots;
        let dashboards = if needs_dashboards {
            super::tree_dashboards(&client, &tree)?
        } else {
            Vec::new()
        };

        let mut dashboard_names = Vec::new();
        if self.skip_dashboards {
            ctx.output.dimmed("Skipping dashboard import");
        } else {
            ctx.output.subsection("Importing dashboards");
            let ids: Vec<String> = dashboards.iter().map(|d| d.id.clone()).collect();
            let importer = TerraformerImporter::new(ImporterConfig {
                terraformer_path: settings.terraformer_path.clone().unwrap_or_default(),
                deployment: settings.deployment().to_string(),
                base_url: settings.base_url(),
                credentials: settings.credentials(),
                scratch_dir,
            });

            match importer.import(ctx, &ids, &self.dest) {
                ImportOutcome::Imported { path, warning } => {
                    if let Some(warning) = warning {
                        self.warn(ctx, &mut report, warning);
                    }

                    match postprocess_dashboard_file(&*ctx.fs, &path, &root_id, &folder_module.registry) {
                        Ok(processed) => {
                            for unresolved in processed.unresolved {
                                self.warn(ctx, &mut report, unresolved);
                            }
                            dashboard_names = processed.dashboards;
                        }
                        Err(e) => self.warn(ctx, &mut report, e),
                    }

                    report.files_written.push(path);
                }
                ImportOutcome::Skipped => {}
                ImportOutcome::Failed(e) => self.warn(ctx, &mut report, e),
            }
        }
        report.dashboards = dashboard_names.len();

        let outputs = render_outputs(&OutputNames {
            dashboards: dashboard_names,
            folders: folder_module.registry.names(),
            searches: searches.registry.names(),
        });
        self.write_if_not_empty(ctx, &mut report, &resources.join(OUTPUT_FILE), &outputs)?;

        if self.skip_screenshots {
            ctx.output.dimmed("Skipping screenshots");
        } else {
            self.screenshots(ctx, settings, &client, &dashboards, &mut report);
        }

        Self::summarize(ctx, &report);
        Ok(report)
    }

    fn screenshots(
        &self,
        ctx: &Context,
        settings: &Settings,
        client: &ContentClient,
        dashboards: &[Dashboard],
        report: &mut RunReport,
    ) {
        let manifest = self
            .manifest
            .clone()
            .unwrap_or_else(|| self.dest.join("manifest.yaml"));

        if !ctx.fs.is_file(&manifest) {
            self.warn(
                ctx,
                report,
                ExportError::InvalidInput(format!(
                    "Manifest {} not found; screenshots skipped",
                    manifest.display()
                )),
            );
            return;
        }

        ctx.output.subsection("Capturing screenshots");
        let shots = capture_all(
            ctx,
            client,
            dashboards,
            &self.dest,
            &manifest,
            settings.job_poll(),
        );
        report.screenshots = shots.saved.len();
        // capture_all already printed each failure
        report
            .warnings
            .extend(shots.failures.into_iter().map(|(_, e)| e));
    }

    fn write_if_not_empty(
        &self,
        ctx: &Context,
        report: &mut RunReport,
        path: &Path,
        text: &str,
    ) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        ctx.fs
            .write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        ctx.output.list_item(&path.display().to_string());
        report.files_written.push(path.to_path_buf());
        Ok(())
    }

    fn warn(&self, ctx: &Context, report: &mut RunReport, warning: ExportError) {
        ctx.output.warning(&warning.to_string());
        report.warnings.push(warning);
    }

    fn summarize(ctx: &Context, report: &RunReport) {
        ctx.output.subsection("Summary");
        ctx.output.key_value("Folders", &report.folders.to_string());
        ctx.output.key_value("Saved searches", &report.searches.to_string());
        ctx.output.key_value("Dashboards", &report.dashboards.to_string());
        ctx.output.key_value("Screenshots", &report.screenshots.to_string());
        ctx.output.blank();

        if report.is_partial() {
            ctx.output.warning(&format!(
                "Export finished with {} warning(s)",
                report.warnings.len()
            ));
        } else {
            ctx.output.success("Export finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockHttpClient;
    use crate::traits::{FileSystem, MockCommandExecutor, MockFileSystem, MockOutput};
    use std::sync::Arc;

    const BASE: &str = "http://api.test/api/";
    const ROOT: &str = "00000000000000F1";
    const CHILD: &str = "00000000000000F2";

    fn settings() -> Settings {
        let mut settings = Settings::empty();
        settings.deployment = Some("us2".to_string());
        settings.base_url = Some(BASE.to_string());
        settings.terraformer_path = Some("terraformer".to_string());
        settings.poll_interval_ms = 5;
        settings
    }

    fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    /// Root F1 under the personal folder, child F2 holding search S1 and dashboard D1
    fn mock_remote() -> Arc<MockHttpClient> {
        let http = Arc::new(MockHttpClient::new());
        http.on_get(
            &url(&format!("v2/content/folders/{}", ROOT)),
            200,
            format!(
                r#"{{"id":"{ROOT}","itemType":"Folder","name":"My App","parentId":"PERSONAL","children":[
                    {{"id":"{CHILD}","itemType":"Folder","name":"F2","parentId":"{ROOT}"}}
                ]}}"#
            ),
        );
        http.on_get(
            &url(&format!("v2/content/folders/{}", CHILD)),
            200,
            format!(
                r#"{{"id":"{CHILD}","itemType":"Folder","name":"F2","parentId":"{ROOT}","children":[
                    {{"id":"S1","itemType":"Search","name":"S1","parentId":"{CHILD}"}},
                    {{"id":"D1","itemType":"Dashboard","name":"Overview","parentId":"{CHILD}"}}
                ]}}"#
            ),
        );
        http.on_get(
            &url("v2/content/folders/personal"),
            200,
            r#"{"id":"PERSONAL","itemType":"Folder","name":"Personal","parentId":"0","children":[]}"#,
        );
        http.on_post(&url("v2/content/S1/export"), 200, r#"{"id":"J1"}"#);
        http.on_get(
            &url("v2/content/S1/export/J1/status"),
            200,
            r#"{"status":"Success"}"#,
        );
        http.on_get(
            &url("v2/content/S1/export/J1/result"),
            200,
            r#"{"name":"S1","search":{"queryText":"_sourceCategory=*","defaultTimeRange":"-15m"}}"#,
        );
        http.on_get(
            &url("v2/dashboards/"),
            200,
            r#"{"dashboards":[{"id":"DASH1","contentId":"D1","title":"Overview"}],"next":null}"#,
        );
        http
    }

    fn importer_writing(fs: Arc<MockFileSystem>) -> MockCommandExecutor {
        MockCommandExecutor::new().with_effect(Box::new(move |args: &[String]| {
            let out = PathBuf::from(args.last().unwrap());
            fs.write(
                &out.join("sumologic/dashboard/dashboard.tf"),
                &format!(
                    "resource \"sumologic_dashboard\" \"tfer--overview-_overview-X1\" {{\n  title     = \"Overview - New\"\n  folder_id = \"{}\"\n}}\n",
                    CHILD
                ),
            )
            .unwrap();
        }))
    }

    fn command(skip_dashboards: bool) -> ImportCommand {
        ImportCommand {
            folder_id: ROOT.to_string(),
            dest: PathBuf::from("/dest"),
            skip_dashboards,
            skip_screenshots: true,
            manifest: None,
        }
    }

    #[test]
    fn test_full_pipeline_writes_cross_linked_module() {
        let fs = Arc::new(MockFileSystem::new());
        let command_exec = Arc::new(importer_writing(fs.clone()));
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(fs.clone(), output.clone(), command_exec.clone(), mock_remote());

        let report = command(false)
            .execute_with_scratch(&ctx, &settings(), PathBuf::from("/scratch"))
            .unwrap();

        assert!(!report.is_partial(), "warnings: {:?}", report.warnings);
        assert_eq!(report.folders, 2);
        assert_eq!(report.searches, 1);
        assert_eq!(report.dashboards, 1);

        let folders = fs.get_file_contents(Path::new("/dest/resources/folders.tf")).unwrap();
        assert!(folders.contains("resource \"sumologic_folder\" \"integration_folder\" {"));
        assert!(folders.contains("resource \"sumologic_folder\" \"f2_folder\" {"));
        assert!(folders.contains("  parent_id   = sumologic_folder.integration_folder.id\n"));

        let searches = fs.get_file_contents(Path::new("/dest/resources/log-searches.tf")).unwrap();
        assert!(searches.contains("resource \"sumologic_log_search\" \"s1\" {"));
        assert!(searches.contains("  parent_id = sumologic_folder.f2_folder.id\n"));

        let dashboards = fs.get_file_contents(Path::new("/dest/resources/dashboards.tf")).unwrap();
        assert!(dashboards.contains("resource \"sumologic_dashboard\" \"overview\" {"));
        assert!(dashboards.contains("  title     = \"Overview\"\n"));
        assert!(dashboards.contains("  folder_id = sumologic_folder.f2_folder.id\n"));

        let variables = fs.get_file_contents(Path::new("/dest/resources/variables.tf")).unwrap();
        assert!(variables.contains("variable \"f2_folder_name\" {"));

        let outputs = fs.get_file_contents(Path::new("/dest/resources/output.tf")).unwrap();
        assert!(outputs.contains("sumologic_dashboard.overview.title,"));
        assert!(outputs.contains("sumologic_folder.integration_folder.name,"));
        assert!(outputs.contains("sumologic_log_search.s1.name,"));

        let calls = command_exec.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].args.contains(&"Name=id;Value=DASH1".to_string()));
        assert!(!fs.exists(Path::new("/scratch")));
    }

    #[test]
    fn test_importer_failure_is_reported_not_fatal() {
        let fs = Arc::new(MockFileSystem::new());
        // Importer runs but writes nothing
        let command_exec = Arc::new(MockCommandExecutor::new());
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(fs.clone(), output.clone(), command_exec, mock_remote());

        let report = command(false)
            .execute_with_scratch(&ctx, &settings(), PathBuf::from("/scratch"))
            .unwrap();

        assert!(report.is_partial());
        assert!(matches!(
            report.warnings[0],
            ExportError::SubprocessFailure { .. }
        ));
        assert!(fs.has_file(Path::new("/dest/resources/folders.tf")));
        assert!(fs.has_file(Path::new("/dest/resources/log-searches.tf")));
        assert!(!fs.has_file(Path::new("/dest/resources/dashboards.tf")));

        let outputs = fs.get_file_contents(Path::new("/dest/resources/output.tf")).unwrap();
        assert!(!outputs.contains("dashboards"));
        assert!(!output.get_warnings().is_empty());
    }

    #[test]
    fn test_skip_dashboards_never_calls_importer() {
        let fs = Arc::new(MockFileSystem::new());
        let command_exec = Arc::new(MockCommandExecutor::new());
        let http = mock_remote();
        let ctx = Context::test_with(
            fs.clone(),
            Arc::new(MockOutput::new()),
            command_exec.clone(),
            http.clone(),
        );

        let report = command(true)
            .execute_with_scratch(&ctx, &settings(), PathBuf::from("/scratch"))
            .unwrap();

        assert!(!report.is_partial());
        assert!(command_exec.calls().is_empty());
        assert_eq!(http.count(&url("v2/dashboards/")), 0);
    }

    #[test]
    fn test_missing_terraformer_path_is_config_error() {
        let ctx = Context::test_with(
            Arc::new(MockFileSystem::new()),
            Arc::new(MockOutput::new()),
            Arc::new(MockCommandExecutor::new()),
            mock_remote(),
        );
        let mut settings = settings();
        settings.terraformer_path = None;

        let err = command(false)
            .execute_with_scratch(&ctx, &settings, PathBuf::from("/scratch"))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ExportError>(),
            Some(ExportError::Config(_))
        ));
    }

    #[test]
    fn test_missing_manifest_skips_screenshots_with_warning() {
        let fs = Arc::new(MockFileSystem::new());
        let http = mock_remote();
        let ctx = Context::test_with(
            fs.clone(),
            Arc::new(MockOutput::new()),
            Arc::new(MockCommandExecutor::new()),
            http.clone(),
        );

        let mut cmd = command(true);
        cmd.skip_screenshots = false;
        let report = cmd
            .execute_with_scratch(&ctx, &settings(), PathBuf::from("/scratch"))
            .unwrap();

        assert_eq!(report.screenshots, 0);
        assert!(matches!(report.warnings[0], ExportError::InvalidInput(_)));
        assert_eq!(http.count(&url("v2/dashboards/reportJobs")), 0);
    }
}
