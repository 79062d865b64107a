use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{Credentials, Endpoints, PollSettings, resolve_base_api_url};
use crate::error::{ExportError, ExportResult};
use crate::traits::FileSystem;

const CONFIG_DIR: &str = ".app-packager";
const CONFIG_FILE: &str = "config.yaml";

fn default_export_timeout() -> u64 {
    30
}

fn default_job_timeout() -> u64 {
    180
}

fn default_poll_interval() -> u64 {
    1000
}

/// Settings file contents; every field is optional so CLI flags can fill gaps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    #[serde(default)]
    pub deployment: Option<String>,
    #[serde(default)]
    pub access_id: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub terraformer_path: Option<String>,
    /// Overrides the deployment-derived API URL
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,
    #[serde(default = "default_job_timeout")]
    pub job_timeout_secs: u64,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub deployment: Option<String>,
    pub access_id: Option<String>,
    pub access_key: Option<String>,
    pub terraformer_path: Option<String>,
}

impl Settings {
    /// `~/.app-packager/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load settings from `path` (or the default location when it exists) and
    /// apply `overrides` on top.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(
        fs: &dyn FileSystem,
        path: Option<&Path>,
        overrides: SettingsOverrides,
    ) -> ExportResult<Self> {
        let mut settings = match path {
            Some(path) => {
                if !fs.is_file(path) {
                    return Err(ExportError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::parse_file(fs, path)?
            }
            None => match Self::default_path() {
                Some(default) if fs.is_file(&default) => Self::parse_file(fs, &default)?,
                _ => Self::empty(),
            },
        };

        settings.apply(overrides);
        Ok(settings)
    }

    fn parse_file(fs: &dyn FileSystem, path: &Path) -> ExportResult<Self> {
        let content = fs.read_to_string(path).map_err(|e| {
            ExportError::Config(format!("Failed to read {}: {:#}", path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(Self::empty());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            ExportError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Settings with defaults only
    pub fn empty() -> Self {
        Self {
            export_timeout_secs: default_export_timeout(),
            job_timeout_secs: default_job_timeout(),
            poll_interval_ms: default_poll_interval(),
            ..Self::default()
        }
    }

    /// Non-empty override values replace file values
    pub fn apply(&mut self, overrides: SettingsOverrides) {
        fn pick(target: &mut Option<String>, value: Option<String>) {
            if let Some(v) = value
                && !v.is_empty()
            {
                *target = Some(v);
            }
        }

        pick(&mut self.deployment, overrides.deployment);
        pick(&mut self.access_id, overrides.access_id);
        pick(&mut self.access_key, overrides.access_key);
        pick(&mut self.terraformer_path, overrides.terraformer_path);
    }

    /// Check that the settings needed for a run are present
    pub fn validate(&self, needs_importer: bool) -> ExportResult<()> {
        if self.deployment.is_none() && self.base_url.is_none() {
            return Err(ExportError::Config(
                "A deployment (--deployment or SUMOLOGIC_DEPLOYMENT) or base_url is required"
                    .to_string(),
            ));
        }

        if needs_importer && self.terraformer_path.is_none() {
            return Err(ExportError::Config(
                "A terraformer path (--terraformer-path or TERRAFORMER_PATH) is required to import dashboards"
                    .to_string(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(ExportError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn deployment(&self) -> &str {
        self.deployment.as_deref().unwrap_or("")
    }

    /// API base URL: explicit `base_url`, otherwise derived from the deployment
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => resolve_base_api_url(self.deployment()),
        }
    }

    pub fn endpoints(&self) -> ExportResult<Endpoints> {
        match &self.base_url {
            Some(url) => Endpoints::new(url),
            None => Endpoints::for_deployment(self.deployment()),
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.access_id.as_deref(), self.access_key.as_deref())
    }

    pub fn export_poll(&self) -> PollSettings {
        PollSettings::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_secs(self.export_timeout_secs),
        )
    }

    pub fn job_poll(&self) -> PollSettings {
        PollSettings::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_secs(self.job_timeout_secs),
        )
    }
}
