//! Normalization of the dashboards file produced by the external importer

use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::{ExportError, ExportResult};
use crate::terraform::{DASHBOARD_RESOURCE, ResourceNameRegistry, integration_folder_reference};
use crate::traits::FileSystem;

lazy_static! {
    static ref FOLDER_ID_LITERAL: Regex =
        Regex::new(r#"(folder_id\s*=\s*)"([0-9A-Za-z]+)""#).expect("Invalid folder id regex");
    static ref DASHBOARD_DECLARATION: Regex =
        Regex::new(r#"^(\s*resource\s+"sumologic_dashboard"\s+")([^"]+)("\s*\{)"#)
            .expect("Invalid dashboard declaration regex");
    static ref IMPORTER_PREFIX: Regex =
        Regex::new(r"^tfer--[a-zA-Z0-9-]*-_").expect("Invalid importer prefix regex");
    static ref IMPORTER_SUFFIX: Regex =
        Regex::new(r"-[a-zA-Z0-9]*$").expect("Invalid importer suffix regex");
    static ref TITLE_NEW_SUFFIX: Regex =
        Regex::new(r#"^(\s*title\s*=\s*".*?) - New(")"#).expect("Invalid title regex");
}

/// Text after folder-id rewriting plus the ids that could not be resolved
#[derive(Debug)]
pub struct Rewritten {
    pub text: String,
    /// One `RewriteUnresolvedReference` per literal left untouched
    pub unresolved: Vec<ExportError>,
}

/// Replace `folder_id = "<id>"` literals with folder resource references.
///
/// The import root maps to the integration folder. Ids missing from the
/// registry keep their literal and are reported in `unresolved`.
pub fn rewrite_folder_ids(text: &str, root_id: &str, registry: &ResourceNameRegistry) -> Rewritten {
    let mut unresolved = Vec::new();

    let rewritten = FOLDER_ID_LITERAL.replace_all(text, |caps: &Captures| {
        let id = &caps[2];
        let reference = if id == root_id {
            Some(integration_folder_reference())
        } else {
            registry.reference(id)
        };

        match reference {
            Some(reference) => format!("{}{}", &caps[1], reference),
            None => {
                unresolved.push(ExportError::RewriteUnresolvedReference {
                    folder_id: id.to_string(),
                });
                caps[0].to_string()
            }
        }
    });

    Rewritten {
        text: rewritten.into_owned(),
        unresolved,
    }
}

/// Dashboards text with final resource names
#[derive(Debug)]
pub struct FixedDashboards {
    pub text: String,
    /// Allocated dashboard resource names in declaration order
    pub names: Vec<String>,
}

/// Name left once the importer's `tfer--…-_` prefix and `-<hash>` suffix are removed
fn strip_importer_decorations(raw: &str) -> String {
    match IMPORTER_PREFIX.find(raw) {
        Some(prefix) => IMPORTER_SUFFIX.replace(&raw[prefix.end()..], "").into_owned(),
        None => raw.to_string(),
    }
}

/// Give every dashboard declaration a unique identifier-safe name and strip
/// a trailing `" - New"` from title attributes. Other lines are left as-is.
pub fn fix_dashboards(text: &str) -> FixedDashboards {
    let mut registry = ResourceNameRegistry::new(DASHBOARD_RESOURCE, "");
    let mut fixed = String::with_capacity(text.len());

    for (index, line) in text.split_inclusive('\n').enumerate() {
        let line = if let Some(caps) = DASHBOARD_DECLARATION.captures(line) {
            let label = strip_importer_decorations(&caps[2]);
            let name = registry.register(&index.to_string(), &label).name.clone();
            DASHBOARD_DECLARATION
                .replace(line, |caps: &Captures| format!("{}{}{}", &caps[1], name, &caps[3]))
                .into_owned()
        } else {
            TITLE_NEW_SUFFIX.replace(line, "$1$2").into_owned()
        };

        fixed.push_str(&line);
    }

    FixedDashboards {
        text: fixed,
        names: registry.names(),
    }
}

/// Outcome of post-processing the dashboards file in place
#[derive(Debug)]
pub struct PostProcessed {
    /// Dashboard resource names declared in the final file
    pub dashboards: Vec<String>,
    pub unresolved: Vec<ExportError>,
}

/// Rewrite folder ids, normalize names and titles, and save `path` in place
pub fn postprocess_dashboard_file(
    fs: &dyn FileSystem,
    path: &Path,
    root_id: &str,
    registry: &ResourceNameRegistry,
) -> ExportResult<PostProcessed> {
    let raw = fs
        .read_to_string(path)
        .map_err(|e| ExportError::Io(std::io::Error::other(format!("{:#}", e))))?;

    let rewritten = rewrite_folder_ids(&raw, root_id, registry);
    let fixed = fix_dashboards(&rewritten.text);

    fs.write(path, &fixed.text)
        .map_err(|e| ExportError::Io(std::io::Error::other(format!("{:#}", e))))?;

    Ok(PostProcessed {
        dashboards: fixed.names,
        unresolved: rewritten.unresolved,
    })
}
