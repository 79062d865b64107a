//! Dashboard preview screenshots: report job, crop, save, manifest entry

pub mod crop;
pub mod manifest;

use std::path::{Component, Path, PathBuf};

use serde_json::{Value, json};

use crate::client::content::{expect_ok, parse_json};
use crate::client::model::JobHandle;
use crate::client::{ContentClient, Dashboard, PollSettings, wait_for_job};
use crate::context::Context;
use crate::error::{ExportError, ExportResult};
use crate::terraform::slugify_name;

use crop::crop_png;
use manifest::{MediaEntry, insert_media_entry};

const REPORT_TIMEZONE: &str = "America/Los_Angeles";
const REPORT_RANGE: &str = "-24h";

/// Directory (relative to the destination) holding preview images
pub const PREVIEW_DIR: &str = "assets/images/preview";

/// Request body for a PNG report of `dashboard`. Every dashboard variable is
/// pinned to its default value, or `*` when it has none.
pub fn report_payload(dashboard: &Dashboard) -> Value {
    let mut payload = json!({
        "action": { "actionType": "DirectDownloadReportAction" },
        "exportFormat": "Png",
        "timezone": REPORT_TIMEZONE,
        "template": {
            "templateType": "DashboardTemplate",
            "id": dashboard.id,
            "timeRange": {
                "type": "BeginBoundedTimeRange",
                "from": {
                    "type": "RelativeTimeRangeBoundary",
                    "relativeTime": REPORT_RANGE,
                },
            },
        },
    });

    if !dashboard.variables.is_empty() {
        let data: serde_json::Map<String, Value> = dashboard
            .variables
            .iter()
            .map(|v| {
                let value = v.default_value.clone().unwrap_or_else(|| "*".to_string());
                (v.name.clone(), json!([value]))
            })
            .collect();
        payload["template"]["variableValues"] = json!({ "data": data });
    }

    payload
}

/// Render a dashboard through a report job and download the PNG bytes
pub fn capture(
    client: &ContentClient,
    dashboard: &Dashboard,
    poll: PollSettings,
) -> ExportResult<Vec<u8>> {
    let endpoints = client.endpoints();
    let response = client.post(&endpoints.report_jobs(), Some(&report_payload(dashboard)))?;
    expect_ok(&response, || {
        format!("Create report job for dashboard {}", dashboard.id)
    })?;
    let job: JobHandle = parse_json(&response)?;

    let status_url = endpoints.report_job_status(&job.id);
    let outcome = wait_for_job(
        &format!("Screenshot of dashboard {}", dashboard.id),
        || client.job_status(&status_url),
        "success",
        "failed",
        poll,
    )?;

    if !outcome.ok {
        return Err(ExportError::JobFailed {
            job_id: job.id,
            message: outcome.message,
        });
    }

    let response = client.get(&endpoints.report_job_result(&job.id), &[])?;
    expect_ok(&response, || {
        format!("Download report for dashboard {}", dashboard.id)
    })?;

    Ok(response.body)
}

/// Forward-slash path of `image` relative to the manifest's directory.
///
/// Stepping out of that directory yields `../` segments; otherwise the
/// path is `./`-prefixed. Mixed absolute and relative inputs keep `image`.
pub fn manifest_location(image: &Path, manifest: &Path) -> String {
    let base = manifest.parent().unwrap_or(Path::new(""));
    if base.has_root() != image.has_root() {
        return image.to_string_lossy().replace('\\', "/");
    }

    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let target: Vec<Component> = image.components().filter(|c| *c != Component::CurDir).collect();
    let shared = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = vec!["..".to_string(); base.len() - shared];
    segments.extend(
        target[shared..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    let location = segments.join("/");

    if shared < base.len() {
        location
    } else {
        format!("./{}", location)
    }
}

/// Screenshots saved and failures collected by one batch
#[derive(Debug, Default)]
pub struct ScreenshotReport {
    pub saved: Vec<PathBuf>,
    pub failures: Vec<(String, ExportError)>,
}

/// Capture, crop and register a preview image for every dashboard.
///
/// Failures are collected per dashboard; the batch always runs to the end.
pub fn capture_all(
    ctx: &Context,
    client: &ContentClient,
    dashboards: &[Dashboard],
    dest: &Path,
    manifest_path: &Path,
    poll: PollSettings,
) -> ScreenshotReport {
    let mut report = ScreenshotReport::default();

    for dashboard in dashboards {
        ctx.output
            .dimmed(&format!("Capturing screenshot of {}", dashboard.title));

        match save_screenshot(ctx, client, dashboard, dest, manifest_path, poll) {
            Ok(path) => {
                ctx.output.list_item(&path.display().to_string());
                report.saved.push(path);
            }
            Err(e) => {
                ctx.output.warning(&format!(
                    "Screenshot of '{}' failed: {}",
                    dashboard.title, e
                ));
                report.failures.push((dashboard.title.clone(), e));
            }
        }
    }

    report
}

fn save_screenshot(
    ctx: &Context,
    client: &ContentClient,
    dashboard: &Dashboard,
    dest: &Path,
    manifest_path: &Path,
    poll: PollSettings,
) -> ExportResult<PathBuf> {
    let png = capture(client, dashboard, poll)?;
    let cropped = crop_png(&png)?;

    let file_name = format!("{}.png", slugify_name(&dashboard.title));
    let image_path = dest.join(PREVIEW_DIR).join(file_name);
    ctx.fs
        .write_bytes(&image_path, &cropped)
        .map_err(|e| ExportError::Io(std::io::Error::other(format!("{:#}", e))))?;

    let manifest = ctx
        .fs
        .read_to_string(manifest_path)
        .map_err(|e| ExportError::Io(std::io::Error::other(format!("{:#}", e))))?;
    let entry = MediaEntry {
        title: dashboard.title.clone(),
        description: dashboard.description.clone().unwrap_or_default(),
        location: manifest_location(&image_path, manifest_path),
    };
    let updated = insert_media_entry(&manifest, &entry)?;
    ctx.fs
        .write(manifest_path, &updated)
        .map_err(|e| ExportError::Io(std::io::Error::other(format!("{:#}", e))))?;

    Ok(image_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::crop::DARK_BACKGROUND;
    use crate::client::model::DashboardVariable;
    use crate::client::{Endpoints, MockHttpClient};
    use crate::traits::{FileSystem, MockCommandExecutor, MockFileSystem, MockOutput};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::Duration;

    const BASE: &str = "http://api.test/api/";

    fn dashboard(id: &str, title: &str, variables: Vec<DashboardVariable>) -> Dashboard {
        Dashboard {
            id: id.to_string(),
            content_id: format!("C-{}", id),
            title: title.to_string(),
            description: Some("Overview of errors".to_string()),
            folder_id: None,
            variables,
        }
    }

    fn fast() -> PollSettings {
        PollSettings::new(Duration::from_millis(5), Duration::from_secs(2))
    }

    fn png() -> Vec<u8> {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba(DARK_BACKGROUND));
        img.put_pixel(2, 3, Rgba([255, 255, 255, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_payload_defaults_variables_to_wildcard() {
        let payload = report_payload(&dashboard(
            "D1",
            "Errors",
            vec![
                DashboardVariable {
                    name: "host".to_string(),
                    default_value: None,
                },
                DashboardVariable {
                    name: "env".to_string(),
                    default_value: Some("prod".to_string()),
                },
            ],
        ));

        assert_eq!(payload["template"]["id"], "D1");
        assert_eq!(payload["timezone"], "America/Los_Angeles");
        assert_eq!(payload["template"]["timeRange"]["from"]["relativeTime"], "-24h");
        assert_eq!(payload["template"]["variableValues"]["data"]["host"], json!(["*"]));
        assert_eq!(payload["template"]["variableValues"]["data"]["env"], json!(["prod"]));
    }

    #[test]
    fn test_payload_without_variables() {
        let payload = report_payload(&dashboard("D1", "Errors", Vec::new()));
        assert!(payload["template"].get("variableValues").is_none());
    }

    #[test]
    fn test_manifest_location() {
        assert_eq!(
            manifest_location(
                Path::new("/dest/assets/images/preview/Errors.png"),
                Path::new("/dest/manifest.yaml")
            ),
            "./assets/images/preview/Errors.png"
        );
    }

    #[test]
    fn test_manifest_location_outside_destination() {
        assert_eq!(
            manifest_location(
                Path::new("/work/dest/assets/images/preview/Errors.png"),
                Path::new("/work/app/manifest.yaml")
            ),
            "../dest/assets/images/preview/Errors.png"
        );
        assert_eq!(
            manifest_location(
                Path::new("out/assets/Errors.png"),
                Path::new("apps/demo/manifest.yaml")
            ),
            "../../out/assets/Errors.png"
        );
        assert_eq!(
            manifest_location(Path::new("Errors.png"), Path::new("manifest.yaml")),
            "./Errors.png"
        );
    }

    #[test]
    fn test_capture_all_saves_cropped_image_and_updates_manifest() {
        let http = Arc::new(MockHttpClient::new());
        http.on_post(&format!("{}v2/dashboards/reportJobs", BASE), 200, r#"{"id":"J1"}"#);
        http.on_get(
            &format!("{}v2/dashboards/reportJobs/J1/status", BASE),
            200,
            r#"{"status":"InProgress"}"#,
        );
        http.on_get(
            &format!("{}v2/dashboards/reportJobs/J1/status", BASE),
            200,
            r#"{"status":"Success"}"#,
        );
        http.on_get(&format!("{}v2/dashboards/reportJobs/J1/result", BASE), 200, png());

        let fs = Arc::new(MockFileSystem::new());
        fs.write(Path::new("/dest/manifest.yaml"), "name: app\nappMedia:\n\n")
            .unwrap();
        let ctx = Context::test_with(
            fs.clone(),
            Arc::new(MockOutput::new()),
            Arc::new(MockCommandExecutor::new()),
            http.clone(),
        );
        let client = ContentClient::new(http.clone(), Endpoints::new(BASE).unwrap());

        let report = capture_all(
            &ctx,
            &client,
            &[dashboard("D1", "AWS EC2 - Overview", Vec::new())],
            Path::new("/dest"),
            Path::new("/dest/manifest.yaml"),
            fast(),
        );

        assert!(report.failures.is_empty());
        let image_path = PathBuf::from("/dest/assets/images/preview/AWS-EC2-Overview.png");
        assert_eq!(report.saved, vec![image_path.clone()]);

        let saved = fs.get_file_bytes(&image_path).unwrap();
        let decoded = image::load_from_memory_with_format(&saved, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 4));

        let manifest = fs.get_file_contents(Path::new("/dest/manifest.yaml")).unwrap();
        assert!(manifest.contains("  - title: \"AWS EC2 - Overview\"\n"));
        assert!(manifest.contains("    location: \"./assets/images/preview/AWS-EC2-Overview.png\"\n"));
    }

    #[test]
    fn test_failed_report_job_is_collected() {
        let http = Arc::new(MockHttpClient::new());
        http.on_post(&format!("{}v2/dashboards/reportJobs", BASE), 200, r#"{"id":"J1"}"#);
        http.on_get(
            &format!("{}v2/dashboards/reportJobs/J1/status", BASE),
            200,
            r#"{"status":"Failed","statusMessage":"render error"}"#,
        );
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(
            Arc::new(MockFileSystem::new()),
            output.clone(),
            Arc::new(MockCommandExecutor::new()),
            http.clone(),
        );
        let client = ContentClient::new(http.clone(), Endpoints::new(BASE).unwrap());

        let report = capture_all(
            &ctx,
            &client,
            &[dashboard("D1", "Errors", Vec::new())],
            Path::new("/dest"),
            Path::new("/dest/manifest.yaml"),
            fast(),
        );

        assert!(report.saved.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0].1,
            ExportError::JobFailed { message, .. } if message == "render error"
        ));
        assert_eq!(output.get_warnings().len(), 1);
    }
}
