use super::{DASHBOARD_RESOURCE, FOLDER_RESOURCE, SEARCH_RESOURCE};

/// Resource names collected for `output.tf`
#[derive(Debug, Clone, Default)]
pub struct OutputNames {
    pub dashboards: Vec<String>,
    pub folders: Vec<String>,
    pub searches: Vec<String>,
}

fn render_output(
    text: &mut String,
    output_name: &str,
    resource_type: &str,
    names: &[String],
    name_attribute: &str,
) {
    if names.is_empty() {
        return;
    }

    let entries: Vec<String> = names
        .iter()
        .map(|name| {
            format!(
                "    {{\n      \"id\" = {rt}.{n}.id,\n      \"name\" = {rt}.{n}.{attr},\n    }}",
                rt = resource_type,
                n = name,
                attr = name_attribute
            )
        })
        .collect();

    text.push_str(&format!("output \"{}\" {{\n", output_name));
    text.push_str(&format!("  description = \"all the {}\"\n", output_name));
    text.push_str("  value       = [\n");
    text.push_str(&entries.join(",\n"));
    text.push_str("\n  ]\n");
    text.push_str("}\n\n");
}

/// Render `output.tf`; kinds with no resources get no output block
pub fn render_outputs(names: &OutputNames) -> String {
    let mut text = String::new();
    render_output(
        &mut text,
        "dashboards",
        DASHBOARD_RESOURCE,
        &names.dashboards,
        "title",
    );
    render_output(&mut text, "folders", FOLDER_RESOURCE, &names.folders, "name");
    render_output(
        &mut text,
        "log_searches",
        SEARCH_RESOURCE,
        &names.searches,
        "name",
    );
    text
}
