use super::registry::ResourceNameRegistry;
use super::slug::hcl_string;
use super::{SEARCH_NOTIFICATION_SUBJECT, SEARCH_RESOURCE};
use crate::client::{ContentClient, ItemType, SearchDefinition};
use crate::content::FolderIndex;
use crate::error::{ExportError, ExportResult};

/// Resolves a saved search content id to its exported definition
pub trait SearchExporter {
    fn export_search(&self, content_id: &str) -> ExportResult<SearchDefinition>;
}

impl SearchExporter for ContentClient {
    fn export_search(&self, content_id: &str) -> ExportResult<SearchDefinition> {
        ContentClient::export_search(self, content_id)
    }
}

/// Rendered `log-searches.tf` plus the names allocated for each search
#[derive(Debug, Clone)]
pub struct SearchModule {
    pub text: String,
    pub registry: ResourceNameRegistry,
}

/// Export and render every saved search that is a direct child of a folder.
///
/// Export failures abort the run: the search resources are part of the module.
pub fn render_searches(
    folders: &FolderIndex,
    folder_registry: &ResourceNameRegistry,
    exporter: &dyn SearchExporter,
) -> ExportResult<SearchModule> {
    let mut registry = ResourceNameRegistry::new(SEARCH_RESOURCE, "");
    let mut text = String::new();

    for folder in folders.iter() {
        let parent_ref =
            folder_registry
                .reference(&folder.id)
                .ok_or_else(|| ExportError::NotFound {
                    id: folder.id.clone(),
                })?;

        for child in folder
            .children
            .iter()
            .filter(|c| c.item_type == ItemType::Search)
        {
            let mut definition = exporter.export_search(&child.id)?;
            if definition.name.is_empty() {
                definition.name = child.name.clone();
            }
            let resource_name = registry.register(&child.id, &definition.name).name.clone();

            text.push_str(&render_search(&definition, &resource_name, &parent_ref));
            text.push('\n');
        }
    }

    Ok(SearchModule { text, registry })
}

fn relative_time_range(text: &mut String, indent: &str, relative_time: &str) {
    text.push_str(&format!("{indent}begin_bounded_time_range {{\n"));
    text.push_str(&format!("{indent}  from {{\n"));
    text.push_str(&format!("{indent}    relative_time_range {{\n"));
    text.push_str(&format!(
        "{indent}      relative_time = {}\n",
        hcl_string(relative_time)
    ));
    text.push_str(&format!("{indent}    }}\n"));
    text.push_str(&format!("{indent}  }}\n"));
    text.push_str(&format!("{indent}}}\n"));
}

/// Render one `sumologic_log_search` resource block.
///
/// Optional attributes are omitted rather than emitted empty.
pub fn render_search(definition: &SearchDefinition, resource_name: &str, parent_ref: &str) -> String {
    let search = &definition.search;
    let mut text = String::new();

    text.push_str(&format!(
        "resource \"{}\" \"{}\" {{\n",
        SEARCH_RESOURCE, resource_name
    ));
    text.push_str(&format!("  name = {}\n", hcl_string(&definition.name)));
    text.push_str(&format!("  parent_id = {}\n", parent_ref));
    text.push_str(&format!(
        "  query_string = {}\n",
        hcl_string(&search.query_text)
    ));

    if let Some(description) = definition.description.as_deref()
        && !description.is_empty()
    {
        text.push_str(&format!("  description = {}\n", hcl_string(description)));
    }
    if let Some(mode) = search.parsing_mode.as_deref()
        && !mode.is_empty()
    {
        text.push_str(&format!("  parsing_mode = {}\n", hcl_string(mode)));
    }
    if let Some(by_receipt_time) = search.by_receipt_time {
        text.push_str(&format!("  run_by_receipt_time = {}\n", by_receipt_time));
    }

    text.push_str("\n  time_range {\n");
    relative_time_range(&mut text, "    ", &search.default_time_range);
    text.push_str("  }\n");

    if let Some(schedule) = &definition.search_schedule {
        text.push_str("\n  schedule {\n");
        text.push_str(&format!(
            "    cron_expression = {}\n",
            hcl_string(&schedule.cron_expression)
        ));
        text.push_str(&format!(
            "    displayable_time_range = {}\n",
            hcl_string(&schedule.displayable_time_range)
        ));
        text.push_str(&format!(
            "    time_zone = {}\n",
            hcl_string(&schedule.time_zone)
        ));
        if let Some(mute) = schedule.mute_error_emails {
            text.push_str(&format!("    mute_error_emails = {}\n", mute));
        }
        if let Some(schedule_type) = schedule.schedule_type.as_deref()
            && !schedule_type.is_empty()
        {
            text.push_str(&format!(
                "    schedule_type = {}\n",
                hcl_string(schedule_type)
            ));
        }

        text.push_str("\n    parseable_time_range {\n");
        relative_time_range(&mut text, "      ", schedule.relative_from());
        text.push_str("    }\n");

        if let Some(threshold) = &schedule.threshold {
            text.push_str("\n    threshold {\n");
            text.push_str(&format!("      count = {}\n", threshold.count));
            text.push_str(&format!(
                "      operator = {}\n",
                hcl_string(&threshold.operator)
            ));
            text.push_str(&format!(
                "      threshold_type = {}\n",
                hcl_string(&threshold.threshold_type)
            ));
            text.push_str("    }\n");
        }

        if let Some(notification) = &schedule.notification {
            let view_name = notification.view_name.as_deref().unwrap_or("");
            text.push_str("\n    notification {\n");
            text.push_str("      email_search_notification {\n");
            text.push_str("        include_csv_attachment = false\n");
            text.push_str("        include_histogram = false\n");
            text.push_str("        include_query = true\n");
            text.push_str("        include_result_set = true\n");
            text.push_str(&format!(
                "        subject_template = {}\n",
                hcl_string(SEARCH_NOTIFICATION_SUBJECT)
            ));
            text.push_str("        to_list = [\n");
            text.push_str(&format!("          {},\n", hcl_string(view_name)));
            text.push_str("        ]\n");
            text.push_str("      }\n");
            text.push_str("    }\n");
        }

        text.push_str("  }\n");
    }

    text.push_str("}\n");
    text
}
