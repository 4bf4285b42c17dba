//! Tag-management (GTM) container aggregations

use super::{group_in_order, tally, Counts};
use crate::domain::gtm::{ANALYSIS_DESTINATION_KEYS, SUMMARY_DESTINATION_KEYS};
use crate::domain::{ContainerType, GtmExport};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Triggers listed in [`DataFlowAnalysis::most_used_triggers`]
pub const MOST_USED_TRIGGERS: usize = 10;

const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerInfo {
    pub container_name: String,
    pub public_id: String,
    pub container_type: ContainerType,
    pub account_id: String,
    pub container_id: String,
    pub export_time: String,
    pub tagging_server_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagsSummary {
    pub total_tags: usize,
    pub active_tags: usize,
    pub paused_tags: usize,
    pub tag_types: Counts,
    pub destinations: Counts,
    pub unique_destinations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariablesSummary {
    pub total_variables: usize,
    pub variable_types: Counts,
    pub unique_variable_types: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggersSummary {
    pub total_triggers: usize,
    pub trigger_types: Counts,
    pub unique_trigger_types: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagItem {
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: String,
    pub tag_id: String,
    pub paused: bool,
    pub firing_triggers: usize,
    pub blocking_triggers: usize,
    pub parameters_count: usize,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationTag {
    pub tag_name: String,
    pub tag_type: String,
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationStats {
    pub total_tags: usize,
    pub active_tags: usize,
    pub paused_tags: usize,
    pub tag_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationAnalysis {
    pub destinations: BTreeMap<String, Vec<DestinationTag>>,
    pub destination_summary: BTreeMap<String, DestinationStats>,
    pub total_destinations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagTriggers {
    pub tag_name: String,
    pub firing_triggers: Vec<String>,
    pub blocking_triggers: Vec<String>,
    pub total_conditions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerUsage {
    pub trigger_name: String,
    pub usage_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataFlowAnalysis {
    pub tag_trigger_relationships: Vec<TagTriggers>,
    pub most_used_triggers: Vec<TriggerUsage>,
    pub total_relationships: usize,
    pub avg_conditions_per_tag: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GtmOverview {
    pub platform: String,
    pub container_name: String,
    pub public_id: String,
    pub total_tags: usize,
    pub active_tags: usize,
    pub paused_tags: usize,
    pub total_variables: usize,
    pub total_triggers: usize,
    pub total_destinations: usize,
    pub container_type: ContainerType,
    pub last_updated: String,
}

pub fn container_info(export: &GtmExport) -> ContainerInfo {
    let container = &export.container_version.container;
    ContainerInfo {
        container_name: container.name.clone(),
        public_id: container.public_id.clone(),
        container_type: container.container_type(),
        account_id: container.account_id.clone(),
        container_id: container.container_id.clone(),
        export_time: export.export_time.clone(),
        tagging_server_urls: container.tagging_server_urls.clone(),
    }
}

pub fn tags_summary(export: &GtmExport) -> TagsSummary {
    let tags = &export.container_version.tag;
    let paused_tags = tags.iter().filter(|t| t.paused).count();

    // Every destination parameter on a tag counts, not only the first
    let mut destinations = Counts::new();
    for param in tags.iter().flat_map(|tag| tag.parameter.iter()) {
        if SUMMARY_DESTINATION_KEYS.contains(&param.key.as_str()) {
            *destinations.entry(param.value_text()).or_insert(0) += 1;
        }
    }

    TagsSummary {
        total_tags: tags.len(),
        active_tags: tags.len() - paused_tags,
        paused_tags,
        tag_types: tally(tags.iter().map(|t| t.tag_type.as_deref().unwrap_or(UNKNOWN))),
        unique_destinations: destinations.len(),
        destinations,
    }
}

pub fn variables_summary(export: &GtmExport) -> VariablesSummary {
    let variables = &export.container_version.variable;
    let variable_types = tally(
        variables
            .iter()
            .map(|v| v.variable_type.as_deref().unwrap_or(UNKNOWN)),
    );
    VariablesSummary {
        total_variables: variables.len(),
        unique_variable_types: variable_types.len(),
        variable_types,
    }
}

pub fn triggers_summary(export: &GtmExport) -> TriggersSummary {
    let triggers = &export.container_version.trigger;
    let trigger_types = tally(
        triggers
            .iter()
            .map(|t| t.trigger_type.as_deref().unwrap_or(UNKNOWN)),
    );
    TriggersSummary {
        total_triggers: triggers.len(),
        unique_trigger_types: trigger_types.len(),
        trigger_types,
    }
}

pub fn tags_list(export: &GtmExport) -> Vec<TagItem> {
    export
        .container_version
        .tag
        .iter()
        .map(|tag| TagItem {
            name: tag.name.clone(),
            tag_type: tag.tag_type.clone().unwrap_or_default(),
            tag_id: tag.tag_id.clone(),
            paused: tag.paused,
            firing_triggers: tag.firing_trigger_id.len(),
            blocking_triggers: tag.blocking_trigger_id.len(),
            parameters_count: tag.parameter.len(),
            destination: tag
                .destination(&SUMMARY_DESTINATION_KEYS)
                .unwrap_or_else(|| UNKNOWN.to_string()),
        })
        .collect()
}

/// Tags grouped by the system they send data to
pub fn destination_analysis(export: &GtmExport) -> DestinationAnalysis {
    let groups = group_in_order(export.container_version.tag.iter().map(|tag| {
        (
            tag.destination(&ANALYSIS_DESTINATION_KEYS)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            DestinationTag {
                tag_name: tag.name.clone(),
                tag_type: tag.tag_type.clone().unwrap_or_default(),
                paused: tag.paused,
            },
        )
    }));

    let destination_summary = groups
        .iter()
        .map(|(destination, tags)| {
            let active_tags = tags.iter().filter(|t| !t.paused).count();
            let mut tag_types: Vec<String> = Vec::new();
            for tag in tags {
                if !tag_types.contains(&tag.tag_type) {
                    tag_types.push(tag.tag_type.clone());
                }
            }
            (
                destination.clone(),
                DestinationStats {
                    total_tags: tags.len(),
                    active_tags,
                    paused_tags: tags.len() - active_tags,
                    tag_types,
                },
            )
        })
        .collect();

    DestinationAnalysis {
        total_destinations: groups.len(),
        destinations: groups.into_iter().collect(),
        destination_summary,
    }
}

/// How tags are wired to their firing and blocking triggers
pub fn data_flow_analysis(export: &GtmExport) -> DataFlowAnalysis {
    let version = &export.container_version;
    let trigger_names: HashMap<&str, &str> = version
        .trigger
        .iter()
        .map(|t| (t.trigger_id.as_str(), t.name.as_str()))
        .collect();
    let resolve = |id: &String| -> String {
        trigger_names
            .get(id.as_str())
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("Unknown_{id}"))
    };

    let relationships: Vec<TagTriggers> = version
        .tag
        .iter()
        .map(|tag| TagTriggers {
            tag_name: tag.name.clone(),
            firing_triggers: tag.firing_trigger_id.iter().map(resolve).collect(),
            blocking_triggers: tag.blocking_trigger_id.iter().map(resolve).collect(),
            total_conditions: tag.firing_trigger_id.len() + tag.blocking_trigger_id.len(),
        })
        .collect();

    let usage = group_in_order(version.tag.iter().flat_map(|tag| {
        tag.firing_trigger_id
            .iter()
            .chain(tag.blocking_trigger_id.iter())
            .map(|id| (id, ()))
    }));
    let mut most_used_triggers: Vec<TriggerUsage> = usage
        .into_iter()
        .map(|(id, uses)| TriggerUsage {
            trigger_name: resolve(id),
            usage_count: uses.len(),
        })
        .collect();
    most_used_triggers.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    most_used_triggers.truncate(MOST_USED_TRIGGERS);

    let avg_conditions_per_tag = if relationships.is_empty() {
        0.0
    } else {
        relationships.iter().map(|r| r.total_conditions).sum::<usize>() as f64
            / relationships.len() as f64
    };

    DataFlowAnalysis {
        total_relationships: relationships.len(),
        tag_trigger_relationships: relationships,
        most_used_triggers,
        avg_conditions_per_tag,
    }
}

pub fn platform_overview(export: &GtmExport) -> GtmOverview {
    let info = container_info(export);
    let tags = tags_summary(export);

    GtmOverview {
        platform: format!("GTM ({})", info.container_type),
        container_name: info.container_name,
        public_id: info.public_id,
        total_tags: tags.total_tags,
        active_tags: tags.active_tags,
        paused_tags: tags.paused_tags,
        total_variables: export.container_version.variable.len(),
        total_triggers: export.container_version.trigger.len(),
        total_destinations: destination_analysis(export).total_destinations,
        container_type: info.container_type,
        last_updated: info.export_time,
    }
}
