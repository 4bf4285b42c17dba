//! Marketing-automation (Insider) aggregations

use super::{group_in_order, tally, Counts};
use crate::domain::{InsiderEvent, InsiderParam};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Bucket for events without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Parameters listed in [`ParameterUsage::most_common_params`]
pub const MOST_COMMON_PARAMS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsiderEventsSummary {
    pub total_events: usize,
    pub categorized_events: usize,
    pub pii_events: usize,
    pub segmentation_events: usize,
    pub categories: Counts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParametersSummary {
    pub total_properties: usize,
    pub unique_properties: usize,
    pub param_types: Counts,
    pub pii_params: usize,
    pub segmentation_params: usize,
    pub named_params: usize,
    pub unnamed_params: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsiderEventItem {
    pub key: String,
    pub display_name: String,
    pub category: String,
    pub is_pii: bool,
    pub params_count: usize,
    pub pii_params_count: usize,
    pub segmentation_params_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterItem {
    pub key: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub is_pii: bool,
    pub show_on_segment: bool,
}

/// A parameter occurrence together with the event that declares it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDetail {
    pub key: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub is_pii: bool,
    pub show_on_segment: bool,
    pub event_key: String,
    pub event_display_name: String,
    pub event_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInstance {
    pub display_name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub is_pii: bool,
    pub show_on_segment: bool,
    pub event_key: String,
    pub event_display_name: String,
    pub event_category: String,
}

/// A parameter key aggregated over every event that declares it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueParameter {
    pub key: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub is_pii: bool,
    pub show_on_segment: bool,
    pub usage_count: usize,
    pub events_list: Vec<String>,
    pub is_type_consistent: bool,
    pub is_pii_consistent: bool,
    pub is_segment_consistent: bool,
    pub all_instances: Vec<ParameterInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamUsageCount {
    pub param: String,
    pub events_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamUsageDetail {
    pub event_key: String,
    pub event_display_name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub is_pii: bool,
    pub show_on_segment: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterUsage {
    pub total_unique_params: usize,
    pub reused_params_count: usize,
    pub unique_params_count: usize,
    pub most_common_params: Vec<ParamUsageCount>,
    pub reused_params: BTreeMap<String, usize>,
    pub param_details: BTreeMap<String, Vec<ParamUsageDetail>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeStats {
    pub count: usize,
    pub pii_count: usize,
    pub segmentation_count: usize,
    pub events_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsiderOverview {
    pub platform: String,
    pub total_events: usize,
    pub total_properties: usize,
    pub unique_properties: usize,
    pub pii_events: usize,
    pub segmentation_events: usize,
    pub categories_count: usize,
    pub last_updated: String,
}

fn has_pii_param(event: &InsiderEvent) -> bool {
    event.params.iter().any(|p| p.is_pii)
}

fn has_segment_param(event: &InsiderEvent) -> bool {
    event.params.iter().any(|p| p.show_on_segment)
}

fn all_params<'a>(
    events: &'a [InsiderEvent],
) -> impl Iterator<Item = (&'a InsiderEvent, &'a InsiderParam)> {
    events
        .iter()
        .flat_map(|event| event.params.iter().map(move |param| (event, param)))
}

pub fn events_summary(events: &[InsiderEvent]) -> InsiderEventsSummary {
    InsiderEventsSummary {
        total_events: events.len(),
        categorized_events: events.iter().filter(|e| !e.category().is_empty()).count(),
        pii_events: events.iter().filter(|e| has_pii_param(e)).count(),
        segmentation_events: events.iter().filter(|e| has_segment_param(e)).count(),
        categories: tally(events.iter().map(|e| match e.category() {
            "" => UNCATEGORIZED,
            category => category,
        })),
    }
}

pub fn parameters_summary(events: &[InsiderEvent]) -> ParametersSummary {
    let params: Vec<&InsiderParam> = all_params(events).map(|(_, p)| p).collect();
    let named_params = params.iter().filter(|p| !p.display_name.is_empty()).count();

    ParametersSummary {
        total_properties: params.len(),
        unique_properties: params
            .iter()
            .map(|p| p.key.as_str())
            .collect::<HashSet<_>>()
            .len(),
        param_types: tally(params.iter().map(|p| p.type_or_unknown())),
        pii_params: params.iter().filter(|p| p.is_pii).count(),
        segmentation_params: params.iter().filter(|p| p.show_on_segment).count(),
        named_params,
        unnamed_params: params.len() - named_params,
    }
}

pub fn events_list(events: &[InsiderEvent]) -> Vec<InsiderEventItem> {
    events
        .iter()
        .map(|event| InsiderEventItem {
            key: event.key.clone(),
            display_name: event.display_name.clone(),
            category: event.category().to_string(),
            is_pii: event.is_pii,
            params_count: event.params.len(),
            pii_params_count: event.params.iter().filter(|p| p.is_pii).count(),
            segmentation_params_count: event.params.iter().filter(|p| p.show_on_segment).count(),
        })
        .collect()
}

fn parameter_item(param: &InsiderParam) -> ParameterItem {
    ParameterItem {
        key: param.key.clone(),
        display_name: param.display_name.clone(),
        value_type: param.value_type().to_string(),
        is_pii: param.is_pii,
        show_on_segment: param.show_on_segment,
    }
}

/// Parameters keyed by event key; a repeated event key keeps its last definition
pub fn parameters_by_event(events: &[InsiderEvent]) -> BTreeMap<String, Vec<ParameterItem>> {
    events
        .iter()
        .map(|event| {
            (
                event.key.clone(),
                event.params.iter().map(parameter_item).collect(),
            )
        })
        .collect()
}

pub fn all_parameters_detailed(events: &[InsiderEvent]) -> Vec<ParameterDetail> {
    all_params(events)
        .map(|(event, param)| ParameterDetail {
            key: param.key.clone(),
            display_name: param.display_name.clone(),
            value_type: param.value_type().to_string(),
            is_pii: param.is_pii,
            show_on_segment: param.show_on_segment,
            event_key: event.key.clone(),
            event_display_name: event.display_name.clone(),
            event_category: event.category().to_string(),
        })
        .collect()
}

/// Most frequent value, ties resolved by first encounter
fn most_frequent<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for (value, hits) in group_in_order(values.into_iter().map(|v| (v, ()))) {
        if best.map_or(true, |(_, count)| hits.len() > count) {
            best = Some((value, hits.len()));
        }
    }
    best.map(|(value, _)| value)
}

fn is_uniform<T: PartialEq>(values: &[T]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

/// Parameters de-duplicated by key, most used first
pub fn unique_parameters(events: &[InsiderEvent]) -> Vec<UniqueParameter> {
    let groups = group_in_order(all_params(events).map(|(event, param)| {
        (
            param.key.clone(),
            ParameterInstance {
                display_name: param.display_name.clone(),
                value_type: param.value_type().to_string(),
                is_pii: param.is_pii,
                show_on_segment: param.show_on_segment,
                event_key: event.key.clone(),
                event_display_name: event.display_name.clone(),
                event_category: event.category().to_string(),
            },
        )
    }));

    let mut unique: Vec<UniqueParameter> = groups
        .into_iter()
        .map(|(key, instances)| {
            let types: Vec<&str> = instances.iter().map(|i| i.value_type.as_str()).collect();
            let pii: Vec<bool> = instances.iter().map(|i| i.is_pii).collect();
            let segment: Vec<bool> = instances.iter().map(|i| i.show_on_segment).collect();

            UniqueParameter {
                key,
                display_name: most_frequent(
                    instances
                        .iter()
                        .map(|i| i.display_name.as_str())
                        .filter(|name| !name.is_empty()),
                )
                .unwrap_or("")
                .to_string(),
                value_type: most_frequent(types.iter().copied())
                    .unwrap_or("unknown")
                    .to_string(),
                is_pii: pii.iter().any(|&p| p),
                show_on_segment: segment.iter().any(|&s| s),
                usage_count: instances.len(),
                events_list: instances.iter().map(|i| i.event_key.clone()).collect(),
                is_type_consistent: is_uniform(&types),
                is_pii_consistent: is_uniform(&pii),
                is_segment_consistent: is_uniform(&segment),
                all_instances: instances,
            }
        })
        .collect();

    unique.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    unique
}

/// Reuse of parameter keys across events
pub fn parameter_usage(events: &[InsiderEvent]) -> ParameterUsage {
    let groups = group_in_order(all_params(events).map(|(event, param)| {
        (
            param.key.clone(),
            ParamUsageDetail {
                event_key: event.key.clone(),
                event_display_name: event.display_name.clone(),
                display_name: param.display_name.clone(),
                value_type: param.value_type().to_string(),
                is_pii: param.is_pii,
                show_on_segment: param.show_on_segment,
            },
        )
    }));

    let mut ranked: Vec<ParamUsageCount> = groups
        .iter()
        .map(|(key, details)| ParamUsageCount {
            param: key.clone(),
            events_count: details.len(),
        })
        .collect();
    ranked.sort_by(|a, b| b.events_count.cmp(&a.events_count));
    ranked.truncate(MOST_COMMON_PARAMS);

    let reused_params: BTreeMap<String, usize> = groups
        .iter()
        .filter(|(_, details)| details.len() > 1)
        .map(|(key, details)| (key.clone(), details.len()))
        .collect();
    let unique_params_count = groups.iter().filter(|(_, d)| d.len() == 1).count();

    ParameterUsage {
        total_unique_params: groups.len(),
        reused_params_count: reused_params.len(),
        unique_params_count,
        most_common_params: ranked,
        reused_params,
        param_details: groups.into_iter().collect(),
    }
}

/// Parameter counts per declared type
pub fn parameter_types(events: &[InsiderEvent]) -> BTreeMap<String, TypeStats> {
    let mut stats: BTreeMap<String, (TypeStats, HashSet<&str>)> = BTreeMap::new();

    for (event, param) in all_params(events) {
        let (entry, event_keys) = stats
            .entry(param.type_or_unknown().to_string())
            .or_default();
        entry.count += 1;
        if param.is_pii {
            entry.pii_count += 1;
        }
        if param.show_on_segment {
            entry.segmentation_count += 1;
        }
        event_keys.insert(event.key.as_str());
    }

    stats
        .into_iter()
        .map(|(value_type, (mut entry, event_keys))| {
            entry.events_count = event_keys.len();
            (value_type, entry)
        })
        .collect()
}

pub fn platform_overview(
    events: &InsiderEventsSummary,
    parameters: &ParametersSummary,
) -> InsiderOverview {
    InsiderOverview {
        platform: "Insider".to_string(),
        total_events: events.total_events,
        total_properties: parameters.total_properties,
        unique_properties: parameters.unique_properties,
        pii_events: events.pii_events,
        segmentation_events: events.segmentation_events,
        categories_count: events.categories.len(),
        last_updated: "Data export timestamp not available".to_string(),
    }
}
