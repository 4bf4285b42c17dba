//! JSON view models served by the dashboard routes

use crate::core::acquisition::UsageRecords;
use crate::core::aggregate::gtm::{
    self, ContainerInfo, DataFlowAnalysis, DestinationAnalysis, GtmOverview, TagItem,
    TagsSummary, TriggersSummary, VariablesSummary,
};
use crate::core::aggregate::insider::{
    self, InsiderEventItem, InsiderEventsSummary, InsiderOverview, ParameterDetail,
    ParameterItem, ParameterUsage, ParametersSummary, TypeStats, UniqueParameter,
};
use crate::core::aggregate::usage::{
    EventsSummary, PropertiesByEvent, PropertiesSummary, UsageOverview,
};
use crate::domain::{Category, EventRecord, GtmExport, InsiderEvent, UniqueProperty};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DASHBOARD_TITLE: &str = "Data Tracking Plan Dashboard";

/// One platform card on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlatformOverview {
    Usage(UsageOverview),
    Insider(InsiderOverview),
    Gtm(GtmOverview),
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub platforms: Vec<PlatformOverview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AmplitudeView {
    pub overview: UsageOverview,
    pub events_summary: EventsSummary,
    pub properties_summary: PropertiesSummary,
    pub categories: Vec<Category>,
    pub events_list: Vec<EventRecord>,
    pub properties_by_event: PropertiesByEvent,
    pub unique_properties_list: Vec<UniqueProperty>,
}

impl AmplitudeView {
    pub fn new(overview: UsageOverview, records: UsageRecords) -> Self {
        Self {
            overview,
            events_summary: records.events_summary(),
            properties_summary: records.properties_summary(),
            unique_properties_list: records.unique_properties(),
            categories: records.categories,
            events_list: records.events,
            properties_by_event: records.properties_by_event,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InsiderView {
    pub overview: InsiderOverview,
    pub events_summary: InsiderEventsSummary,
    pub properties_summary: ParametersSummary,
    pub events_list: Vec<InsiderEventItem>,
    pub parameter_usage: ParameterUsage,
    pub parameters_by_event: BTreeMap<String, Vec<ParameterItem>>,
    pub all_parameters: Vec<ParameterDetail>,
    pub unique_parameters_list: Vec<UniqueParameter>,
    pub parameter_type_analysis: BTreeMap<String, TypeStats>,
}

impl InsiderView {
    pub fn new(events: &[InsiderEvent]) -> Self {
        let events_summary = insider::events_summary(events);
        let properties_summary = insider::parameters_summary(events);
        Self {
            overview: insider::platform_overview(&events_summary, &properties_summary),
            events_summary,
            properties_summary,
            events_list: insider::events_list(events),
            parameter_usage: insider::parameter_usage(events),
            parameters_by_event: insider::parameters_by_event(events),
            all_parameters: insider::all_parameters_detailed(events),
            unique_parameters_list: insider::unique_parameters(events),
            parameter_type_analysis: insider::parameter_types(events),
        }
    }
}

/// One container's block on the combined GTM page
#[derive(Debug, Clone, Serialize)]
pub struct GtmContainerSummary {
    pub overview: GtmOverview,
    pub tags_summary: TagsSummary,
    pub variables_summary: VariablesSummary,
    pub triggers_summary: TriggersSummary,
    pub destination_analysis: DestinationAnalysis,
}

impl GtmContainerSummary {
    pub fn new(export: &GtmExport) -> Self {
        Self {
            overview: gtm::platform_overview(export),
            tags_summary: gtm::tags_summary(export),
            variables_summary: gtm::variables_summary(export),
            triggers_summary: gtm::triggers_summary(export),
            destination_analysis: gtm::destination_analysis(export),
        }
    }
}

/// Both containers; an unavailable one is left out
#[derive(Debug, Clone, Serialize)]
pub struct GtmView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<GtmContainerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<GtmContainerSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GtmDetailView {
    pub container_type: String,
    pub overview: GtmOverview,
    pub container_info: ContainerInfo,
    pub tags_summary: TagsSummary,
    pub variables_summary: VariablesSummary,
    pub triggers_summary: TriggersSummary,
    pub tags_list: Vec<TagItem>,
    pub destination_analysis: DestinationAnalysis,
    pub data_flow: DataFlowAnalysis,
}

impl GtmDetailView {
    pub fn new(container_type: &str, export: &GtmExport) -> Self {
        Self {
            container_type: container_type.to_string(),
            overview: gtm::platform_overview(export),
            container_info: gtm::container_info(export),
            tags_summary: gtm::tags_summary(export),
            variables_summary: gtm::variables_summary(export),
            triggers_summary: gtm::triggers_summary(export),
            tags_list: gtm::tags_list(export),
            destination_analysis: gtm::destination_analysis(export),
            data_flow: gtm::data_flow_analysis(export),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthView {
    pub status: String,
    pub version: String,
    pub sources: BTreeMap<&'static str, bool>,
}
