//! Usage-analytics summaries
//!
//! Both acquisition modes normalize into [`EventRecord`]s and
//! [`PropertyRecord`]s first, so every summary here is computed the same
//! way whichever reader backs the source.

use super::{most_common, tally, tally_non_empty, Counts, RankedCount};
use crate::domain::{Activity, EventRecord, PropertyRecord, UniqueProperty};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Properties keyed by parent event name
pub type PropertiesByEvent = BTreeMap<String, Vec<PropertyRecord>>;

/// Owners listed in [`EventsSummary::top_owners`]
pub const TOP_OWNERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventsSummary {
    pub total_events: usize,
    pub activity_status: Counts,
    pub categories: Counts,
    pub schema_status: Counts,
    pub top_owners: Vec<RankedCount>,
    pub unique_event_names: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertiesSummary {
    pub total_properties: usize,
    pub unique_properties: usize,
    pub value_types: Counts,
    pub required_breakdown: Counts,
    pub schema_status: Counts,
    pub array_properties_count: usize,
}

/// Dashboard card for the usage-analytics platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageOverview {
    pub platform: String,
    pub total_events: usize,
    pub total_properties: usize,
    pub unique_properties: usize,
    pub active_events: usize,
    pub deleted_events: usize,
    pub categories_count: usize,
    pub last_updated: String,
}

pub fn events_summary(events: &[EventRecord]) -> EventsSummary {
    EventsSummary {
        total_events: events.len(),
        activity_status: tally(events.iter().map(|e| e.activity.as_str())),
        categories: tally_non_empty(events.iter().map(|e| e.category.as_str())),
        schema_status: tally_non_empty(events.iter().map(|e| e.schema_status.as_str())),
        top_owners: most_common(
            events
                .iter()
                .map(|e| e.owner.as_str())
                .filter(|owner| !owner.is_empty()),
            TOP_OWNERS,
        ),
        unique_event_names: events
            .iter()
            .map(|e| e.name.as_str())
            .collect::<HashSet<_>>()
            .len(),
    }
}

pub fn properties_summary(properties: &PropertiesByEvent) -> PropertiesSummary {
    let all: Vec<&PropertyRecord> = properties.values().flatten().collect();

    PropertiesSummary {
        total_properties: all.len(),
        unique_properties: all
            .iter()
            .map(|p| p.name.as_str())
            .collect::<HashSet<_>>()
            .len(),
        value_types: tally_non_empty(all.iter().map(|p| p.value_type.as_str())),
        required_breakdown: tally(
            all.iter()
                .map(|p| if p.required { "true" } else { "false" }),
        ),
        schema_status: tally_non_empty(all.iter().map(|p| p.schema_status.as_str())),
        array_properties_count: all.iter().filter(|p| p.is_array).count(),
    }
}

/// De-duplicates properties by name across every event
///
/// The first occurrence supplies the representative record; description
/// and type are back-filled from the first later occurrence that has
/// one. The result is ordered by `event_count`, highest first, with ties
/// in aggregation order.
pub fn unique_properties(properties: &PropertiesByEvent) -> Vec<UniqueProperty> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<UniqueProperty> = Vec::new();

    for property in properties.values().flatten() {
        let position = *index.entry(property.name.as_str()).or_insert_with(|| {
            unique.push(UniqueProperty {
                name: property.name.clone(),
                description: property.description.clone(),
                value_type: property.value_type.clone(),
                is_array: property.is_array,
                schema_status: property.schema_status.clone(),
                first_seen: property.first_seen.clone(),
                last_seen: property.last_seen.clone(),
                event_count: 0,
            });
            unique.len() - 1
        });

        let entry = &mut unique[position];
        if entry.description.is_empty() && !property.description.is_empty() {
            entry.description = property.description.clone();
        }
        if entry.value_type.is_empty() && !property.value_type.is_empty() {
            entry.value_type = property.value_type.clone();
        }
        entry.event_count += 1;
    }

    unique.sort_by(|a, b| b.event_count.cmp(&a.event_count));
    unique
}

pub fn platform_overview(
    events: &EventsSummary,
    properties: &PropertiesSummary,
    last_updated: &str,
) -> UsageOverview {
    UsageOverview {
        platform: "Amplitude".to_string(),
        total_events: events.total_events,
        total_properties: properties.total_properties,
        unique_properties: properties.unique_properties,
        active_events: events
            .activity_status
            .get(Activity::Active.as_str())
            .copied()
            .unwrap_or(0),
        deleted_events: events
            .activity_status
            .get(Activity::Deleted.as_str())
            .copied()
            .unwrap_or(0),
        categories_count: events.categories.len(),
        last_updated: last_updated.to_string(),
    }
}
