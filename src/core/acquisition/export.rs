//! File mode: the usage taxonomy read from a CSV export
//!
//! The export interleaves event rows and property rows. A row whose
//! `Object Type` is `Event` describes an event; any row with both an
//! `Object Name` and an `Event Property Name` describes one property of
//! that event.

use crate::adapters::readers::{read_rows, Row};
use crate::core::aggregate::usage::PropertiesByEvent;
use crate::domain::{Activity, Category, EventRecord, PropertyRecord, Result, TrackplanError};
use std::path::Path;

/// Columns without which the export cannot be interpreted
pub const REQUIRED_COLUMNS: [&str; 2] = ["Object Type", "Object Name"];

/// One typed export row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRow {
    pub object_type: String,
    pub object_name: String,
    pub event_display_name: String,
    pub event_category: String,
    pub object_owner: String,
    pub object_description: String,
    pub event_activity: String,
    pub event_schema_status: String,
    pub event_volume_180_days: u64,
    pub event_queries_180_days: u64,
    pub event_first_seen: String,
    pub event_last_seen: String,
    pub property_name: String,
    pub property_description: String,
    pub property_value_type: String,
    pub property_required: bool,
    pub property_is_array: bool,
    pub property_schema_status: String,
    pub property_first_seen: String,
    pub property_last_seen: String,
}

impl ExportRow {
    pub fn from_row(row: &Row) -> Self {
        let text = |column: &str| row.get(column).to_string();
        Self {
            object_type: row.get_trimmed("Object Type").to_string(),
            object_name: text("Object Name"),
            event_display_name: text("Event Display Name"),
            event_category: text("Event Category"),
            object_owner: text("Object Owner"),
            object_description: text("Object Description"),
            event_activity: text("Event Activity"),
            event_schema_status: text("Event Schema Status"),
            event_volume_180_days: parse_counter(row.get("Event 180 Day Volume")),
            event_queries_180_days: parse_counter(row.get("Event 180 Day Queries")),
            event_first_seen: text("Event First Seen"),
            event_last_seen: text("Event Last Seen"),
            property_name: text("Event Property Name"),
            property_description: text("Property Description"),
            property_value_type: text("Property Value Type"),
            property_required: parse_flag(row.get("Property Required")),
            property_is_array: parse_flag(row.get("Property Is Array")),
            property_schema_status: text("Property Schema Status"),
            property_first_seen: text("Property First Seen"),
            property_last_seen: text("Property Last Seen"),
        }
    }

    fn has_object_name(&self) -> bool {
        !self.object_name.trim().is_empty()
    }

    /// Whether this row defines an event
    pub fn is_event(&self) -> bool {
        self.object_type == "Event" && self.has_object_name()
    }

    /// Whether this row defines a property of a named event
    pub fn is_property(&self) -> bool {
        !self.property_name.is_empty() && self.has_object_name()
    }

    pub fn event_record(&self) -> EventRecord {
        EventRecord {
            name: self.object_name.clone(),
            display_name: self.event_display_name.clone(),
            category: self.event_category.clone(),
            owner: self.object_owner.clone(),
            description: self.object_description.clone(),
            activity: Activity::parse(&self.event_activity),
            schema_status: self.event_schema_status.clone(),
            volume_180_days: self.event_volume_180_days,
            queries_180_days: self.event_queries_180_days,
            first_seen: self.event_first_seen.clone(),
            last_seen: self.event_last_seen.clone(),
        }
    }

    pub fn property_record(&self) -> PropertyRecord {
        PropertyRecord {
            name: self.property_name.clone(),
            description: self.property_description.clone(),
            value_type: self.property_value_type.clone(),
            required: self.property_required,
            is_array: self.property_is_array,
            schema_status: self.property_schema_status.clone(),
            first_seen: self.property_first_seen.clone(),
            last_seen: self.property_last_seen.clone(),
        }
    }
}

/// Non-negative counter; thousands separators allowed, anything else is 0
pub fn parse_counter(value: &str) -> u64 {
    let digits: String = value
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    digits.parse().unwrap_or(0)
}

/// `true`, `yes` and `1` (any case) are true; everything else is false
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}

/// A parsed usage-taxonomy export
#[derive(Debug, Clone, Default)]
pub struct ExportTaxonomy {
    rows: Vec<ExportRow>,
}

impl ExportTaxonomy {
    /// Reads and types the export at `path`
    ///
    /// # Errors
    ///
    /// [`TrackplanError::SourceLoad`] if the file cannot be read or lacks
    /// the `Object Type` / `Object Name` columns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rows = read_rows(path)?;

        if let Some(first) = rows.first() {
            if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !first.has_column(c)) {
                return Err(TrackplanError::source_load(
                    path,
                    format!("missing column '{missing}'"),
                ));
            }
        }

        let taxonomy = Self::from_rows(&rows);
        tracing::info!(
            path = %path.display(),
            rows = taxonomy.rows.len(),
            "Usage taxonomy export loaded"
        );
        Ok(taxonomy)
    }

    pub fn from_rows(rows: &[Row]) -> Self {
        Self {
            rows: rows.iter().map(ExportRow::from_row).collect(),
        }
    }

    pub fn rows(&self) -> &[ExportRow] {
        &self.rows
    }

    pub fn events_list(&self) -> Vec<EventRecord> {
        self.rows
            .iter()
            .filter(|r| r.is_event())
            .map(ExportRow::event_record)
            .collect()
    }

    /// Properties keyed by event name
    ///
    /// Every event row has an entry, empty when no property rows name it,
    /// matching what API mode returns.
    pub fn properties_by_event(&self) -> PropertiesByEvent {
        let mut by_event: PropertiesByEvent = self
            .rows
            .iter()
            .filter(|r| r.is_event())
            .map(|r| (r.object_name.clone(), Vec::new()))
            .collect();
        for row in self.rows.iter().filter(|r| r.is_property()) {
            by_event
                .entry(row.object_name.clone())
                .or_default()
                .push(row.property_record());
        }
        by_event
    }

    /// Distinct non-empty event categories in export order
    ///
    /// Exports carry category names only, so every `id` is `None`.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = Vec::new();
        for row in self.rows.iter().filter(|r| r.is_event()) {
            let name = &row.event_category;
            if !name.is_empty() && !categories.iter().any(|c| &c.name == name) {
                categories.push(Category {
                    id: None,
                    name: name.clone(),
                });
            }
        }
        categories
    }
}
