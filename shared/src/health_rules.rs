//! Health rules engine
//!
//! Classifies health records against healthy clinical ranges, orders record
//! lists for display, and derives the display status of medicine reminders.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: every rule takes explicit inputs (record, sort key, now)
//! 2. **Thresholds as Data**: healthy ranges live in [`HEALTHY_RANGES`]
//! 3. **Total**: malformed values are reported as out-of-range, never an error

use crate::models::{HealthRecord, MedicineReminder, MetricValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// Healthy Ranges
// ============================================================================

/// Metrics that take part in range classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    BloodPressure,
    BloodSugar,
    SleepDuration,
    HeartRate,
}

impl Metric {
    /// Human-readable label used in warnings
    pub fn label(&self) -> &'static str {
        match self {
            Metric::BloodPressure => "Blood Pressure",
            Metric::BloodSugar => "Blood Sugar",
            Metric::SleepDuration => "Sleep Duration",
            Metric::HeartRate => "Heart Rate",
        }
    }

    /// The record's raw value for this metric
    pub fn value<'a>(&self, record: &'a HealthRecord) -> &'a MetricValue {
        match self {
            Metric::BloodPressure => &record.blood_pressure,
            Metric::BloodSugar => &record.blood_sugar,
            Metric::SleepDuration => &record.sleep_duration,
            Metric::HeartRate => &record.heart_rate,
        }
    }
}

/// Inclusive healthy range for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthyRange {
    pub metric: Metric,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl HealthyRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Warning shown when a value falls outside this range
    pub fn warning(&self) -> String {
        format!(
            "{} should be between {}-{} {}.",
            self.metric.label(),
            self.min,
            self.max,
            self.unit
        )
    }
}

/// Healthy ranges, in the order their warnings are reported
pub const HEALTHY_RANGES: [HealthyRange; 4] = [
    HealthyRange {
        metric: Metric::BloodPressure,
        min: 90.0,
        max: 120.0,
        unit: "mmHg",
    },
    HealthyRange {
        metric: Metric::BloodSugar,
        min: 70.0,
        max: 110.0,
        unit: "mg/dL",
    },
    HealthyRange {
        metric: Metric::SleepDuration,
        min: 7.0,
        max: 9.0,
        unit: "hours",
    },
    HealthyRange {
        metric: Metric::HeartRate,
        min: 60.0,
        max: 100.0,
        unit: "bpm",
    },
];

/// Look up the healthy range of a metric
pub fn healthy_range(metric: Metric) -> &'static HealthyRange {
    match metric {
        Metric::BloodPressure => &HEALTHY_RANGES[0],
        Metric::BloodSugar => &HEALTHY_RANGES[1],
        Metric::SleepDuration => &HEALTHY_RANGES[2],
        Metric::HeartRate => &HEALTHY_RANGES[3],
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Result of checking a record against the healthy ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub is_healthy: bool,
    pub warnings: Vec<String>,
}

/// Classify a record against [`HEALTHY_RANGES`]
///
/// Weight is not range-checked. A value that does not parse as a number is
/// out of range.
pub fn classify(record: &HealthRecord) -> Classification {
    classify_with(record, &HEALTHY_RANGES)
}

/// Classify a record against an explicit range table
pub fn classify_with(record: &HealthRecord, ranges: &[HealthyRange]) -> Classification {
    let warnings: Vec<String> = ranges
        .iter()
        .filter(|range| {
            !range
                .metric
                .value(record)
                .as_f64()
                .is_some_and(|value| range.contains(value))
        })
        .map(HealthyRange::warning)
        .collect();

    Classification {
        is_healthy: warnings.is_empty(),
        warnings,
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// Keys a record list can be sorted by. Every key sorts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Most recent first
    #[default]
    Date,
    BloodPressure,
    BloodSugar,
    Weight,
}

impl SortKey {
    /// Parse a sort option; unknown options yield `None`
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "date" => Some(SortKey::Date),
            "bloodPressure" => Some(SortKey::BloodPressure),
            "bloodSugar" => Some(SortKey::BloodSugar),
            "weight" => Some(SortKey::Weight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::BloodPressure => "bloodPressure",
            SortKey::BloodSugar => "bloodSugar",
            SortKey::Weight => "weight",
        }
    }
}

/// Return a sorted copy of `records`
///
/// An unrecognized key returns the records in their original order. Records
/// with equal keys keep their relative input order; no other tie-break is
/// guaranteed.
pub fn sort_records(records: &[HealthRecord], key: &str) -> Vec<HealthRecord> {
    let mut sorted = records.to_vec();
    if let Some(key) = SortKey::parse(key) {
        sort_records_by(&mut sorted, key);
    }
    sorted
}

/// Stable in-place sort by a known key
pub fn sort_records_by(records: &mut [HealthRecord], key: SortKey) {
    match key {
        SortKey::Date => records.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::BloodPressure => {
            records.sort_by(|a, b| compare_desc(&a.blood_pressure, &b.blood_pressure))
        }
        SortKey::BloodSugar => records.sort_by(|a, b| compare_desc(&a.blood_sugar, &b.blood_sugar)),
        SortKey::Weight => records.sort_by(|a, b| compare_desc(&a.weight, &b.weight)),
    }
}

/// Descending numeric order; unparseable values go after every number
fn compare_desc(a: &MetricValue, b: &MetricValue) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ============================================================================
// Reminder Status
// ============================================================================

/// Display status of a medicine reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStatus {
    /// The reminder time has passed (presumed taken)
    pub is_past: bool,
}

/// Icon and colours used to render a reminder card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderBadge {
    pub icon: &'static str,
    pub color: &'static str,
    pub background: &'static str,
}

impl ReminderStatus {
    pub fn badge(&self) -> ReminderBadge {
        if self.is_past {
            ReminderBadge {
                icon: "check-circle",
                color: "green",
                background: "#DFF0E5",
            }
        } else {
            ReminderBadge {
                icon: "close-circle",
                color: "red",
                background: "#FFE5E5",
            }
        }
    }
}

/// A reminder is past iff its time is strictly before `now`
pub fn reminder_status(reminder: &MedicineReminder, now: DateTime<Utc>) -> ReminderStatus {
    ReminderStatus {
        is_past: reminder.time < now,
    }
}
