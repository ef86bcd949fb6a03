//! Incident payloads as received from the upstream endpoints.
//!
//! Every shape the upstream has produced is accepted here: flat or nested
//! summaries, `items` or `incidents` lists, counters under old and new names.
//! Parsing never fails; anything unrecognized degrades to an empty value
//! and the [`normalize`] step supplies display defaults.

pub mod lenient;
pub mod normalize;

pub use normalize::{normalize, CanonicalRow};

use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::warn;

/// One incident record, any payload version.
///
/// All fields are optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IncidentRecord {
    // identity
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub component: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub cluster: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub service: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub source_event_id: Option<String>,

    // classification
    #[serde(deserialize_with = "lenient::text")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub incident_type: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub failure: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub failure_type: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub failure_reason: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub status: Option<String>,

    // timing
    #[serde(deserialize_with = "lenient::text")]
    pub failure_time: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub failure_hm: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub healed_time: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub recovery_hm: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub resolved_at: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub recovery_time: Option<String>,
    #[serde(deserialize_with = "lenient::seconds")]
    pub mttr_seconds: Option<f64>,
    #[serde(deserialize_with = "lenient::seconds")]
    pub avg_mttr_seconds: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub mttr_human: Option<String>,

    // detection & healing
    #[serde(deserialize_with = "lenient::text")]
    pub detection: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub signal: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub healing_action: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub action: Option<String>,

    // task evidence
    #[serde(deserialize_with = "lenient::text")]
    pub task_arn: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub exit_code: Option<Number>,
    #[serde(deserialize_with = "lenient::text")]
    pub task_last_status: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub task_desired_status: Option<String>,

    // autoscaling evidence
    #[serde(deserialize_with = "lenient::number")]
    pub desired_before: Option<Number>,
    #[serde(deserialize_with = "lenient::number")]
    pub desired_after: Option<Number>,
    #[serde(deserialize_with = "lenient::number")]
    pub running_before: Option<Number>,
    #[serde(deserialize_with = "lenient::number")]
    pub running_after: Option<Number>,
    #[serde(deserialize_with = "lenient::number")]
    pub pending_before: Option<Number>,
    #[serde(deserialize_with = "lenient::number")]
    pub pending_after: Option<Number>,
    #[serde(deserialize_with = "lenient::number")]
    pub scale_delta: Option<Number>,
    #[serde(deserialize_with = "lenient::text")]
    pub alarm_name: Option<String>,

    // free text
    #[serde(deserialize_with = "lenient::text")]
    pub impact: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub learning: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub notes: Option<String>,
}

impl IncidentRecord {
    /// Read a record from arbitrary JSON. Non-objects become the empty record.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_else(|e| {
            warn!(error = %e, "incident record rejected, rendering defaults");
            Self::default()
        })
    }
}

/// Aggregate counters from the summary endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SummaryAggregate {
    #[serde(deserialize_with = "lenient::count")]
    pub total_incidents: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub open_incidents: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub open: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub resolved_incidents: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub resolved: Option<u64>,
    #[serde(deserialize_with = "lenient::seconds")]
    pub avg_mttr_seconds: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub avg_mttr_human: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub generated_at: Option<String>,
}

impl SummaryAggregate {
    /// `open_incidents`, else the older `open`.
    pub fn open_count(&self) -> Option<u64> {
        self.open_incidents.or(self.open)
    }

    /// `resolved_incidents`, else the older `resolved`.
    pub fn resolved_count(&self) -> Option<u64> {
        self.resolved_incidents.or(self.resolved)
    }

    /// Read a summary from arbitrary JSON. `null` and non-objects are absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        match Self::deserialize(value) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "summary payload rejected");
                None
            }
        }
    }
}

/// The dashboard snapshot: counters plus the most recent incident.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardPayload {
    pub summary: Option<SummaryAggregate>,
    pub latest: Option<IncidentRecord>,
}

impl DashboardPayload {
    /// Accepts `{summary: {...}, latest}` as well as the flat
    /// `{total_incidents, ..., last_incident}` shape.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let summary = match obj.get("summary") {
            Some(nested) => SummaryAggregate::from_value(nested),
            None => SummaryAggregate::from_value(value),
        };
        let latest = ["latest", "last_incident"]
            .iter()
            .filter_map(|key| obj.get(*key))
            .find(|v| v.is_object())
            .map(IncidentRecord::from_value);
        Self { summary, latest }
    }
}

/// Incident list from `{items: [...]}`, `{incidents: [...]}` or a bare array.
pub fn parse_incident_list(value: &Value) -> Vec<IncidentRecord> {
    let items = match value {
        Value::Array(items) => Some(items),
        Value::Object(obj) => ["items", "incidents"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array)),
        _ => None,
    };
    items
        .map(|items| items.iter().map(IncidentRecord::from_value).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_lenient_fields() {
        let rec = IncidentRecord::from_value(&json!({
            "id": 17,
            "mttr_seconds": "42",
            "exit_code": 137,
            "status": "",
            "unknown_field": {"nested": true}
        }));
        assert_eq!(rec.id.as_deref(), Some("17"));
        assert_eq!(rec.mttr_seconds, Some(42.0));
        assert_eq!(rec.exit_code, Some(Number::from(137)));
        assert_eq!(rec.status, None);
    }

    #[test]
    fn test_record_from_non_object() {
        assert_eq!(IncidentRecord::from_value(&json!(null)), IncidentRecord::default());
        assert_eq!(IncidentRecord::from_value(&json!([1, 2])), IncidentRecord::default());
        assert_eq!(IncidentRecord::from_value(&json!("x")), IncidentRecord::default());
    }

    #[test]
    fn test_list_shapes() {
        let items = parse_incident_list(&json!({"items": [{"id": "a"}, {"id": "b"}]}));
        assert_eq!(items.len(), 2);
        let incidents = parse_incident_list(&json!({"incidents": [{"id": "c"}], "mttr": 12.5}));
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].id.as_deref(), Some("c"));
        assert_eq!(parse_incident_list(&json!([{}, null])).len(), 2);
        assert!(parse_incident_list(&json!({"data": []})).is_empty());
        assert!(parse_incident_list(&json!(null)).is_empty());
    }

    #[test]
    fn test_dashboard_nested_shape() {
        let payload = DashboardPayload::from_value(&json!({
            "summary": {
                "total_incidents": 3,
                "open_incidents": 1,
                "resolved_incidents": 2,
                "avg_mttr_seconds": 75,
                "avg_mttr_human": "1m 15s"
            },
            "latest": {"component": "web", "incident_type": "TASK_STOPPED"}
        }));
        let summary = payload.summary.unwrap();
        assert_eq!(summary.total_incidents, Some(3));
        assert_eq!(summary.open_count(), Some(1));
        assert_eq!(summary.avg_mttr_human.as_deref(), Some("1m 15s"));
        assert_eq!(payload.latest.unwrap().component.as_deref(), Some("web"));
    }

    #[test]
    fn test_dashboard_flat_shape_old_counter_names() {
        let payload = DashboardPayload::from_value(&json!({
            "total_incidents": 5,
            "open": 2,
            "resolved": 3,
            "avg_mttr_seconds": 12.75,
            "last_incident": {"title": "Latency Spike"},
            "generated_at": "2024-01-01T00:00:00Z"
        }));
        let summary = payload.summary.unwrap();
        assert_eq!(summary.open_count(), Some(2));
        assert_eq!(summary.resolved_count(), Some(3));
        assert_eq!(summary.avg_mttr_seconds, Some(12.75));
        assert_eq!(payload.latest.unwrap().title.as_deref(), Some("Latency Spike"));
    }

    #[test]
    fn test_dashboard_absent_parts() {
        let payload = DashboardPayload::from_value(&json!({"summary": null, "latest": null}));
        assert!(payload.summary.is_none());
        assert!(payload.latest.is_none());
        assert_eq!(DashboardPayload::from_value(&json!(null)), DashboardPayload::default());
    }
}
