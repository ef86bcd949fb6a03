//! Reconcile incident records of every payload version into one row shape.
//!
//! Each display field is resolved through a fixed fallback chain: the first
//! present source wins, otherwise a named default applies. New payload
//! versions are absorbed by extending a chain here, never by branching in
//! the renderer.

use serde_json::Number;

use super::IncidentRecord;
use crate::render::format::{format_instant, humanize_duration, MISSING};

pub const DEFAULT_LOCATION: &str = "ECS Service";
pub const DEFAULT_CLASSIFICATION: &str = "Task exited";
pub const DEFAULT_STATUS: &str = "OPEN";
/// Placeholder for missing actions, counts and short labels.
pub const NONE: &str = "-";

/// Render-ready projection of an [`IncidentRecord`].
///
/// Display fields are always populated. Evidence groups are `Some` only when
/// the record carries their backing fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    pub reference: String,
    pub time_shown: String,
    pub recovered: String,
    pub location: String,
    pub classification: String,
    pub detection: String,
    pub healing_action: String,
    pub duration: String,
    pub status: String,
    pub severity: Option<String>,
    pub record: Option<SourceRecord>,
    pub evidence: Option<Evidence>,
}

/// Where the record lives upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub service: String,
    pub region: String,
    /// Raw detection timestamp, the store's sort key.
    pub detection_key: String,
}

/// Supporting evidence for the detail panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    pub failure: Option<FailureEvidence>,
    pub task: Option<TaskEvidence>,
    pub autoscaling: Option<ScalingEvidence>,
    pub impact: Option<String>,
    pub learning: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureEvidence {
    pub failure_type: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskEvidence {
    pub task_arn: String,
    pub exit_code: Option<Number>,
    pub last_status: String,
    pub desired_status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingEvidence {
    pub desired_before: Option<Number>,
    pub desired_after: Option<Number>,
    pub running_before: Option<Number>,
    pub running_after: Option<Number>,
    pub pending_before: Option<Number>,
    pub pending_after: Option<Number>,
    pub scale_delta: Option<Number>,
    pub alarm_name: String,
}

fn first<'a>(chain: &[&'a Option<String>]) -> Option<&'a str> {
    chain.iter().find_map(|field| field.as_deref())
}

fn or_default(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}

/// Project a raw record onto the canonical row. Total over all inputs.
pub fn normalize(raw: &IncidentRecord) -> CanonicalRow {
    let time_shown = format_instant(first(&[
        &raw.failure_time,
        &raw.failure_hm,
        &raw.created_at,
    ]));
    let recovered = format_instant(first(&[
        &raw.healed_time,
        &raw.recovery_hm,
        &raw.resolved_at,
        &raw.recovery_time,
    ]));

    let location = match (raw.component.as_deref(), raw.cluster.as_deref()) {
        (Some(component), Some(cluster)) => format!("{} / {}", component, cluster),
        (Some(component), None) => component.to_string(),
        (None, _) => DEFAULT_LOCATION.to_string(),
    };

    let seconds = raw.mttr_seconds.or(raw.avg_mttr_seconds);
    let duration = match (raw.mttr_human.as_deref(), seconds) {
        (Some(human), _) => human.to_string(),
        (None, seconds) => humanize_duration(seconds),
    };

    CanonicalRow {
        reference: or_default(first(&[&raw.id, &raw.source_event_id]), NONE),
        time_shown,
        recovered,
        location,
        classification: or_default(
            first(&[&raw.incident_type, &raw.failure, &raw.failure_type, &raw.title]),
            DEFAULT_CLASSIFICATION,
        ),
        detection: or_default(first(&[&raw.detection, &raw.signal]), MISSING),
        healing_action: or_default(first(&[&raw.healing_action, &raw.action]), NONE),
        duration,
        status: or_default(raw.status.as_deref(), DEFAULT_STATUS),
        severity: raw.severity.clone(),
        record: source_record(raw),
        evidence: evidence(raw),
    }
}

fn source_record(raw: &IncidentRecord) -> Option<SourceRecord> {
    if raw.service.is_none() && raw.failure_time.is_none() {
        return None;
    }
    Some(SourceRecord {
        service: or_default(raw.service.as_deref(), NONE),
        region: or_default(raw.region.as_deref(), NONE),
        detection_key: or_default(raw.failure_time.as_deref(), NONE),
    })
}

fn evidence(raw: &IncidentRecord) -> Option<Evidence> {
    let failure = (raw.failure_type.is_some() || raw.failure_reason.is_some()).then(|| {
        FailureEvidence {
            failure_type: raw.failure_type.clone(),
            reason: raw.failure_reason.clone(),
        }
    });

    let task = raw.task_arn.as_ref().map(|arn| TaskEvidence {
        task_arn: arn.clone(),
        exit_code: raw.exit_code.clone(),
        last_status: or_default(raw.task_last_status.as_deref(), NONE),
        desired_status: or_default(raw.task_desired_status.as_deref(), NONE),
    });

    let scaled = [
        &raw.desired_before,
        &raw.desired_after,
        &raw.running_before,
        &raw.running_after,
    ]
    .iter()
    .any(|count| count.is_some());
    let autoscaling = scaled.then(|| ScalingEvidence {
        desired_before: raw.desired_before.clone(),
        desired_after: raw.desired_after.clone(),
        running_before: raw.running_before.clone(),
        running_after: raw.running_after.clone(),
        pending_before: raw.pending_before.clone(),
        pending_after: raw.pending_after.clone(),
        scale_delta: raw.scale_delta.clone(),
        alarm_name: or_default(raw.alarm_name.as_deref(), NONE),
    });

    let evidence = Evidence {
        failure,
        task,
        autoscaling,
        impact: raw.impact.clone(),
        learning: raw.learning.clone(),
        notes: raw.notes.clone(),
    };
    (evidence != Evidence::default()).then_some(evidence)
}
