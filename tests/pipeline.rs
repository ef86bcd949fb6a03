//! End-to-end normalize -> render checks across the observed payload shapes.

use healops::incident::{normalize, parse_incident_list, DashboardPayload, IncidentRecord};
use healops::render::row::{render_detail_panel, render_summary_row, Column, ColumnSet};
use healops::view::{DashboardView, DetailState, IncidentTable};
use serde_json::json;

#[test]
fn test_scenario_row_cells() {
    let record = IncidentRecord::from_value(&json!({
        "failure_time": "2024-01-01T00:00:10Z",
        "healed_time": "2024-01-01T00:01:10Z",
        "mttr_seconds": 60
    }));
    let row = normalize(&record);
    let view = render_summary_row(&row, &ColumnSet::incidents(&[row.clone()]));
    assert_eq!(view.cell(Column::Duration), Some("1m 0s"));
    assert_eq!(view.cell(Column::Time), Some("2024-01-01 00:00:10 UTC"));
    assert_eq!(view.cell(Column::Location), Some("ECS Service"));
    assert_eq!(view.cell(Column::Status), Some("OPEN"));
}

#[test]
fn test_every_shape_renders() {
    let shapes = [
        json!({"incidents": [{"id": "1a2b", "title": "Health Check Failure", "severity": "P1", "status": "open", "created_at": "2024-05-01T10:00:00.5", "resolved_at": null}], "mttr": null}),
        json!({"incidents": [{"id": "9f", "title": "Latency Spike", "severity": "P2", "signal": "cpu_spike", "action": "scale_out", "status": "resolved", "failure_time": "2024-05-01T10:00:00+00:00", "recovery_time": "2024-05-01T10:03:00+00:00", "mttr_seconds": 180, "notes": ""}]}),
        json!({"items": [{"component": "api", "failure": "OOMKilled", "failure_hm": "10:00", "recovery_hm": "10:02", "mttr_human": "2m 0s", "failure_reason": "memory", "impact": "5xx burst", "learning": "raise limit"}]}),
        json!({"items": [{"service": "healops", "incident_type": "TASK_STOPPED", "failure_type": "TaskFailed", "failure_time": "2024-05-01T10:00:00Z", "healed_time": "2024-05-01T10:01:05Z", "mttr_seconds": 65, "mttr_human": "1m 5s", "component": "ECS", "cluster": "c", "detection": "EventBridge", "healing_action": "ECS Scheduler", "status": "RESOLVED", "desired_before": 1, "desired_after": 2, "running_before": 1, "running_after": 2, "alarm_name": "cpu-high", "task_arn": "arn:t", "exit_code": 137, "task_last_status": "STOPPED"}]}),
    ];
    for shape in &shapes {
        let items = parse_incident_list(shape);
        assert_eq!(items.len(), 1);
        let mut table = IncidentTable::incidents();
        table.render_incident_list(&items);
        let html = table.to_html("t");
        assert_eq!(html.matches(r#"class="incident-row""#).count(), 1);
        assert_eq!(html.matches(r#"class="detail-row""#).count(), 1);
    }

    let mirror = normalize(&parse_incident_list(&shapes[3])[0]);
    let titles = render_detail_panel(&mirror).titles();
    assert!(titles.contains(&"Autoscaling Evidence"));
    assert!(titles.contains(&"Task Evidence"));

    let file = normalize(&parse_incident_list(&shapes[2])[0]);
    let titles = render_detail_panel(&file).titles();
    assert_eq!(titles, vec!["Failure", "Timeline", "Impact", "Learning"]);
}

#[test]
fn test_hostile_and_garbage_records() {
    let items = parse_incident_list(&json!({"items": [
        null, 7, "text", [], {},
        {"status": {"nested": 1}, "mttr_seconds": "soon", "exit_code": [1], "task_arn": "<x>"}
    ]}));
    assert_eq!(items.len(), 6);
    let mut table = IncidentTable::incidents();
    table.render_incident_list(&items);
    let html = table.body_html();
    assert_eq!(html.matches(r#"class="incident-row""#).count(), 6);
    assert!(html.contains("Task ARN: &lt;x&gt;"));
    assert!(html.contains("Exit Code: -"));
    assert!(!html.contains("<x>"));
}

#[test]
fn test_refresh_with_smaller_set_and_clicks() {
    let big = parse_incident_list(&json!({"items": [{"id": 1}, {"id": 2}, {"id": 3}]}));
    let small = parse_incident_list(&json!({"items": [{"id": 4}]}));
    let mut table = IncidentTable::incidents();
    table.render_incident_list(&big);
    table.click(2);
    table.render_incident_list(&small);

    assert_eq!(table.len(), 1);
    assert_eq!(table.click(0), Some(DetailState::Expanded));
    assert_eq!(table.click(0), Some(DetailState::Collapsed));
    assert_eq!(table.click(2), None);
}

#[test]
fn test_dashboard_from_flat_summary() {
    let payload = DashboardPayload::from_value(&json!({
        "total_incidents": 2, "open_incidents": 0, "resolved_incidents": 2,
        "avg_mttr_seconds": 3661, "last_incident": {"title": "Latency Spike", "severity": "P2"},
        "generated_at": "2024-05-01T10:00:00.123456Z"
    }));
    let mut view = DashboardView::default();
    view.render_dashboard(payload.summary.as_ref(), payload.latest.as_ref());
    let html = view.to_html();
    assert!(html.contains("1h 1m"));
    assert!(html.contains("0 / 2"));
    assert!(html.contains("Latency Spike"));
    assert!(html.contains("Updated: 2024-05-01 10:00:00 UTC"));
}
