//! Summary rows and detail panels for one incident.

use std::fmt::Write as _;

use serde_json::Number;

use super::escape::{escape, escape_str};
use crate::incident::normalize::NONE;
use crate::incident::CanonicalRow;

/// One column of an incident table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Time,
    Location,
    Classification,
    Severity,
    Detection,
    HealingAction,
    Duration,
    Status,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::Time => "Time",
            Column::Location => "Component",
            Column::Classification => "Failure",
            Column::Severity => "Severity",
            Column::Detection => "Detection",
            Column::HealingAction => "Healing Action",
            Column::Duration => "MTTR",
            Column::Status => "Status",
        }
    }

    fn class(self) -> Option<&'static str> {
        match self {
            Column::Classification => Some("bad"),
            Column::HealingAction => Some("ok"),
            Column::Time | Column::Duration => Some("strong"),
            _ => None,
        }
    }
}

/// Ordered columns of a table, decided once per dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet(Vec<Column>);

impl ColumnSet {
    /// Full incident list: every column, severity only when the data has it.
    pub fn incidents(rows: &[CanonicalRow]) -> Self {
        let mut cols = vec![Column::Time, Column::Location, Column::Classification];
        if rows.iter().any(|r| r.severity.is_some()) {
            cols.push(Column::Severity);
        }
        cols.extend([
            Column::Detection,
            Column::HealingAction,
            Column::Duration,
            Column::Status,
        ]);
        Self(cols)
    }

    /// Latest-incident strip on the dashboard: no status column.
    pub fn latest() -> Self {
        Self(vec![
            Column::Time,
            Column::Location,
            Column::Classification,
            Column::Detection,
            Column::HealingAction,
            Column::Duration,
        ])
    }

    pub fn columns(&self) -> &[Column] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `<th>` cells for the table header.
    pub fn header_html(&self) -> String {
        self.0.iter().fold(String::new(), |mut out, c| {
            let _ = write!(out, "<th>{}</th>", c.header());
            out
        })
    }
}

/// One cell of a summary row. `html` is already escaped.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: Column,
    pub html: String,
}

/// The visible summary row of an incident.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub cells: Vec<Cell>,
}

impl RowView {
    pub fn cell(&self, column: Column) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.html.as_str())
    }

    pub fn to_html(&self, row_id: usize) -> String {
        let mut out = format!(r#"<tr class="incident-row" data-row="{}">"#, row_id);
        for cell in &self.cells {
            match cell.column.class() {
                Some(class) => {
                    let _ = write!(out, r#"<td class="{}">{}</td>"#, class, cell.html);
                }
                None => {
                    let _ = write!(out, "<td>{}</td>", cell.html);
                }
            }
        }
        out.push_str("</tr>");
        out
    }
}

/// A labeled box in the detail panel. Lines are already escaped.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailBox {
    pub title: &'static str,
    pub lines: Vec<String>,
}

/// The expandable detail panel of an incident.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub boxes: Vec<DetailBox>,
}

impl DetailView {
    pub fn titles(&self) -> Vec<&'static str> {
        self.boxes.iter().map(|b| b.title).collect()
    }

    pub fn has_box(&self, title: &str) -> bool {
        self.boxes.iter().any(|b| b.title == title)
    }

    pub fn to_html(&self, row_id: usize, colspan: usize, expanded: bool) -> String {
        let hidden = if expanded { "" } else { " hidden" };
        let mut out = format!(
            r#"<tr class="detail-row" data-detail="{}"{}><td colspan="{}"><div class="detail">"#,
            row_id, hidden, colspan
        );
        for b in &self.boxes {
            let _ = write!(
                out,
                r#"<div class="box"><h4>{}</h4><p>{}</p></div>"#,
                b.title,
                b.lines.join("<br/>")
            );
        }
        out.push_str("</div></td></tr>");
        out
    }
}

/// Numbers render literally, missing ones as `-`.
fn num(value: &Option<Number>) -> String {
    value
        .as_ref()
        .map_or_else(|| NONE.to_string(), Number::to_string)
}

fn transition(label: &str, before: &Option<Number>, after: &Option<Number>) -> String {
    format!("{}: <b>{} → {}</b>", label, num(before), num(after))
}

/// Build the summary row for the given columns.
pub fn render_summary_row(row: &CanonicalRow, columns: &ColumnSet) -> RowView {
    let cells = columns
        .columns()
        .iter()
        .map(|&column| {
            let html = match column {
                Column::Time => escape_str(&row.time_shown),
                Column::Location => escape_str(&row.location),
                Column::Classification => escape_str(&row.classification),
                Column::Severity => escape_str(row.severity.as_deref().unwrap_or(NONE)),
                Column::Detection => escape_str(&row.detection),
                Column::HealingAction => escape_str(&row.healing_action),
                Column::Duration => escape_str(&row.duration),
                Column::Status => escape_str(&row.status),
            };
            Cell { column, html }
        })
        .collect();
    RowView { cells }
}

/// Build the detail panel; a box appears only when its fields are present.
pub fn render_detail_panel(row: &CanonicalRow) -> DetailView {
    let mut boxes = Vec::new();
    let evidence = row.evidence.as_ref();

    if let Some(failure) = evidence.and_then(|e| e.failure.as_ref()) {
        let mut lines = Vec::new();
        if let Some(kind) = &failure.failure_type {
            lines.push(format!("<b>{}</b>", escape_str(kind)));
        }
        if let Some(reason) = &failure.reason {
            lines.push(escape_str(reason));
        }
        boxes.push(DetailBox { title: "Failure", lines });
    }

    boxes.push(DetailBox {
        title: "Timeline",
        lines: vec![
            format!("Detected: <b>{}</b>", escape_str(&row.time_shown)),
            format!("Recovered: <b>{}</b>", escape_str(&row.recovered)),
            format!("MTTR: <b>{}</b>", escape_str(&row.duration)),
        ],
    });

    if let Some(s) = evidence.and_then(|e| e.autoscaling.as_ref()) {
        let mut lines = vec![
            transition("Desired", &s.desired_before, &s.desired_after),
            transition("Running", &s.running_before, &s.running_after),
        ];
        if s.pending_before.is_some() || s.pending_after.is_some() {
            lines.push(transition("Pending", &s.pending_before, &s.pending_after));
        }
        if s.scale_delta.is_some() {
            lines.push(format!("Scale delta: {}", num(&s.scale_delta)));
        }
        lines.push(format!("Alarm: {}", escape_str(&s.alarm_name)));
        boxes.push(DetailBox { title: "Autoscaling Evidence", lines });
    }

    if let Some(task) = evidence.and_then(|e| e.task.as_ref()) {
        boxes.push(DetailBox {
            title: "Task Evidence",
            lines: vec![
                format!("Task ARN: {}", escape_str(&task.task_arn)),
                format!("Exit Code: {}", num(&task.exit_code)),
                format!("Last Status: {}", escape_str(&task.last_status)),
                format!("Desired Status: {}", escape_str(&task.desired_status)),
            ],
        });
    }

    for (title, text) in [
        ("Impact", evidence.and_then(|e| e.impact.as_deref())),
        ("Learning", evidence.and_then(|e| e.learning.as_deref())),
        ("Notes", evidence.and_then(|e| e.notes.as_deref())),
    ] {
        if text.is_some() {
            boxes.push(DetailBox { title, lines: vec![escape(text)] });
        }
    }

    if let Some(record) = &row.record {
        boxes.push(DetailBox {
            title: "Source Record",
            lines: vec![
                format!("Service: <b>{}</b>", escape_str(&record.service)),
                format!("Region: {}", escape_str(&record.region)),
                format!("Detection Time (SK): <b>{}</b>", escape_str(&record.detection_key)),
                format!("Reference: {}", escape_str(&row.reference)),
            ],
        });
    }

    DetailView { boxes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::{normalize, IncidentRecord};
    use serde_json::{json, Value};

    fn canonical(value: Value) -> CanonicalRow {
        normalize(&IncidentRecord::from_value(&value))
    }

    #[test]
    fn test_summary_row_escapes_text() {
        let row = canonical(json!({
            "component": "<script>alert(1)</script>",
            "incident_type": "a&b",
            "status": "RESOLVED"
        }));
        let view = render_summary_row(&row, &ColumnSet::incidents(&[row.clone()]));
        assert_eq!(
            view.cell(Column::Location),
            Some("&lt;script&gt;alert(1)&lt;/script&gt;")
        );
        assert_eq!(view.cell(Column::Classification), Some("a&amp;b"));
        assert!(!view.to_html(0).contains("<script>"));
    }

    #[test]
    fn test_column_sets() {
        let plain = canonical(json!({}));
        let rated = canonical(json!({"severity": "P1"}));
        assert_eq!(ColumnSet::incidents(&[plain.clone()]).len(), 7);
        let with_sev = ColumnSet::incidents(&[plain.clone(), rated]);
        assert_eq!(with_sev.len(), 8);
        assert_eq!(with_sev.columns()[3], Column::Severity);
        let view = render_summary_row(&plain, &with_sev);
        assert_eq!(view.cell(Column::Severity), Some("-"));
        assert_eq!(ColumnSet::latest().len(), 6);
        assert!(render_summary_row(&plain, &ColumnSet::latest()).cell(Column::Status).is_none());
    }

    #[test]
    fn test_detail_minimal_has_timeline_only() {
        let detail = render_detail_panel(&canonical(json!({})));
        assert_eq!(detail.titles(), vec!["Timeline"]);
    }

    #[test]
    fn test_detail_task_box_requires_arn() {
        let detail = render_detail_panel(&canonical(json!({
            "exit_code": 137,
            "task_last_status": "STOPPED"
        })));
        assert!(!detail.has_box("Task Evidence"));

        let detail = render_detail_panel(&canonical(json!({"task_arn": "arn:task/<1>"})));
        let task = detail.boxes.iter().find(|b| b.title == "Task Evidence").unwrap();
        assert_eq!(task.lines[0], "Task ARN: arn:task/&lt;1&gt;");
        assert_eq!(task.lines[1], "Exit Code: -");
        assert_eq!(task.lines[2], "Last Status: -");
    }

    #[test]
    fn test_detail_autoscaling_counts() {
        let detail = render_detail_panel(&canonical(json!({
            "desired_before": 1, "desired_after": 3, "running_before": 1,
            "alarm_name": "cpu-high"
        })));
        let scaling = detail.boxes.iter().find(|b| b.title == "Autoscaling Evidence").unwrap();
        assert_eq!(scaling.lines[0], "Desired: <b>1 → 3</b>");
        assert_eq!(scaling.lines[1], "Running: <b>1 → -</b>");
        assert_eq!(scaling.lines.last().unwrap(), "Alarm: cpu-high");
    }

    #[test]
    fn test_detail_box_order() {
        let detail = render_detail_panel(&canonical(json!({
            "failure_type": "TaskFailed", "task_arn": "t", "running_after": 2,
            "impact": "api 5xx", "learning": "raise memory", "service": "web",
            "failure_time": "2024-01-01T00:00:00Z"
        })));
        assert_eq!(
            detail.titles(),
            vec![
                "Failure",
                "Timeline",
                "Autoscaling Evidence",
                "Task Evidence",
                "Impact",
                "Learning",
                "Source Record"
            ]
        );
    }

    #[test]
    fn test_detail_html_hidden_until_expanded() {
        let detail = render_detail_panel(&canonical(json!({})));
        assert!(detail.to_html(4, 7, false).contains(r#"data-detail="4" hidden"#));
        assert!(!detail.to_html(4, 7, true).contains("hidden"));
        assert!(detail.to_html(4, 7, false).contains(r#"colspan="7""#));
    }
}
