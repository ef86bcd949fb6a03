//! Dashboard view: aggregate cards plus the latest incident.

use std::fmt::Write as _;

use super::table::IncidentTable;
use crate::incident::normalize::NONE;
use crate::incident::{IncidentRecord, SummaryAggregate};
use crate::render::escape::escape_str;
use crate::render::format::{format_instant, humanize_duration};

/// A metric card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: &'static str,
    /// Escaped display value.
    pub value: String,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub cards: Vec<Card>,
    /// Escaped, formatted `generated_at` of the summary, if any.
    pub updated: Option<String>,
    pub latest: IncidentTable,
}

impl Default for DashboardView {
    fn default() -> Self {
        let mut view = Self {
            cards: Vec::new(),
            updated: None,
            latest: IncidentTable::latest(),
        };
        view.render_dashboard(None, None);
        view
    }
}

fn count(value: Option<u64>) -> String {
    value.map_or_else(|| NONE.to_string(), |n| n.to_string())
}

impl DashboardView {
    /// Rebuild cards and the latest-incident strip from a fresh snapshot.
    pub fn render_dashboard(
        &mut self,
        summary: Option<&SummaryAggregate>,
        latest: Option<&IncidentRecord>,
    ) {
        let avg = match summary {
            Some(SummaryAggregate {
                avg_mttr_human: Some(human),
                ..
            }) => escape_str(human),
            Some(s) => humanize_duration(s.avg_mttr_seconds),
            None => humanize_duration(None),
        };

        self.cards = vec![
            Card {
                title: "System Status",
                value: concat!(
                    r#"<span class="badge">"#,
                    r#"<span class="dot ok"></span>RUNNING</span>"#
                )
                .to_string(),
                hint: "ECS service maintaining desired tasks.",
            },
            Card {
                title: "Total Incidents",
                value: count(summary.and_then(|s| s.total_incidents)),
                hint: "All failures recorded via EventBridge / CloudWatch.",
            },
            Card {
                title: "Average MTTR",
                value: avg,
                hint: "Calculated from observed recovery timestamps.",
            },
            Card {
                title: "Open vs Resolved",
                value: format!(
                    "{} / {}",
                    count(summary.and_then(SummaryAggregate::open_count)),
                    count(summary.and_then(SummaryAggregate::resolved_count))
                ),
                hint: "Live operational state.",
            },
            Card {
                title: "Detection",
                value: "EventBridge".to_string(),
                hint: "ECS Task State Change events.",
            },
            Card {
                title: "Healing",
                value: "ECS Scheduler".to_string(),
                hint: "Desired count enforcement.",
            },
        ];

        self.updated = summary
            .and_then(|s| s.generated_at.as_deref())
            .map(|at| escape_str(&format_instant(Some(at))));

        self.latest.render_incident_list(latest.map(std::slice::from_ref).unwrap_or(&[]));
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from(r#"<div class="cards">"#);
        for card in &self.cards {
            let _ = write!(
                out,
                concat!(
                    r#"<div class="card glass"><h3>{}</h3>"#,
                    r#"<p class="value">{}</p><div class="hint">{}</div></div>"#
                ),
                card.title, card.value, card.hint
            );
        }
        out.push_str("</div>");
        if let Some(updated) = &self.updated {
            let _ = write!(out, r#"<p class="muted">Updated: {}</p>"#, updated);
        }
        out.push_str("<h2>Latest Incident</h2>");
        out.push_str(&self.latest.to_html("latestTable"));
        out
    }
}
