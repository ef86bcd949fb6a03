//! Incident tables: summary/detail row pairs with per-row expand state.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use crate::incident::normalize::NONE;
use crate::incident::{normalize, CanonicalRow, IncidentRecord};
use crate::render::row::{render_detail_panel, render_summary_row, ColumnSet, DetailView, RowView};

pub const EMPTY_MESSAGE: &str = "No incidents yet.";

/// Visibility of a row's detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Collapsed,
    Expanded,
}

impl DetailState {
    pub fn toggled(self) -> Self {
        match self {
            DetailState::Collapsed => DetailState::Expanded,
            DetailState::Expanded => DetailState::Collapsed,
        }
    }
}

/// A rendered incident: its summary row and its detail row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPair {
    pub summary: RowView,
    pub detail: DetailView,
    key: String,
    state: DetailState,
}

impl RowPair {
    fn new(row: &CanonicalRow, columns: &ColumnSet, key: String, state: DetailState) -> Self {
        Self {
            summary: render_summary_row(row, columns),
            detail: render_detail_panel(row),
            key,
            state,
        }
    }

    /// Identity of the incident across renders.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> DetailState {
        self.state
    }

    /// Handle a click on the summary row.
    pub fn click(&mut self) -> DetailState {
        self.state = self.state.toggled();
        self.state
    }
}

/// Stable per-row keys: the incident reference when there is one, else the
/// displayed identity, suffixed with an occurrence count for duplicates.
fn row_keys(rows: &[CanonicalRow]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    rows.iter()
        .map(|row| {
            let base = if row.reference != NONE {
                format!("ref:{}", row.reference)
            } else {
                format!(
                    "row:{}|{}|{}",
                    row.time_shown, row.location, row.classification
                )
            };
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            format!("{}#{}", base, n)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableKind {
    Incidents,
    Latest,
}

/// A table of incident row pairs. Each render replaces every row.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentTable {
    kind: TableKind,
    columns: ColumnSet,
    pairs: Vec<RowPair>,
}

impl IncidentTable {
    /// The full incident list.
    pub fn incidents() -> Self {
        Self {
            kind: TableKind::Incidents,
            columns: ColumnSet::incidents(&[]),
            pairs: Vec::new(),
        }
    }

    /// The dashboard's latest-incident strip.
    pub fn latest() -> Self {
        Self {
            kind: TableKind::Latest,
            columns: ColumnSet::latest(),
            pairs: Vec::new(),
        }
    }

    /// Replace the table contents with `items`.
    ///
    /// New rows start collapsed, except incidents that were expanded in the
    /// previous render, which stay expanded.
    pub fn render_incident_list(&mut self, items: &[IncidentRecord]) {
        let rows: Vec<CanonicalRow> = items.iter().map(normalize).collect();
        self.columns = match self.kind {
            TableKind::Incidents => ColumnSet::incidents(&rows),
            TableKind::Latest => ColumnSet::latest(),
        };
        let expanded: HashSet<String> = self
            .pairs
            .drain(..)
            .filter(|pair| pair.state == DetailState::Expanded)
            .map(|pair| pair.key)
            .collect();
        let keys = row_keys(&rows);
        for (row, key) in rows.iter().zip(keys) {
            let state = if expanded.contains(&key) {
                DetailState::Expanded
            } else {
                DetailState::Collapsed
            };
            self.pairs.push(RowPair::new(row, &self.columns, key, state));
        }
    }

    /// Toggle the detail panel of row `row_id`. `None` if no such row.
    pub fn click(&mut self, row_id: usize) -> Option<DetailState> {
        self.pairs.get_mut(row_id).map(RowPair::click)
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn pairs(&self) -> &[RowPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `<tbody>` contents: two rows per incident, or one placeholder row.
    pub fn body_html(&self) -> String {
        if self.pairs.is_empty() {
            return format!(
                r#"<tr class="placeholder"><td colspan="{}" class="muted">{}</td></tr>"#,
                self.columns.len(),
                EMPTY_MESSAGE
            );
        }
        let mut out = String::new();
        for (id, pair) in self.pairs.iter().enumerate() {
            out.push_str(&pair.summary.to_html(id));
            out.push_str(&pair.detail.to_html(
                id,
                self.columns.len(),
                pair.state == DetailState::Expanded,
            ));
        }
        out
    }

    pub fn to_html(&self, table_id: &str) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            concat!(
                r#"<table id="{}" class="incidents">"#,
                "<thead><tr>{}</tr></thead><tbody>{}</tbody></table>"
            ),
            table_id,
            self.columns.header_html(),
            self.body_html()
        );
        out
    }
}
