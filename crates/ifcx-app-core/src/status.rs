// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded status-line queue fed by composition reports.
//!
//! Front ends never surface a failed composition as a crash: every report
//! becomes one neutral headline plus, when there were findings, a warning
//! summary.

use std::collections::VecDeque;

use ifcx_core::{CompositionReport, CompositionStatus, Diagnostic};

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Informational note.
    Info,
    /// Something was dropped or mismatched but composition went on.
    Warn,
    /// The rebuild aborted.
    Error,
}

/// Identifier for a status line.
pub type StatusId = u64;

/// One line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Stable identifier.
    pub id: StatusId,
    /// Severity.
    pub kind: StatusKind,
    /// Short headline.
    pub title: String,
    /// Optional detail.
    pub body: Option<String>,
    /// How many times this exact line was pushed in a row.
    pub repeats: u32,
}

/// Queue of the most recent status lines.
pub struct StatusBoard {
    lines: VecDeque<StatusLine>,
    max: usize,
    next_id: StatusId,
}

impl StatusBoard {
    /// Board keeping at most `max` lines (at least one).
    pub fn new(max: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max: max.max(1),
            next_id: 1,
        }
    }

    /// Push a line; an identical repeat of the newest line only bumps its counter.
    pub fn push<T, B>(&mut self, kind: StatusKind, title: T, body: B) -> StatusId
    where
        T: Into<String>,
        B: Into<Option<String>>,
    {
        let title = title.into();
        let body = body.into();
        if let Some(last) = self.lines.back_mut() {
            if last.kind == kind && last.title == title && last.body == body {
                last.repeats += 1;
                return last.id;
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.lines.len() == self.max {
            self.lines.pop_front();
        }
        self.lines.push_back(StatusLine {
            id,
            kind,
            title,
            body,
            repeats: 1,
        });
        id
    }

    /// Headline for `report`, plus a warning summary when it has findings.
    pub fn record_report(&mut self, report: &CompositionReport) -> StatusId {
        let (kind, title, body) = match &report.status {
            CompositionStatus::Idle => (StatusKind::Info, "nothing composed yet".to_owned(), None),
            CompositionStatus::Composed { nodes } => {
                (StatusKind::Info, format!("composed {nodes} nodes"), None)
            }
            CompositionStatus::NoVisibleFiles => {
                (StatusKind::Info, "no visible files".to_owned(), None)
            }
            CompositionStatus::NoRoot => (StatusKind::Info, "no root found".to_owned(), None),
            CompositionStatus::Failed { reason } => (
                StatusKind::Error,
                "composition failed".to_owned(),
                Some(reason.clone()),
            ),
        };
        let id = self.push(kind, title, body);

        // `NoRoot` is already the headline.
        let resolution: Vec<&Diagnostic> = report
            .resolution_warnings()
            .filter(|d| !matches!(d, Diagnostic::NoRoot))
            .collect();
        let schema: Vec<&Diagnostic> = report
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::MissingSchema { .. }))
            .collect();
        if !resolution.is_empty() || !schema.is_empty() {
            let first = resolution.first().or_else(|| schema.first());
            self.push(
                StatusKind::Warn,
                format!(
                    "{} reference warning(s), {} attribute(s) without schema",
                    resolution.len(),
                    schema.len()
                ),
                first.map(ToString::to_string),
            );
        }
        id
    }

    /// Lines oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &StatusLine> + '_ {
        self.lines.iter()
    }

    /// Newest line.
    pub fn latest(&self) -> Option<&StatusLine> {
        self.lines.back()
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_collapse_into_one_line() {
        let mut board = StatusBoard::new(4);
        let title = "no root found";
        let a = board.push(StatusKind::Info, title, None::<String>);
        let b = board.push(StatusKind::Info, title, None::<String>);
        assert_eq!(a, b);
        assert_eq!(board.lines().count(), 1);
        assert_eq!(board.latest().map(|l| l.repeats), Some(2));
    }

    #[test]
    fn oldest_line_is_evicted() {
        let mut board = StatusBoard::new(2);
        board.push(StatusKind::Info, "one", None::<String>);
        board.push(StatusKind::Info, "two", None::<String>);
        board.push(StatusKind::Info, "three", None::<String>);
        let titles: Vec<_> = board.lines().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["two", "three"]);
    }

    #[test]
    fn report_headline_and_warning_summary() {
        let mut board = StatusBoard::default();
        let report = CompositionReport {
            status: CompositionStatus::Composed { nodes: 3 },
            diagnostics: vec![
                Diagnostic::MissingSchema {
                    path: "w".into(),
                    key: "k".into(),
                },
                Diagnostic::DanglingReference {
                    from: "root".into(),
                    target: "gone".into(),
                },
            ],
        };
        board.record_report(&report);
        let lines: Vec<_> = board.lines().collect();
        assert_eq!(lines[0].title, "composed 3 nodes");
        assert_eq!(lines[1].kind, StatusKind::Warn);
        assert_eq!(
            lines[1].title,
            "1 reference warning(s), 1 attribute(s) without schema"
        );
        assert_eq!(
            lines[1].body.as_deref(),
            Some("`root` references missing node `gone`")
        );
    }

    #[test]
    fn no_root_headline_is_not_counted_as_warning() {
        let mut board = StatusBoard::default();
        board.record_report(&CompositionReport {
            status: CompositionStatus::NoRoot,
            diagnostics: vec![Diagnostic::NoRoot],
        });
        let titles: Vec<_> = board.lines().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["no root found"]);
    }

    #[test]
    fn failure_is_error_line_with_reason() {
        let mut board = StatusBoard::default();
        board.record_report(&CompositionReport {
            status: CompositionStatus::Failed {
                reason: "too deep".into(),
            },
            diagnostics: Vec::new(),
        });
        let line = board.latest().unwrap();
        assert_eq!(line.kind, StatusKind::Error);
        assert_eq!(line.body.as_deref(), Some("too deep"));
    }
}
