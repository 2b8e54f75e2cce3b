//! # Suite Runner and Report
//!
//! Evaluates diagnostic units in order and collects a [`SuiteReport`].
//!
//! A time budget, when configured, is soft: every unit runs to completion,
//! and a unit whose evaluation took longer than the budget is reported as
//! failed whatever its own outcome was.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sck_core::FailureKind;

use crate::diagnostic::{Category, DiagnosticUnit, Outcome};

/// Reported status of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    /// Passed.
    Pass,
    /// Failed.
    Fail,
    /// Skipped.
    Skip,
}

impl UnitStatus {
    /// Column label in text output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }
}

/// Result of one evaluated unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitReport {
    /// Unit name.
    pub name: String,
    /// Unit category.
    pub category: Category,
    /// Final status.
    pub status: UnitStatus,
    /// Failure kind, for failed units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    /// Failure message or skip reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Wall-clock evaluation time in milliseconds.
    pub duration_ms: f64,
}

/// Totals over a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Units evaluated.
    pub total: usize,
    /// Units passed.
    pub passed: usize,
    /// Units failed.
    pub failed: usize,
    /// Units skipped.
    pub skipped: usize,
}

/// Outcome of running a sequence of units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Per-unit results, in evaluation order.
    pub units: Vec<UnitReport>,
    /// Totals.
    pub summary: Summary,
}

/// Evaluate one unit and apply the budget.
fn run_unit(unit: &DiagnosticUnit, budget: Option<Duration>) -> UnitReport {
    let start = Instant::now();
    let outcome = unit.evaluate();
    let elapsed = start.elapsed();

    let (mut status, mut failure_kind, mut message) = match outcome {
        Outcome::Passed => (UnitStatus::Pass, None, None),
        Outcome::Failed { failure } => (
            UnitStatus::Fail,
            Some(failure.kind()),
            Some(failure.message().to_string()),
        ),
        Outcome::Skipped { reason } => (UnitStatus::Skip, None, Some(reason)),
    };

    if let Some(limit) = budget {
        if elapsed > limit {
            tracing::warn!(
                unit = unit.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = limit.as_millis() as u64,
                "Unit exceeded its time budget"
            );
            status = UnitStatus::Fail;
            failure_kind = Some(FailureKind::InvocationFailure);
            message = Some(format!(
                "The check \"{}\" exceeded its time budget of {} ms.",
                unit.name(),
                limit.as_millis()
            ));
        }
    }

    UnitReport {
        name: unit.name().to_string(),
        category: unit.category(),
        status,
        failure_kind,
        message,
        duration_ms: elapsed.as_secs_f64() * 1000.0,
    }
}

impl SuiteReport {
    /// Evaluate every unit in order.
    pub fn run(units: &[DiagnosticUnit], budget: Option<Duration>) -> Self {
        let started_at = Utc::now();
        let reports: Vec<UnitReport> = units.iter().map(|u| run_unit(u, budget)).collect();

        let mut summary = Summary {
            total: reports.len(),
            ..Summary::default()
        };
        for r in &reports {
            match r.status {
                UnitStatus::Pass => summary.passed += 1,
                UnitStatus::Fail => summary.failed += 1,
                UnitStatus::Skip => summary.skipped += 1,
            }
        }
        tracing::info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "Suite finished"
        );

        Self {
            started_at,
            units: reports,
            summary,
        }
    }

    /// Whether no unit failed.
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0
    }

    /// Failed units only.
    pub fn failures(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| u.status == UnitStatus::Fail)
    }

    /// Human-readable report: one status line per unit, indented failure
    /// messages, and a totals line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for unit in &self.units {
            let _ = writeln!(out, "{}  {}", unit.status.label(), unit.name);
            if unit.status != UnitStatus::Pass {
                if let Some(message) = &unit.message {
                    for line in message.lines() {
                        let _ = writeln!(out, "      {line}");
                    }
                }
            }
        }
        let _ = writeln!(
            out,
            "\n{} units: {} passed, {} failed, {} skipped",
            self.summary.total, self.summary.passed, self.summary.failed, self.summary.skipped
        );
        out
    }

    /// Pretty-printed JSON report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sck_core::CheckFailure;

    fn units() -> Vec<DiagnosticUnit> {
        vec![
            DiagnosticUnit::new("ClassTest[A]", Category::Class, || Outcome::Passed),
            DiagnosticUnit::failing(
                "AttributeTest[A|x]",
                Category::Attribute,
                CheckFailure::ElementNotFound("Could not find\nName: x".into()),
            ),
            DiagnosticUnit::skipped("MethodTest[A]", Category::Method, "empty"),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let report = SuiteReport::run(&units(), None);
        assert_eq!(
            report.summary,
            Summary {
                total: 3,
                passed: 1,
                failed: 1,
                skipped: 1
            }
        );
        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_text_rendering() {
        let text = SuiteReport::run(&units(), None).render_text();
        assert!(text.contains("PASS  ClassTest[A]"));
        assert!(text.contains("FAIL  AttributeTest[A|x]\n      Could not find\n      Name: x"));
        assert!(text.contains("SKIP  MethodTest[A]\n      empty"));
        assert!(text.ends_with("3 units: 1 passed, 1 failed, 1 skipped\n"));
    }

    #[test]
    fn test_over_budget_unit_fails() {
        let slow = vec![DiagnosticUnit::new("ClassTest[Slow]", Category::Class, || {
            std::thread::sleep(Duration::from_millis(20));
            Outcome::Passed
        })];
        let report = SuiteReport::run(&slow, Some(Duration::from_millis(1)));
        let unit = &report.units[0];
        assert_eq!(unit.status, UnitStatus::Fail);
        assert_eq!(unit.failure_kind, Some(FailureKind::InvocationFailure));
        assert!(unit.message.as_deref().unwrap().contains("time budget of 1 ms"));
    }

    #[test]
    fn test_json_shape() {
        let report = SuiteReport::run(&units(), None);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["units"][1]["status"], "fail");
        assert_eq!(value["units"][1]["failure_kind"], "element_not_found");
        assert!(value["units"][0].get("message").is_none());
    }
}
