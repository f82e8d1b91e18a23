//! Operator outcomes and user-facing reports.

use std::fmt;

/// Severity of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    /// Informational message.
    Info,
    /// Something prevented part of the work.
    Warning,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Severity.
    pub level: ReportLevel,
    /// Human-readable text.
    pub message: String,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            ReportLevel::Info => write!(f, "{}", self.message),
            ReportLevel::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Final state of an operator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorStatus {
    /// The operator completed its work.
    Finished,
    /// The operator stopped; the invocation had no or partial effect.
    Cancelled,
}

/// Status plus the reports produced along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorResult {
    /// Final status.
    pub status: OperatorStatus,
    /// Reports in emission order.
    pub reports: Vec<Report>,
}

impl Default for OperatorResult {
    fn default() -> Self {
        Self::finished()
    }
}

impl OperatorResult {
    /// A finished result without reports.
    pub fn finished() -> Self {
        Self {
            status: OperatorStatus::Finished,
            reports: Vec::new(),
        }
    }

    /// A cancelled result carrying one warning.
    pub fn cancelled(message: impl Into<String>) -> Self {
        let mut result = Self::finished();
        result.warn(message);
        result.cancel();
        result
    }

    /// Mark the invocation as cancelled.
    pub fn cancel(&mut self) {
        self.status = OperatorStatus::Cancelled;
    }

    /// Add and log an info report.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.reports.push(Report {
            level: ReportLevel::Info,
            message,
        });
    }

    /// Add and log a warning report.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.reports.push(Report {
            level: ReportLevel::Warning,
            message,
        });
    }

    /// Check for [`OperatorStatus::Finished`].
    pub fn is_finished(&self) -> bool {
        self.status == OperatorStatus::Finished
    }

    /// Messages of all warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &str> + '_ {
        self.reports
            .iter()
            .filter(|r| r.level == ReportLevel::Warning)
            .map(|r| r.message.as_str())
    }

    /// Messages of all info reports.
    pub fn infos(&self) -> impl Iterator<Item = &str> + '_ {
        self.reports
            .iter()
            .filter(|r| r.level == ReportLevel::Info)
            .map(|r| r.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_keep_order_and_level() {
        let mut result = OperatorResult::finished();
        result.info("1 face(s) are flipped/rotated");
        result.warn("No faces are selected");

        assert!(result.is_finished());
        assert_eq!(result.infos().collect::<Vec<_>>(), vec!["1 face(s) are flipped/rotated"]);
        assert_eq!(result.warnings().collect::<Vec<_>>(), vec!["No faces are selected"]);
        assert_eq!(result.reports[1].to_string(), "warning: No faces are selected");
    }

    #[test]
    fn test_cancelled() {
        let result = OperatorResult::cancelled("Need copy UV at first");
        assert_eq!(result.status, OperatorStatus::Cancelled);
        assert_eq!(result.reports.len(), 1);
    }
}
