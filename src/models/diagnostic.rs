// Skipped-field diagnostics and the per-scrape result

use std::fmt;

use super::ControllerReport;

/// Something the extractor had to leave out, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What was being extracted, e.g. `controller 0` or `Drive /c0/e252/s3`.
    pub scope: String,
    pub field: String,
    pub reason: String,
}

impl Diagnostic {
    pub fn new(
        scope: impl Into<String>,
        field: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        Self {
            scope: scope.into(),
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.scope, self.field, self.reason)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub controllers: Vec<ControllerReport>,
    pub diagnostics: Vec<Diagnostic>,
}
