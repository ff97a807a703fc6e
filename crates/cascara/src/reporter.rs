//! Error and warning reporting.
//!
//! Compilation never fails as a whole: stages deliver their errors to a
//! [`Reporter`] and the orchestrator carries on with whatever work
//! remains. Reporters are called from arbitrary worker threads and must
//! be internally synchronized.

use parking_lot::Mutex;

use crate::error::{Error, Severity};

/// Sink for errors and warnings raised during compilation.
pub trait Reporter: Send + Sync {
    /// Record an error or warning. Called from any thread.
    fn add_error(&self, error: Error);
}

/// The default reporter: renders diagnostics to the log, warnings at
/// warn level and everything else at error level.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn add_error(&self, error: Error) {
        match error.severity() {
            Severity::Warning => tracing::warn!("{error}"),
            Severity::Error => tracing::error!("{error}"),
        }
    }
}

/// A reporter that collects everything it is given, for tests and for
/// callers that want to inspect diagnostics after compilation.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    errors: Mutex<Vec<Error>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the collected errors and warnings.
    pub fn take(&self) -> Vec<Error> {
        std::mem::take(&mut self.errors.lock())
    }

    /// The number of collected entries, warnings included.
    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    /// Whether nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }

    /// The number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors
            .lock()
            .iter()
            .filter(|error| error.severity() == Severity::Error)
            .count()
    }

    /// The number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.errors
            .lock()
            .iter()
            .filter(|error| error.severity() == Severity::Warning)
            .count()
    }

    /// Run `f` over each collected entry without draining.
    pub fn for_each(&self, mut f: impl FnMut(&Error)) {
        for error in self.errors.lock().iter() {
            f(error);
        }
    }
}

impl Reporter for MemoryReporter {
    fn add_error(&self, error: Error) {
        self.errors.lock().push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostic;
    use crate::source::{Source, Span};

    #[test]
    fn memory_reporter_counts_by_severity() {
        let source = Source::new("test.css", "a{}");
        let reporter = MemoryReporter::new();

        reporter.add_error(Error::Parse(Diagnostic::error(
            &source,
            Span::new(0, 1),
            "bad",
        )));
        reporter.add_error(Error::Transform(Diagnostic::warning(
            &source,
            Span::new(0, 1),
            "iffy",
        )));

        assert_eq!(reporter.len(), 2);
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.warning_count(), 1);

        assert_eq!(reporter.take().len(), 2);
        assert!(reporter.is_empty());
    }
}
