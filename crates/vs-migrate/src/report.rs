use std::fmt;

use tracing::{info, warn};

/// What a successful item did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Downloaded,
    AlreadyPresent,
    Uploaded,
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Downloaded => "downloaded",
            Self::AlreadyPresent => "already exists",
            Self::Uploaded => "uploaded",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        };
        f.write_str(verb)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Succeeded(Action),
    Skipped(String),
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub subject: String,
    pub outcome: Outcome,
}

/// Per-item results of one batch. Recording an entry also logs it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    entries: Vec<Entry>,
}

impl BatchSummary {
    pub fn record(&mut self, subject: impl Into<String>, outcome: Outcome) {
        let subject = subject.into();
        match &outcome {
            Outcome::Succeeded(action) => info!(%subject, "{action}"),
            Outcome::Skipped(reason) => warn!(%subject, %reason, "skipped"),
            Outcome::Failed(reason) => warn!(%subject, %reason, "failed"),
        }
        self.entries.push(Entry { subject, outcome });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Failed(_)))
            .count()
    }

    pub fn count(&self, action: Action) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == Outcome::Succeeded(action))
            .count()
    }

    pub fn outcome_of(&self, subject: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.subject == subject)
            .map(|e| &e.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_outcome() {
        let mut summary = BatchSummary::default();
        summary.record("a.jpg", Outcome::Succeeded(Action::Downloaded));
        summary.record("b.jpg", Outcome::Succeeded(Action::AlreadyPresent));
        summary.record("c.jpg", Outcome::Failed("status 404".into()));
        summary.record("d.jpg", Outcome::Skipped("missing".into()));

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.count(Action::AlreadyPresent), 1);
        assert_eq!(
            summary.outcome_of("c.jpg"),
            Some(&Outcome::Failed("status 404".into()))
        );
    }
}
