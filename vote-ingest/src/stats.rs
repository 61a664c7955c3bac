//! Per-run counters, logged once when the stream ends

use tracing::info;

use crate::database::operations::WriteOutcome;
use crate::error::WriteFailure;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityTally {
    pub inserted: u64,
    pub already_present: u64,
    pub failed: u64,
}

impl EntityTally {
    pub fn record(&mut self, result: &Result<WriteOutcome, WriteFailure>) {
        match result {
            Ok(WriteOutcome::Inserted) => self.inserted += 1,
            Ok(WriteOutcome::AlreadyPresent) => self.already_present += 1,
            Err(_) => self.failed += 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub lines_read: u64,
    pub blank_lines: u64,
    pub malformed_lines: u64,
    pub documents: u64,
    /// Documents whose payload was not an object
    pub skipped_payloads: u64,
    /// Recognized list keys whose value was not an array
    pub skipped_lists: u64,
    pub polls: EntityTally,
    pub candidates: EntityTally,
    pub votes: EntityTally,
    pub interrupted: bool,
}

impl IngestStats {
    pub fn failed_writes(&self) -> u64 {
        self.polls.failed + self.candidates.failed + self.votes.failed
    }

    pub fn log_summary(&self) {
        info!(
            lines = self.lines_read,
            blank = self.blank_lines,
            malformed = self.malformed_lines,
            documents = self.documents,
            skipped_payloads = self.skipped_payloads,
            skipped_lists = self.skipped_lists,
            failed_writes = self.failed_writes(),
            interrupted = self.interrupted,
            "Input summary"
        );
        for (entity, tally) in [
            ("poll", &self.polls),
            ("candidate", &self.candidates),
            ("vote", &self.votes),
        ] {
            info!(
                entity,
                inserted = tally.inserted,
                already_present = tally.already_present,
                failed = tally.failed,
                "Write summary"
            );
        }
    }
}
