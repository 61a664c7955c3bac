//! Route instruction lists to their tables

use serde::Deserialize;
use serde_json::Value;
use sqlx::AnyConnection;
use tracing::{error, info, warn};

use crate::database::models::{CandidateRecord, PollRecord, VoteRecord};
use crate::database::operations::{upsert, Entity, WriteOutcome};
use crate::error::WriteFailure;
use crate::stats::IngestStats;

pub const POLL_LIST_KEY: &str = "initializePollInstructionList";
pub const CANDIDATE_LIST_KEY: &str = "addCandidateInstructionList";
pub const VOTE_LIST_KEY: &str = "voteInstructionList";

/// Store every recognized list in `payload`: polls, then candidates, then votes.
///
/// Absent keys are skipped. Failures are logged and counted, never returned.
pub async fn dispatch_document(conn: &mut AnyConnection, payload: &Value, stats: &mut IngestStats) {
    let Some(fields) = payload.as_object() else {
        warn!("Skipping payload that is not a JSON object");
        stats.skipped_payloads += 1;
        return;
    };

    process_list::<PollRecord>(conn, POLL_LIST_KEY, fields.get(POLL_LIST_KEY), stats).await;
    process_list::<CandidateRecord>(conn, CANDIDATE_LIST_KEY, fields.get(CANDIDATE_LIST_KEY), stats)
        .await;
    process_list::<VoteRecord>(conn, VOTE_LIST_KEY, fields.get(VOTE_LIST_KEY), stats).await;
}

async fn process_list<E: Entity>(
    conn: &mut AnyConnection,
    key: &str,
    list: Option<&Value>,
    stats: &mut IngestStats,
) {
    let Some(list) = list else {
        return;
    };
    let Some(elements) = list.as_array() else {
        warn!(entity = E::NAME, "Skipping {}: value is not an array", key);
        stats.skipped_lists += 1;
        return;
    };

    for element in elements {
        let result = write_element::<E>(conn, element).await;
        E::tally(stats).record(&result);

        if let Err(e) = result {
            error!(entity = e.entity(), "Write failure: {}", e);
        }
    }
}

/// Map and store a single list element
pub async fn write_element<E: Entity>(
    conn: &mut AnyConnection,
    element: &Value,
) -> Result<WriteOutcome, WriteFailure> {
    let source = E::Source::deserialize(element).map_err(|source| WriteFailure::Extract {
        entity: E::NAME,
        source,
    })?;
    let record = E::from_source(source);

    let outcome = upsert(conn, &record)
        .await
        .map_err(|source| WriteFailure::Store {
            entity: E::NAME,
            source,
        })?;

    let key = record.key().unwrap_or_default();
    match outcome {
        WriteOutcome::Inserted => info!(entity = E::NAME, key, "Stored {}: {}", E::NAME, record.describe()),
        WriteOutcome::AlreadyPresent => info!(entity = E::NAME, key, "{} already present, skipped", E::NAME),
    }

    Ok(outcome)
}
