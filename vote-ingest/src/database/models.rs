use super::operations::{Entity, SqlValue, Table};
use crate::stats::{EntityTally, IngestStats};
use crate::types::{AddCandidateInstruction, InitializePollInstruction, VoteInstruction};

/// Stand-in for a missing field in log lines
const UNKNOWN: &str = "<unknown>";

/// Poll row, keyed by the poll account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub creator: Option<String>,
    pub poll_account: Option<String>,
    pub created_at: i64, // block number, not a timestamp
    pub block_number: i64,
    pub transaction_hash: Option<String>,
}

/// Candidate row, keyed by the candidate account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub poll_id: Option<String>,
    pub created_at: i64,
    pub block_number: i64,
    pub transaction_hash: Option<String>,
}

/// Vote row, keyed by the voter receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub id: Option<String>,
    pub voter: Option<String>,
    pub poll_id: Option<String>,
    pub candidate_id: Option<String>,
    pub created_at: i64,
    pub block_number: i64,
    pub transaction_hash: Option<String>,
}

impl Entity for PollRecord {
    const NAME: &'static str = "poll";
    const TABLE: Table = Table {
        name: "polls",
        key: "id",
        columns: &[
            "id",
            "name",
            "description",
            "start_time",
            "end_time",
            "creator",
            "poll_account",
            "created_at",
            "block_number",
            "transaction_hash",
        ],
    };

    type Source = InitializePollInstruction;

    /// Missing block number becomes 0; everything else stays absent.
    fn from_source(source: InitializePollInstruction) -> Self {
        let block_number = source.block_number.unwrap_or(0);
        PollRecord {
            id: source.acct_poll_account.clone(),
            name: source.name,
            description: source.description,
            start_time: source.start_time,
            end_time: source.end_time,
            creator: source.acct_signer,
            poll_account: source.acct_poll_account,
            created_at: block_number,
            block_number,
            transaction_hash: source.trx_hash,
        }
    }

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn describe(&self) -> String {
        self.name.as_deref().unwrap_or(UNKNOWN).to_string()
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.description.clone()),
            SqlValue::Integer(self.start_time),
            SqlValue::Integer(self.end_time),
            SqlValue::Text(self.creator.clone()),
            SqlValue::Text(self.poll_account.clone()),
            SqlValue::Integer(Some(self.created_at)),
            SqlValue::Integer(Some(self.block_number)),
            SqlValue::Text(self.transaction_hash.clone()),
        ]
    }

    fn tally(stats: &mut IngestStats) -> &mut EntityTally {
        &mut stats.polls
    }
}

impl Entity for CandidateRecord {
    const NAME: &'static str = "candidate";
    const TABLE: Table = Table {
        name: "candidates",
        key: "id",
        columns: &[
            "id",
            "name",
            "poll_id",
            "created_at",
            "block_number",
            "transaction_hash",
        ],
    };

    type Source = AddCandidateInstruction;

    fn from_source(source: AddCandidateInstruction) -> Self {
        let block_number = source.block_number.unwrap_or(0);
        CandidateRecord {
            id: source.acct_candidate_account,
            name: source.candidate_name,
            poll_id: source.acct_poll_account,
            created_at: block_number,
            block_number,
            transaction_hash: source.trx_hash,
        }
    }

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn describe(&self) -> String {
        self.name.as_deref().unwrap_or(UNKNOWN).to_string()
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.poll_id.clone()),
            SqlValue::Integer(Some(self.created_at)),
            SqlValue::Integer(Some(self.block_number)),
            SqlValue::Text(self.transaction_hash.clone()),
        ]
    }

    fn tally(stats: &mut IngestStats) -> &mut EntityTally {
        &mut stats.candidates
    }
}

impl Entity for VoteRecord {
    const NAME: &'static str = "vote";
    const TABLE: Table = Table {
        name: "votes",
        key: "id",
        columns: &[
            "id",
            "voter",
            "poll_id",
            "candidate_id",
            "created_at",
            "block_number",
            "transaction_hash",
        ],
    };

    type Source = VoteInstruction;

    fn from_source(source: VoteInstruction) -> Self {
        let block_number = source.block_number.unwrap_or(0);
        VoteRecord {
            id: source.acct_voter_receipt,
            voter: source.acct_signer,
            poll_id: source.acct_poll_account,
            candidate_id: source.acct_candidate_account,
            created_at: block_number,
            block_number,
            transaction_hash: source.trx_hash,
        }
    }

    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn describe(&self) -> String {
        format!(
            "{} -> {}",
            self.voter.as_deref().unwrap_or(UNKNOWN),
            self.candidate_id.as_deref().unwrap_or(UNKNOWN)
        )
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::Text(self.voter.clone()),
            SqlValue::Text(self.poll_id.clone()),
            SqlValue::Text(self.candidate_id.clone()),
            SqlValue::Integer(Some(self.created_at)),
            SqlValue::Integer(Some(self.block_number)),
            SqlValue::Text(self.transaction_hash.clone()),
        ]
    }

    fn tally(stats: &mut IngestStats) -> &mut EntityTally {
        &mut stats.votes
    }
}
