//! Instruction records carried by the voting event stream

use serde::{de, Deserialize, Deserializer};

/// One `initialize_poll` instruction
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializePollInstruction {
    pub acct_poll_account: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub start_time: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub end_time: Option<i64>,
    pub acct_signer: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub block_number: Option<i64>,
    pub trx_hash: Option<String>,
}

/// One `add_candidate` instruction
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCandidateInstruction {
    pub acct_candidate_account: Option<String>,
    pub candidate_name: Option<String>,
    pub acct_poll_account: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub block_number: Option<i64>,
    pub trx_hash: Option<String>,
}

/// One `vote` instruction
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteInstruction {
    pub acct_voter_receipt: Option<String>,
    pub acct_signer: Option<String>,
    pub acct_poll_account: Option<String>,
    pub acct_candidate_account: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub block_number: Option<i64>,
    pub trx_hash: Option<String>,
}

/// Protobuf JSON writes 64-bit integers as strings, so accept both forms.
fn de_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a signed 64-bit integer, found {s:?}"))),
    }
}
