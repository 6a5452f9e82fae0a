//! Append-only call journal with a SHA-256 hash chain, and replay.
//!
//! Every submitted call is journaled, whether it committed or was
//! rejected. Each entry's hash covers the previous entry's hash, the call,
//! its status, its events and the resulting state hash:
//!
//! ```text
//! entry_hash[n] = SHA256("genbit:journal:v1:" || entry_hash[n-1] || json(fields[n]))
//! entry_hash[-1] = SHA256("genbit:journal:genesis:v1:" || json(genesis))
//! ```
//!
//! Wall-clock timestamps are recorded for operators but never hashed, so a
//! faithful replay reproduces every hash exactly.

use chrono::{DateTime, Utc};
use genbit_types::{Address, Event, GenbitError, GenesisConfig, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Applied, Call, Exchange, QuoteFunding};

/// Identity and configuration the exchange was initialized with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisRecord {
    pub owner: Address,
    pub config: GenesisConfig,
    /// Hex state hash right after the mint.
    pub state_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    Committed,
    Rejected { code: String, message: String },
}

impl EntryStatus {
    #[must_use]
    pub fn from_result(result: &Result<Applied>) -> Self {
        match result {
            Ok(_) => Self::Committed,
            Err(err) => Self::Rejected {
                code: err.code().to_owned(),
                message: err.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub call: Call,
    pub status: EntryStatus,
    /// Empty for rejected calls.
    pub events: Vec<Event>,
    /// Hex state hash after this call.
    pub state_hash: String,
    pub prev_hash: String,
    pub entry_hash: String,
}

/// The hashed subset of an entry.
#[derive(Serialize)]
struct HashedFields<'a> {
    sequence: u64,
    call: &'a Call,
    status: &'a EntryStatus,
    events: &'a [Event],
    state_hash: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    genesis: GenesisRecord,
    entries: Vec<JournalEntry>,
}

impl Journal {
    #[must_use]
    pub fn new(genesis: GenesisRecord) -> Self {
        Self {
            genesis,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn genesis(&self) -> &GenesisRecord {
        &self.genesis
    }

    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hash of the newest entry, or of the genesis record if there is none.
    pub fn head(&self) -> Result<String> {
        match self.entries.last() {
            Some(entry) => Ok(entry.entry_hash.clone()),
            None => genesis_hash(&self.genesis),
        }
    }

    /// Append the record of one submitted call.
    pub(crate) fn record(&mut self, call: Call, result: &Result<Applied>, state_hash: [u8; 32]) -> Result<&JournalEntry> {
        let sequence = self.entries.len() as u64;
        let status = EntryStatus::from_result(result);
        let events = result.as_ref().map(|a| a.events.clone()).unwrap_or_default();
        let state_hash = hex::encode(state_hash);
        let prev_hash = self.head()?;
        let entry_hash = entry_hash(&prev_hash, sequence, &call, &status, &events, &state_hash)?;

        self.entries.push(JournalEntry {
            sequence,
            recorded_at: Utc::now(),
            call,
            status,
            events,
            state_hash,
            prev_hash,
            entry_hash,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Recompute every link of the hash chain.
    ///
    /// # Errors
    /// `ReplayDivergence` at the first entry whose stored hashes disagree.
    pub fn verify_chain(&self) -> Result<()> {
        let mut prev = genesis_hash(&self.genesis)?;
        for entry in &self.entries {
            if entry.prev_hash != prev {
                return Err(GenbitError::ReplayDivergence {
                    sequence: entry.sequence,
                    reason: format!("prev_hash {} != {prev}", entry.prev_hash),
                });
            }
            let expected = entry_hash(
                &prev,
                entry.sequence,
                &entry.call,
                &entry.status,
                &entry.events,
                &entry.state_hash,
            )?;
            if entry.entry_hash != expected {
                return Err(GenbitError::ReplayDivergence {
                    sequence: entry.sequence,
                    reason: format!("entry_hash {} != {expected}", entry.entry_hash),
                });
            }
            prev = expected;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn genesis_hash(genesis: &GenesisRecord) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(b"genbit:journal:genesis:v1:");
    hasher.update(serde_json::to_vec(genesis)?);
    Ok(hex::encode(hasher.finalize()))
}

fn entry_hash(
    prev_hash: &str,
    sequence: u64,
    call: &Call,
    status: &EntryStatus,
    events: &[Event],
    state_hash: &str,
) -> Result<String> {
    let fields = HashedFields {
        sequence,
        call,
        status,
        events,
        state_hash,
    };
    let mut hasher = Sha256::new();
    hasher.update(b"genbit:journal:v1:");
    hasher.update(prev_hash.as_bytes());
    hasher.update(serde_json::to_vec(&fields)?);
    Ok(hex::encode(hasher.finalize()))
}

/// Rebuild an exchange by re-applying every journaled call from genesis.
///
/// `funding` must answer quote-funds queries the way the recording funding
/// source did, or buy-order outcomes will differ.
///
/// # Errors
/// `ReplayDivergence` at the first entry whose status, events or hashes
/// differ from what was recorded.
pub fn replay<F: QuoteFunding>(journal: &Journal, funding: F) -> Result<Exchange<F>> {
    journal.verify_chain()?;
    let genesis = journal.genesis();
    let mut exchange = Exchange::with_funding(genesis.owner, &genesis.config, funding)?;
    if exchange.journal().genesis() != genesis {
        return Err(GenbitError::ReplayDivergence {
            sequence: 0,
            reason: "genesis state hash differs".into(),
        });
    }

    for recorded in journal.entries() {
        let diverged = |reason: String| GenbitError::ReplayDivergence {
            sequence: recorded.sequence,
            reason,
        };
        let result = exchange.submit(recorded.call.caller, recorded.call.command.clone());
        let status = EntryStatus::from_result(&result);
        if let Err(GenbitError::SupplyInvariantViolation { reason }) = result {
            return Err(diverged(format!("invariant violated on replay: {reason}")));
        }
        let Some(replayed) = exchange.journal().entries().last() else {
            return Err(diverged("nothing journaled on replay".into()));
        };
        if status != recorded.status {
            return Err(diverged(format!("status {:?} != recorded {:?}", status, recorded.status)));
        }
        if replayed.events != recorded.events {
            return Err(diverged("events differ".into()));
        }
        if replayed.state_hash != recorded.state_hash {
            return Err(diverged(format!(
                "state_hash {} != recorded {}",
                replayed.state_hash, recorded.state_hash
            )));
        }
        if replayed.entry_hash != recorded.entry_hash {
            return Err(diverged("entry_hash differs".into()));
        }
    }

    tracing::info!(entries = journal.len(), "Journal replayed");
    Ok(exchange)
}
