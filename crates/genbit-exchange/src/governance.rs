//! Append-only governance ledger: one vote per address, ever.

use std::collections::BTreeSet;

use genbit_types::constants::MAX_PROPOSAL_LEN;
use genbit_types::{Address, Amount, GenbitError, GovernancePolicy, Result, Tally, Vote};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceLedger {
    policy: GovernancePolicy,
    /// Insertion order is the read order.
    votes: Vec<Vote>,
    voters: BTreeSet<Address>,
}

impl GovernanceLedger {
    #[must_use]
    pub fn new(policy: GovernancePolicy) -> Self {
        Self {
            policy,
            votes: Vec::new(),
            voters: BTreeSet::new(),
        }
    }

    /// `voteOnProposal(proposal, choice)`. `voter_balance` is the caller's
    /// total token balance at the time of the call.
    ///
    /// # Errors
    /// - `DuplicateVote` if `voter` has voted before, on anything
    /// - `InvalidParameter` for empty or over-long proposal text
    /// - `InsufficientBalance` below the configured minimum stake
    pub fn vote(&mut self, voter: Address, proposal: &str, choice: bool, voter_balance: Amount) -> Result<&Vote> {
        if self.voters.contains(&voter) {
            return Err(GenbitError::DuplicateVote(voter));
        }
        if proposal.trim().is_empty() {
            return Err(GenbitError::invalid("proposal text is empty"));
        }
        let len = proposal.chars().count();
        if len > MAX_PROPOSAL_LEN {
            return Err(GenbitError::invalid(format!(
                "proposal text is {len} characters, limit {MAX_PROPOSAL_LEN}"
            )));
        }
        if voter_balance < self.policy.min_voting_balance {
            return Err(GenbitError::InsufficientBalance {
                needed: self.policy.min_voting_balance,
                available: voter_balance,
            });
        }

        self.voters.insert(voter);
        self.votes.push(Vote {
            index: self.votes.len() as u64,
            voter,
            proposal: proposal.to_owned(),
            choice,
        });
        Ok(&self.votes[self.votes.len() - 1])
    }

    /// `getVote(index)`
    #[must_use]
    pub fn get_vote(&self, index: usize) -> Option<&Vote> {
        self.votes.get(index)
    }

    /// `getVotes()`
    #[must_use]
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    #[must_use]
    pub fn has_voted(&self, voter: Address) -> bool {
        self.voters.contains(&voter)
    }

    /// Yes/no counts over every vote cast on exactly this proposal text.
    #[must_use]
    pub fn tally(&self, proposal: &str) -> Tally {
        self.votes
            .iter()
            .filter(|v| v.proposal == proposal)
            .fold(Tally::default(), |mut t, v| {
                if v.choice {
                    t.yes += 1;
                } else {
                    t.no += 1;
                }
                t
            })
    }
}
