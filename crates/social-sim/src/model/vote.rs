//! Vote toggling and the karma deltas it produces.
//!
//! A target keeps at most one vote per voter. Voting again with the same
//! polarity withdraws the vote; voting with the other polarity flips it. Each
//! transition yields the exact change in the target's net score, which is
//! what gets pushed to the author's karma.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Voter id to polarity (`true` = upvote).
pub type Votes = HashMap<String, bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChange {
    Cast,
    Withdrawn,
    Flipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub change: VoteChange,
    /// Change in net score (upvotes minus downvotes) caused by this vote.
    pub score_delta: i64,
}

fn weight(is_upvote: bool) -> i64 {
    if is_upvote {
        1
    } else {
        -1
    }
}

/// Applies one vote to `votes`.
pub fn toggle_vote(votes: &mut Votes, voter: &str, is_upvote: bool) -> VoteOutcome {
    match votes.get(voter).copied() {
        None => {
            votes.insert(voter.to_string(), is_upvote);
            VoteOutcome {
                change: VoteChange::Cast,
                score_delta: weight(is_upvote),
            }
        }
        Some(previous) if previous == is_upvote => {
            votes.remove(voter);
            VoteOutcome {
                change: VoteChange::Withdrawn,
                score_delta: -weight(previous),
            }
        }
        Some(previous) => {
            votes.insert(voter.to_string(), is_upvote);
            VoteOutcome {
                change: VoteChange::Flipped,
                score_delta: weight(is_upvote) - weight(previous),
            }
        }
    }
}

/// Upvotes minus downvotes.
pub fn net_score(votes: &Votes) -> i64 {
    votes.values().map(|&up| weight(up)).sum()
}

/// Which pool family a vote is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Post => write!(f, "post"),
            TargetKind::Comment => write!(f, "comment"),
        }
    }
}

impl FromStr for TargetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(TargetKind::Post),
            "comment" => Ok(TargetKind::Comment),
            other => Err(DomainError::invalid(format!("Invalid vote type: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_down_up_nets_plus_one() {
        let mut votes = Votes::new();
        let mut karma = 0;

        for (is_upvote, expected_change) in [
            (true, VoteChange::Cast),
            (false, VoteChange::Flipped),
            (true, VoteChange::Flipped),
        ] {
            let outcome = toggle_vote(&mut votes, "bob", is_upvote);
            assert_eq!(outcome.change, expected_change);
            karma += outcome.score_delta;
            assert_eq!(karma, net_score(&votes));
        }

        assert_eq!(net_score(&votes), 1);
        assert_eq!(votes.len(), 1);
    }

    #[test]
    fn test_same_polarity_twice_withdraws() {
        let mut votes = Votes::new();
        toggle_vote(&mut votes, "alice", false);
        let outcome = toggle_vote(&mut votes, "alice", false);

        assert_eq!(outcome.change, VoteChange::Withdrawn);
        assert_eq!(outcome.score_delta, 1);
        assert!(votes.is_empty());
        assert_eq!(net_score(&votes), 0);
    }

    #[test]
    fn test_deltas_track_net_score_across_voters() {
        let mut votes = Votes::new();
        let mut running = 0;
        let script = [
            ("a", true),
            ("b", true),
            ("c", false),
            ("a", false),
            ("b", true),
            ("c", false),
            ("c", true),
        ];
        for (voter, up) in script {
            running += toggle_vote(&mut votes, voter, up).score_delta;
            assert_eq!(running, net_score(&votes));
        }
    }

    #[test]
    fn test_target_kind_parses_discriminator() {
        assert_eq!("post".parse::<TargetKind>(), Ok(TargetKind::Post));
        assert_eq!("comment".parse::<TargetKind>(), Ok(TargetKind::Comment));
        assert!("user".parse::<TargetKind>().is_err());
    }
}
