//! Score and upvote-percentage derivation for a post's vote set.

use super::models::{Vote, VoteValue};

/// Derived metrics for a set of votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Signed sum of all vote values.
    pub score: i64,
    /// `0` when the score is zero, `100` when there are no downvotes,
    /// otherwise `round(upvotes / downvotes * 100)`.
    ///
    /// The ratio is upvotes over *downvotes*, not over the total, so it can
    /// exceed 100 (e.g. two up, one down gives 200).
    pub upvote_percentage: i64,
}

/// Compute score and upvote percentage from a vote set.
#[must_use]
pub fn tally(votes: &[Vote]) -> Tally {
    let mut upvotes: u64 = 0;
    let mut downvotes: u64 = 0;
    let mut score: i64 = 0;

    for vote in votes {
        match vote.value {
            VoteValue::Up => upvotes += 1,
            VoteValue::Down => downvotes += 1,
        }
        score += vote.value.as_i64();
    }

    let upvote_percentage = if score == 0 {
        0
    } else if downvotes != 0 {
        #[allow(clippy::cast_possible_truncation)]
        let ratio = (upvotes as f64 / downvotes as f64 * 100.0).round() as i64;
        ratio
    } else {
        100
    };

    Tally {
        score,
        upvote_percentage,
    }
}
