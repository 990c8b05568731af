//! Challenge negotiation: issuing a challenge and answering it.

mod error;
mod issue;
mod respond;

use std::sync::Arc;

pub use error::ChallengeError;
pub use issue::{IssueChallenge, IssuedChallenge};
pub use respond::{ChallengeResponse, RespondToChallenge};

/// Container for challenge use cases.
pub struct ChallengeUseCases {
    pub issue: Arc<IssueChallenge>,
    pub respond: Arc<RespondToChallenge>,
}

impl ChallengeUseCases {
    pub fn new(issue: Arc<IssueChallenge>, respond: Arc<RespondToChallenge>) -> Self {
        Self { issue, respond }
    }
}
