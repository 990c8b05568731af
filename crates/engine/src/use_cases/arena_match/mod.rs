//! Match lifecycle use cases: creation and forfeit.

mod create;
mod error;
mod forfeit;

use std::sync::Arc;

pub use create::CreateMatch;
pub use error::MatchError;
pub use forfeit::ForfeitMatches;

/// Container for match lifecycle use cases.
pub struct MatchUseCases {
    pub create: Arc<CreateMatch>,
    pub forfeit: Arc<ForfeitMatches>,
}

impl MatchUseCases {
    pub fn new(create: Arc<CreateMatch>, forfeit: Arc<ForfeitMatches>) -> Self {
        Self { create, forfeit }
    }
}
