//! Turn resolution for player-vs-player matches.

mod error;
mod resolve_action;

use std::sync::Arc;

pub use error::CombatError;
pub use resolve_action::{ActionReport, ResolveAction};

/// Container for combat use cases.
pub struct CombatUseCases {
    pub resolve: Arc<ResolveAction>,
}

impl CombatUseCases {
    pub fn new(resolve: Arc<ResolveAction>) -> Self {
        Self { resolve }
    }
}
