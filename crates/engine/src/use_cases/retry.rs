//! Per-call retry for side effects that run after a state change was saved.

use std::fmt::Display;
use std::future::Future;

use duelbot_domain::ParticipantId;

/// Run `call` up to `max_attempts` times, stopping at the first success.
///
/// Each call stands alone, so a retry never repeats an earlier call that
/// already succeeded. Returns the last error once attempts run out.
pub(crate) async fn with_retries<F, Fut, E>(
    max_attempts: u32,
    operation: &'static str,
    participant: ParticipantId,
    mut call: F,
) -> Result<(), E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::warn!(
                    participant = %participant,
                    operation,
                    attempt,
                    error = %e,
                    "Call failed"
                );
                if attempt >= max_attempts {
                    return Err(e);
                }
                attempt += 1;
            }
        }
    }
}
