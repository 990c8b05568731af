//! Error sanitization for participant-facing replies.
//!
//! Prevents leaking internal details (paths, DB errors, version numbers) to
//! participants.

/// Sanitize an unexpected error for a reply.
///
/// Logs the full error server-side, returns a generic message.
pub fn sanitize_error<E: std::fmt::Display>(error: &E, context: &str) -> String {
    tracing::error!(
        error = %error,
        context = context,
        "Internal error occurred"
    );

    format!("Something went wrong while {}. Please try again.", context)
}

/// Log an expected refusal at debug level and pass its reply through.
pub fn refusal<E: std::fmt::Display>(error: &E, reply: &str) -> String {
    tracing::debug!(error = %error, "Request refused");
    reply.to_string()
}

/// Common reply texts.
pub mod messages {
    pub const UNKNOWN_COMMAND: &str =
        "Unknown command. Try: pvp <id>, pvpbot, endbattle, or a battle_action token.";
    pub const MATCH_NOT_FOUND: &str = "Match not found.";
    pub const NOT_YOUR_TURN: &str = "Not your turn.";
    pub const NOT_A_PARTICIPANT: &str = "You are not part of this match.";
    pub const USER_DATA_MISSING: &str = "User data missing.";
    pub const NOT_REGISTERED: &str = "Please register first.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_reply_hides_the_error() {
        let reply = sanitize_error(&"disk I/O error at /var/lib/duelbot.db", "resolving the action");
        assert!(!reply.contains("/var/lib"));
        assert!(reply.contains("resolving the action"));
    }
}
