//! Common utilities for the Discord control panel
//!
//! Reply formatting and log-safe rendering of secrets.

// ============================================================================
// Platform Message Length Limits
// ============================================================================

/// Discord message character limit
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Maximum transcript characters placed inside the reply's code fence.
///
/// Leaves room under [`DISCORD_MESSAGE_LIMIT`] for the fence markers.
pub const TRANSCRIPT_REPLY_LIMIT: usize = 1990;

/// Heading line of every restart reply
pub const RESTART_REPLY_HEADING: &str = "RCON restart completed.";

/// Number of visible characters kept when masking a secret
const VISIBLE_SECRET_CHARS: usize = 4;

/// Return the first `max_chars` characters of `text`.
///
/// Counts `char`s, so multi-byte text is never split mid-character.
///
/// # Examples
/// ```
/// use rconbot_channels::util::truncate_chars;
///
/// assert_eq!(truncate_chars("abcdef", 3), "abc");
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("ok", 10), "ok");
/// ```
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Build the private reply delivered after a restart
///
/// # Examples
/// ```
/// use rconbot_channels::util::format_restart_reply;
///
/// assert_eq!(
///     format_restart_reply("Started.\n"),
///     "RCON restart completed.\n```Started.\n```"
/// );
/// ```
#[must_use]
pub fn format_restart_reply(transcript: &str) -> String {
    format!(
        "{}\n```{}```",
        RESTART_REPLY_HEADING,
        truncate_chars(transcript, TRANSCRIPT_REPLY_LIMIT)
    )
}

/// Mask a secret for display, keeping only its last few characters
///
/// # Examples
/// ```
/// use rconbot_channels::util::mask_secret;
///
/// assert_eq!(mask_secret("abcdefgh1234"), "********1234");
/// assert_eq!(mask_secret("abc"), "***");
/// ```
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let total = secret.chars().count();
    if total <= VISIBLE_SECRET_CHARS {
        return "*".repeat(total);
    }
    let visible: String = secret.chars().skip(total - VISIBLE_SECRET_CHARS).collect();
    format!("{}{}", "*".repeat(total - VISIBLE_SECRET_CHARS), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fenced_body(reply: &str) -> &str {
        let start = reply.find("```").unwrap() + 3;
        let end = reply.rfind("```").unwrap();
        &reply[start..end]
    }

    #[test]
    fn test_long_transcript_truncated_to_limit() {
        let transcript: String = (0..3000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let reply = format_restart_reply(&transcript);

        assert_eq!(fenced_body(&reply), &transcript[..TRANSCRIPT_REPLY_LIMIT]);
        assert!(reply.starts_with("RCON restart completed.\n```"));
        assert!(reply.chars().count() <= DISCORD_MESSAGE_LIMIT + RESTART_REPLY_HEADING.len());
    }

    #[test]
    fn test_short_transcript_kept_whole() {
        let transcript = "Stopping containers...\nStopped.\n\nStarting containers...\nStarted.\n";
        let reply = format_restart_reply(transcript);
        assert_eq!(fenced_body(&reply), transcript);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let transcript = "é".repeat(2500);
        let body = truncate_chars(&transcript, TRANSCRIPT_REPLY_LIMIT);
        assert_eq!(body.chars().count(), TRANSCRIPT_REPLY_LIMIT);
    }

    #[test]
    fn test_mask_secret_hides_prefix() {
        let masked = mask_secret("MTIzNDU2Nzg5.token.value");
        assert!(masked.ends_with("alue"));
        assert!(!masked.contains("MTIz"));
        assert_eq!(mask_secret(""), "");
    }
}
