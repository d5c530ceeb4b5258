//! User-facing console texts and the small helpers that build them.

pub const INITIALIZING: &str = "Initializing application...";

pub const STATUS_CHECKING: &str = "Checking API status...";
pub const STATUS_OK: &str = "API connection OK";
pub const STATUS_CONNECTED: &str = "Connected to the speech synthesis API";
pub const STATUS_API_ERROR: &str = "API connection error";
pub const STATUS_SERVER_ERROR: &str = "Server connection error";

pub const EMPTY_TEXT: &str = "No text entered";
pub const GENERATING: &str = "Generating speech...";
pub const GENERATED: &str = "Speech generated, starting playback";
pub const SYNTHESIS_FAILED: &str = "Speech generation failed";

pub const PLAYBACK_FINISHED: &str = "Playback finished";
pub const PLAYBACK_ERROR: &str = "Audio playback error";

pub const RATE_LIMITED: &str =
    "The API rate limit or quota may have been reached. Wait a while before trying again.";

const PREVIEW_CHARS: usize = 30;
const RATE_LIMIT_MARKERS: [&str; 3] = ["429", "quota", "rate limit"];

pub fn api_error(message: &str) -> String {
    format!("{}: {}", STATUS_API_ERROR, message)
}

pub fn server_error(detail: &str) -> String {
    format!("{}: {}", STATUS_SERVER_ERROR, detail)
}

pub fn synthesis_request(text: &str) -> String {
    format!("Speech generation request: \"{}\"", preview(text))
}

pub fn synthesis_error(message: &str) -> String {
    format!("Speech generation error: {}", message)
}

pub fn auto_checks_stopped(count: u32) -> String {
    format!(
        "Automatic status checks stopped after {} checks; check manually to refresh",
        count
    )
}

/// First 30 characters of `text`, with `...` when something was cut.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Whether a failure message looks like throttling by the upstream API.
pub fn mentions_rate_limit(message: &str) -> bool {
    let lowered = message.to_lowercase();
    RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
