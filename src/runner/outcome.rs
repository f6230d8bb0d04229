//! Per-action outcome record handed back to the orchestrator.

use chrono::Utc;

/// Everything the orchestrator needs to aggregate one executed action:
/// bytes in/out, success flag, response code, body text and timing markers.
/// On failure the body is replaced by a human-readable message; callers
/// must never assume it is valid domain JSON.
#[derive(Debug, Clone)]
pub struct SampleOutcome {
    /// `[target]:[kind]`, optionally suffixed by the dispatcher.
    pub label: String,
    /// Diagnostic header block (action type, URL template, corpus index).
    pub request_headers: String,
    /// The content that was (or would have been) sent.
    pub sampler_data: String,
    /// Bytes of `sampler_data`; recorded on every exit path.
    pub sent_bytes: u64,
    pub response_data: String,
    pub received_bytes: u64,
    pub content_type: String,
    pub response_message: String,
    /// "200" on success, "500-<cause code>" on failure.
    pub response_code: String,
    pub success: bool,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl SampleOutcome {
    pub fn new(label: String) -> Self {
        Self {
            label,
            request_headers: String::new(),
            sampler_data: String::new(),
            sent_bytes: 0,
            response_data: String::new(),
            received_bytes: 0,
            content_type: "application/json".to_string(),
            response_message: String::new(),
            response_code: String::new(),
            success: false,
            start_ms: 0,
            end_ms: 0,
        }
    }

    /// Marks the start of the network call.
    pub fn sample_start(&mut self) {
        self.start_ms = Utc::now().timestamp_millis();
    }

    /// Marks the end of the network call (or of the failed attempt).
    pub fn sample_end(&mut self) {
        self.end_ms = Utc::now().timestamp_millis();
    }

    pub fn set_response(&mut self, body: String) {
        self.received_bytes = body.len() as u64;
        self.response_data = body;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_outcome_defaults() {
        let outcome = SampleOutcome::new("[http://x]:[transfer_prepare]".to_string());
        assert_eq!(outcome.content_type, "application/json");
        assert!(!outcome.success);
        assert_eq!(outcome.sent_bytes, 0);
        assert_eq!(outcome.start_ms, 0);
    }

    #[test]
    fn test_timing_markers_are_ordered() {
        let mut outcome = SampleOutcome::new("label".to_string());
        outcome.sample_start();
        outcome.sample_end();
        assert!(outcome.start_ms > 0);
        assert!(outcome.end_ms >= outcome.start_ms);
    }

    #[test]
    fn test_set_response_tracks_received_bytes() {
        let mut outcome = SampleOutcome::new("label".to_string());
        outcome.set_response(r#"{"ok":true}"#.to_string());
        assert_eq!(outcome.received_bytes, 11);
    }
}
