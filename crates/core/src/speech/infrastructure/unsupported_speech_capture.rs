use crate::speech::domain::speech_capture::{SpeechCapture, SpeechError};

/// Stand-in when no recognizer is available; every capture reports
/// [`SpeechError::Unsupported`].
pub struct UnsupportedSpeechCapture {
    reason: String,
}

impl UnsupportedSpeechCapture {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SpeechCapture for UnsupportedSpeechCapture {
    fn capture(&self) -> Result<String, SpeechError> {
        Err(SpeechError::Unsupported(self.reason.clone()))
    }
}
