use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    /// Speech input cannot work on this machine at all.
    #[error("speech recognition is not supported: {0}")]
    Unsupported(String),
    #[error("speech capture failed: {0}")]
    Failed(String),
}

/// One dictation: a single invocation yields exactly one final transcript.
pub trait SpeechCapture: Send {
    fn capture(&self) -> Result<String, SpeechError>;
}
