use thiserror::Error;

use super::nlp_analysis::NlpAnalysis;

#[derive(Error, Debug)]
pub enum NlpError {
    #[error("backend request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("backend response from {url} could not be decoded: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Submits text to the external NLP service.
pub trait NlpClient: Send + Sync {
    fn analyze(&self, text: &str) -> Result<NlpAnalysis, NlpError>;
}
