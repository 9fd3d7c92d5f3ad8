use std::sync::Arc;

use serde::Serialize;

use crate::backend::domain::nlp_client::NlpError;
use crate::backend::infrastructure::background_forwarder::BackgroundForwarder;
use crate::backend::infrastructure::http_nlp_client::HttpNlpClient;
use crate::dictionary::domain::dictionary::Dictionary;
use crate::media::domain::media_resolver::MediaResolver;
use crate::playback::domain::playlist::{build_playlist, PlaylistEntry};
use crate::segmentation::domain::phrase_segmenter::PhraseSegmenter;
use crate::segmentation::domain::segment::{Segment, UnmatchedPolicy};

/// How text becomes a playlist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranslatorConfig {
    /// Prefix for every media URL; empty yields `/{media_path}`.
    pub base_path: String,
    pub policy: UnmatchedPolicy,
    /// NLP backend endpoint. `None` disables forwarding.
    pub backend_url: Option<String>,
}

impl TranslatorConfig {
    /// Forwarder for the configured backend, if any.
    pub fn forwarder(&self) -> Result<Option<BackgroundForwarder>, NlpError> {
        match self.backend_url.as_deref() {
            Some(url) => {
                let client = HttpNlpClient::new(url)?;
                Ok(Some(BackgroundForwarder::new(Arc::new(client))))
            }
            None => Ok(None),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Translation {
    pub text: String,
    pub segments: Vec<Segment>,
    pub playlist: Vec<PlaylistEntry>,
}

/// Segment text against the dictionary and resolve a playlist from it.
pub struct TranslateTextUseCase {
    segmenter: PhraseSegmenter,
    resolver: MediaResolver,
    policy: UnmatchedPolicy,
}

impl TranslateTextUseCase {
    pub fn new(dictionary: Arc<Dictionary>, config: &TranslatorConfig) -> Self {
        Self {
            segmenter: PhraseSegmenter::new(dictionary),
            resolver: MediaResolver::new(&config.base_path),
            policy: config.policy,
        }
    }

    pub fn resolver(&self) -> &MediaResolver {
        &self.resolver
    }

    pub fn execute(&self, text: &str) -> Translation {
        let segments = self.segmenter.segment_with(text, self.policy);
        let playlist = build_playlist(&segments, &self.resolver);
        log::debug!(
            "Translated {} words into {} playlist entries",
            text.split_whitespace().count(),
            playlist.len()
        );
        Translation {
            text: text.to_string(),
            segments,
            playlist,
        }
    }
}
