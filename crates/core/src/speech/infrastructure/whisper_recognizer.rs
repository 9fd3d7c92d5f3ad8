use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::speech::domain::audio_segment::AudioSegment;
use crate::speech::domain::speech_recognizer::SpeechRecognizer;
use crate::speech::domain::transcript::{merge_tokens, RecognizedToken, TranscriptWord};

/// Dictation through whisper.cpp (whisper-rs) with the tiny.en model.
///
/// The model is loaded per utterance.
#[derive(Debug)]
pub struct WhisperRecognizer {
    model_path: PathBuf,
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found at: {}", model_path.display()).into());
        }
        Ok(Self {
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(
        &self,
        audio: &AudioSegment,
    ) -> Result<Vec<TranscriptWord>, Box<dyn std::error::Error>> {
        let ctx = WhisperContext::new_with_params(
            self.model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        let mut state = ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("en"));
        params.set_translate(false);
        params.set_no_context(true);
        params.set_token_timestamps(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(worker_threads());

        state
            .full(params, audio.samples())
            .map_err(|e| format!("Whisper inference failed: {e}"))?;

        let mut tokens = Vec::new();
        for seg_idx in 0..state.full_n_segments() {
            let Some(segment) = state.get_segment(seg_idx) else {
                continue;
            };
            for tok_idx in 0..segment.n_tokens() {
                let Some(token) = segment.get_token(tok_idx) else {
                    continue;
                };
                let Ok(text) = token.to_str() else {
                    continue;
                };
                let data = token.token_data();
                // t0/t1 are in centiseconds
                tokens.push(RecognizedToken {
                    text: text.to_string(),
                    start_time: data.t0 as f64 / 100.0,
                    end_time: data.t1 as f64 / 100.0,
                    confidence: token.token_probability(),
                });
            }
        }

        let words = merge_tokens(&tokens);
        log::debug!(
            "Whisper produced {} tokens, {} words from {:.1}s of audio",
            tokens.len(),
            words.len(),
            audio.duration()
        );
        Ok(words)
    }
}

fn worker_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(4) as i32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{WHISPER_MODEL_NAME, WHISPER_MODEL_URL, WHISPER_SAMPLE_RATE};
    use crate::shared::model_resolver::{self, FetchPolicy};

    #[test]
    fn test_new_nonexistent_path_returns_error() {
        let err = WhisperRecognizer::new(Path::new("/nonexistent/ggml-tiny.en.bin")).unwrap_err();
        assert!(err.to_string().contains("not found"), "got: {err}");
    }

    #[test]
    #[ignore] // Requires whisper model download
    fn test_transcribe_silence_yields_few_words() {
        let model_path = model_resolver::resolve(
            WHISPER_MODEL_NAME,
            WHISPER_MODEL_URL,
            None,
            FetchPolicy::AllowDownload,
            None,
        )
        .expect("Failed to resolve whisper model");
        let recognizer = WhisperRecognizer::new(&model_path).unwrap();

        let audio = AudioSegment::new(vec![0.0; 2 * WHISPER_SAMPLE_RATE as usize], WHISPER_SAMPLE_RATE, 1);
        let words = recognizer.transcribe(&audio).unwrap();
        assert!(words.len() <= 3, "unexpected words: {words:?}");
    }
}
