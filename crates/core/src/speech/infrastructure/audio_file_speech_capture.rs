use std::path::{Path, PathBuf};

use crate::media::domain::audio_reader::AudioReader;
use crate::shared::constants::WHISPER_SAMPLE_RATE;
use crate::speech::domain::speech_capture::{SpeechCapture, SpeechError};
use crate::speech::domain::speech_recognizer::SpeechRecognizer;
use crate::speech::domain::transcript::transcript_text;

/// Dictation from a recorded utterance: decode, transcribe, join.
pub struct AudioFileSpeechCapture {
    path: PathBuf,
    reader: Box<dyn AudioReader>,
    recognizer: Box<dyn SpeechRecognizer>,
}

impl AudioFileSpeechCapture {
    pub fn new(
        path: &Path,
        reader: Box<dyn AudioReader>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            reader,
            recognizer,
        }
    }
}

impl SpeechCapture for AudioFileSpeechCapture {
    fn capture(&self) -> Result<String, SpeechError> {
        let audio = self
            .reader
            .read_audio(&self.path, WHISPER_SAMPLE_RATE)
            .map_err(|e| SpeechError::Failed(format!("{}: {e}", self.path.display())))?
            .ok_or_else(|| {
                SpeechError::Failed(format!("{} has no audio track", self.path.display()))
            })?;
        if audio.is_empty() {
            return Err(SpeechError::Failed(format!(
                "{} contains no audio",
                self.path.display()
            )));
        }
        if audio.peak() <= f32::EPSILON {
            return Err(SpeechError::Failed(format!(
                "{} is silent",
                self.path.display()
            )));
        }

        let words = self
            .recognizer
            .transcribe(&audio)
            .map_err(|e| SpeechError::Failed(e.to_string()))?;
        let transcript = transcript_text(&words);
        if transcript.is_empty() {
            return Err(SpeechError::Failed("no speech recognized".to_string()));
        }

        log::info!("Dictated {:?}", transcript);
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::domain::audio_segment::AudioSegment;
    use crate::speech::domain::transcript::TranscriptWord;

    struct StubReader {
        audio: Option<AudioSegment>,
    }

    impl AudioReader for StubReader {
        fn read_audio(
            &self,
            _path: &Path,
            target_sample_rate: u32,
        ) -> Result<Option<AudioSegment>, Box<dyn std::error::Error>> {
            assert_eq!(target_sample_rate, WHISPER_SAMPLE_RATE);
            Ok(self.audio.clone())
        }
    }

    struct StubRecognizer {
        words: Vec<&'static str>,
    }

    impl SpeechRecognizer for StubRecognizer {
        fn transcribe(
            &self,
            _audio: &AudioSegment,
        ) -> Result<Vec<TranscriptWord>, Box<dyn std::error::Error>> {
            Ok(self
                .words
                .iter()
                .enumerate()
                .map(|(i, w)| TranscriptWord {
                    word: w.to_string(),
                    start_time: i as f64,
                    end_time: i as f64 + 0.5,
                    confidence: 0.9,
                })
                .collect())
        }
    }

    fn capture(audio: Option<AudioSegment>, words: Vec<&'static str>) -> AudioFileSpeechCapture {
        AudioFileSpeechCapture::new(
            Path::new("utterance.wav"),
            Box::new(StubReader { audio }),
            Box::new(StubRecognizer { words }),
        )
    }

    fn one_second() -> Option<AudioSegment> {
        Some(AudioSegment::new(vec![0.1; 16000], WHISPER_SAMPLE_RATE, 1))
    }

    #[test]
    fn test_capture_yields_single_transcript() {
        let text = capture(one_second(), vec!["Good", "morning."]).capture().unwrap();
        assert_eq!(text, "Good morning");
    }

    #[test]
    fn test_missing_audio_track_fails() {
        let err = capture(None, vec!["hello"]).capture().unwrap_err();
        assert!(matches!(err, SpeechError::Failed(_)));
        assert!(err.to_string().contains("no audio track"));
    }

    #[test]
    fn test_empty_audio_fails() {
        let audio = Some(AudioSegment::new(Vec::new(), WHISPER_SAMPLE_RATE, 1));
        assert!(capture(audio, vec!["hello"]).capture().is_err());
    }

    #[test]
    fn test_silent_audio_fails_before_transcribing() {
        let audio = Some(AudioSegment::new(vec![0.0; 16000], WHISPER_SAMPLE_RATE, 1));
        let err = capture(audio, vec!["hello"]).capture().unwrap_err();
        assert!(err.to_string().contains("is silent"));
    }

    #[test]
    fn test_no_words_fails() {
        let err = capture(one_second(), Vec::new()).capture().unwrap_err();
        assert!(err.to_string().contains("no speech recognized"));
    }
}
