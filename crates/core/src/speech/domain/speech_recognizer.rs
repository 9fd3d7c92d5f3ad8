use super::audio_segment::AudioSegment;
use super::transcript::TranscriptWord;

/// Speech-to-text over a decoded utterance.
pub trait SpeechRecognizer: Send {
    fn transcribe(
        &self,
        audio: &AudioSegment,
    ) -> Result<Vec<TranscriptWord>, Box<dyn std::error::Error>>;
}
