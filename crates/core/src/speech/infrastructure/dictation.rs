use std::path::Path;

use crate::media::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use crate::shared::constants::{WHISPER_MODEL_NAME, WHISPER_MODEL_URL};
use crate::shared::model_resolver::{self, FetchPolicy, ProgressFn};
use crate::speech::domain::speech_capture::SpeechCapture;

use super::audio_file_speech_capture::AudioFileSpeechCapture;
use super::unsupported_speech_capture::UnsupportedSpeechCapture;
use super::whisper_recognizer::WhisperRecognizer;

/// Build the speech capture for one recorded utterance.
///
/// Falls back to [`UnsupportedSpeechCapture`] when the whisper model cannot
/// be resolved or loaded, so callers always get something to call.
pub fn dictation_for_file(
    audio_path: &Path,
    model_dir: Option<&Path>,
    policy: FetchPolicy,
    progress: Option<ProgressFn>,
) -> Box<dyn SpeechCapture> {
    let model_path =
        match model_resolver::resolve(WHISPER_MODEL_NAME, WHISPER_MODEL_URL, model_dir, policy, progress) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Speech recognition unavailable: {e}");
                return Box::new(UnsupportedSpeechCapture::new(e.to_string()));
            }
        };

    match WhisperRecognizer::new(&model_path) {
        Ok(recognizer) => Box::new(AudioFileSpeechCapture::new(
            audio_path,
            Box::new(FfmpegAudioReader),
            Box::new(recognizer),
        )),
        Err(e) => {
            log::warn!("Speech recognition unavailable: {e}");
            Box::new(UnsupportedSpeechCapture::new(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::domain::speech_capture::SpeechError;

    #[test]
    fn test_capture_without_usable_model_or_audio_fails() {
        let dir = tempfile::tempdir().unwrap();
        let capture = dictation_for_file(
            Path::new("utterance.wav"),
            Some(dir.path()),
            FetchPolicy::CacheOnly,
            None,
        );
        let err = capture.capture().unwrap_err();
        assert!(matches!(
            err,
            SpeechError::Unsupported(_) | SpeechError::Failed(_)
        ));
    }
}
