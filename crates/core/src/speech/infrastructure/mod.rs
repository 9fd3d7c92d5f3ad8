pub mod audio_file_speech_capture;
pub mod dictation;
pub mod unsupported_speech_capture;
pub mod whisper_recognizer;
