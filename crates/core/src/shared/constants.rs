use std::time::Duration;

/// Longest phrase window the segmenter tries, in words.
pub const MAX_PHRASE_WORDS: usize = 4;

/// Delay before a clip that failed to load is skipped.
pub const ERROR_SKIP_DELAY: Duration = Duration::from_millis(1000);

/// Wider clips are scaled down to this width while decoding.
pub const MAX_CLIP_WIDTH: u32 = 640;

pub const DEFAULT_DICTIONARY_FILE: &str = "isl_dictionary.json";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/process";

/// Upper bound on a single backend request.
pub const BACKEND_TIMEOUT: Duration = Duration::from_secs(10);

pub const WHISPER_MODEL_NAME: &str = "ggml-tiny.en.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.en.bin";
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg", "flac", "webm", "mp4"];
