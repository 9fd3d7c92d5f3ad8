pub mod playback_worker;
pub mod speech_worker;
