pub mod audio_reader;
pub mod clip_reader;
pub mod media_resolver;
