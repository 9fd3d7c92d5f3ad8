pub mod clip_player;
pub mod ffmpeg_audio_reader;
pub mod ffmpeg_clip_reader;
