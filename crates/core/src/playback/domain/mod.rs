pub mod advance_timer;
pub mod playback_event;
pub mod playback_reducer;
pub mod playback_session;
pub mod playlist;
