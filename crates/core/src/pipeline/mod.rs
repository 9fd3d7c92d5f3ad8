pub mod playback_controller;
pub mod translate_text_use_case;
