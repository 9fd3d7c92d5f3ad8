pub mod backend;
pub mod dictionary;
pub mod media;
pub mod pipeline;
pub mod playback;
pub mod segmentation;
pub mod shared;
pub mod speech;
