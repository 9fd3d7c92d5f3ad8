pub mod phrase_segmenter;
pub mod segment;
