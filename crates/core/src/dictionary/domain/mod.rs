pub mod dictionary;
pub mod dictionary_source;
