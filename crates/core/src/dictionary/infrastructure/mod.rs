pub mod json_dictionary_source;
