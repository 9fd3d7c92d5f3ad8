pub mod nlp_analysis;
pub mod nlp_client;
