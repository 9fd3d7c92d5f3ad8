pub mod background_forwarder;
pub mod http_nlp_client;
