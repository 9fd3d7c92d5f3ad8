use std::time::Duration;

use serde::Serialize;

use crate::backend::domain::nlp_analysis::NlpAnalysis;
use crate::backend::domain::nlp_client::{NlpClient, NlpError};
use crate::shared::constants::BACKEND_TIMEOUT;

#[derive(Serialize)]
struct ProcessRequest<'a> {
    text: &'a str,
}

/// Posts `{ "text": ... }` as JSON to the backend's `/process` endpoint.
pub struct HttpNlpClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpNlpClient {
    pub fn new(url: &str) -> Result<Self, NlpError> {
        Self::with_timeout(url, BACKEND_TIMEOUT)
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, NlpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| NlpError::Request {
                url: url.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl NlpClient for HttpNlpClient {
    fn analyze(&self, text: &str) -> Result<NlpAnalysis, NlpError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ProcessRequest { text })
            .send()
            .map_err(|source| NlpError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NlpError::Status(status.as_u16()));
        }

        response
            .json::<NlpAnalysis>()
            .map_err(|source| NlpError::Decode {
                url: self.url.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on localhost and hand back the request body.
    fn serve_once(status_line: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/process", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            String::from_utf8(request_body).unwrap()
        });

        (url, handle)
    }

    #[test]
    fn test_analyze_posts_text_and_decodes_response() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"message": "Text successfully processed", "tokens": ["hello"]}"#,
        );

        let client = HttpNlpClient::new(&url).unwrap();
        let analysis = client.analyze("hello world").unwrap();

        assert_eq!(analysis.tokens, vec!["hello".to_string()]);
        let sent: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
        assert_eq!(sent, serde_json::json!({ "text": "hello world" }));
    }

    #[test]
    fn test_analyze_reports_http_status() {
        let (url, server) = serve_once("500 Internal Server Error", "{}");

        let err = HttpNlpClient::new(&url).unwrap().analyze("hello").unwrap_err();
        assert!(matches!(err, NlpError::Status(500)));
        server.join().unwrap();
    }

    #[test]
    fn test_analyze_reports_undecodable_body() {
        let (url, server) = serve_once("200 OK", "not json");

        let err = HttpNlpClient::new(&url).unwrap().analyze("hello").unwrap_err();
        assert!(matches!(err, NlpError::Decode { .. }));
        server.join().unwrap();
    }

    #[test]
    fn test_analyze_unreachable_backend_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/process", listener.local_addr().unwrap());
        drop(listener);

        let client = HttpNlpClient::with_timeout(&url, Duration::from_secs(2)).unwrap();
        let err = client.analyze("hello").unwrap_err();
        assert!(matches!(err, NlpError::Request { .. }));
        assert!(err.to_string().contains(&url));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<reqwest::Error>().is_some());
    }

    #[test]
    fn test_undecodable_body_keeps_reqwest_source() {
        let (url, server) = serve_once("200 OK", "not json");

        let err = HttpNlpClient::new(&url).unwrap().analyze("hello").unwrap_err();
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<reqwest::Error>().is_some());
        server.join().unwrap();
    }
}
