use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;

use crossbeam_channel::Receiver;

use crate::backend::domain::nlp_analysis::NlpAnalysis;
use crate::backend::domain::nlp_client::NlpClient;

/// Fire-and-forget submission of text to the NLP backend.
///
/// The request runs on its own thread. Failures are logged and never
/// surface to the caller.
#[derive(Clone)]
pub struct BackgroundForwarder {
    client: Arc<dyn NlpClient>,
}

impl BackgroundForwarder {
    pub fn new(client: Arc<dyn NlpClient>) -> Self {
        Self { client }
    }

    pub fn forward(&self, text: &str) -> ForwardHandle {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let discarded = Arc::new(AtomicBool::new(false));
        let discarded_clone = discarded.clone();
        let client = self.client.clone();
        let text = text.to_string();

        thread::spawn(move || {
            let result = client.analyze(&text);
            if discarded_clone.load(Ordering::Relaxed) {
                log::debug!("Discarding backend response for a superseded submission");
                return;
            }
            match result {
                Ok(analysis) => {
                    log::info!(
                        "Backend processed text: {}",
                        analysis.message.as_deref().unwrap_or("no message")
                    );
                    let _ = tx.send(analysis);
                }
                Err(e) => log::warn!("Backend request failed: {e}"),
            }
        });

        ForwardHandle {
            rx,
            received: OnceLock::new(),
            discarded,
        }
    }
}

/// An in-flight backend submission.
///
/// Dropping or cancelling the handle discards the response. Once arrived,
/// the analysis stays readable for the life of the handle.
pub struct ForwardHandle {
    rx: Receiver<NlpAnalysis>,
    received: OnceLock<NlpAnalysis>,
    discarded: Arc<AtomicBool>,
}

impl ForwardHandle {
    pub fn cancel(&self) {
        self.discarded.store(true, Ordering::Relaxed);
    }

    /// The backend's analysis, once it has arrived.
    pub fn try_result(&self) -> Option<&NlpAnalysis> {
        if self.discarded.load(Ordering::Relaxed) {
            return None;
        }
        if let Some(analysis) = self.received.get() {
            return Some(analysis);
        }
        let analysis = self.rx.try_recv().ok()?;
        Some(self.received.get_or_init(|| analysis))
    }
}

impl Drop for ForwardHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::nlp_client::NlpError;
    use std::sync::Mutex;
    use std::time::Duration;

    struct StubClient {
        delay: Duration,
        fail: bool,
        seen: Mutex<Vec<String>>,
    }

    impl StubClient {
        fn new(delay: Duration, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                delay,
                fail,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl NlpClient for StubClient {
        fn analyze(&self, text: &str) -> Result<NlpAnalysis, NlpError> {
            thread::sleep(self.delay);
            self.seen.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(NlpError::Status(503));
            }
            Ok(NlpAnalysis {
                input_text: Some(text.to_string()),
                ..Default::default()
            })
        }
    }

    /// Poll until the analysis arrives or a second passes.
    fn poll(handle: &ForwardHandle) -> Option<&NlpAnalysis> {
        for _ in 0..100 {
            if handle.try_result().is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        handle.try_result()
    }

    #[test]
    fn test_forward_delivers_analysis() {
        let client = StubClient::new(Duration::ZERO, false);
        let forwarder = BackgroundForwarder::new(client.clone());

        let handle = forwarder.forward("good morning");
        let analysis = poll(&handle).unwrap();
        assert_eq!(analysis.input_text.as_deref(), Some("good morning"));
        assert_eq!(*client.seen.lock().unwrap(), vec!["good morning".to_string()]);
    }

    #[test]
    fn test_result_stays_readable_after_arrival() {
        let forwarder = BackgroundForwarder::new(StubClient::new(Duration::ZERO, false));
        let handle = forwarder.forward("good morning");

        let first = poll(&handle).cloned().unwrap();
        assert_eq!(first.input_text.as_deref(), Some("good morning"));

        assert_eq!(handle.try_result(), Some(&first));
        assert_eq!(handle.try_result(), Some(&first));
    }

    #[test]
    fn test_failure_yields_nothing() {
        let client = StubClient::new(Duration::ZERO, true);
        let forwarder = BackgroundForwarder::new(client.clone());
        let handle = forwarder.forward("hello");

        assert!(poll(&handle).is_none());
        assert_eq!(client.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_cancelled_forward_discards_result() {
        let forwarder = BackgroundForwarder::new(StubClient::new(Duration::from_millis(50), false));
        let handle = forwarder.forward("hello");
        handle.cancel();

        thread::sleep(Duration::from_millis(150));
        assert!(handle.try_result().is_none());
    }

    #[test]
    fn test_dropped_handle_still_lets_request_finish() {
        let client = StubClient::new(Duration::from_millis(20), false);
        let forwarder = BackgroundForwarder::new(client.clone());
        drop(forwarder.forward("hello"));

        thread::sleep(Duration::from_millis(200));
        assert_eq!(client.seen.lock().unwrap().len(), 1);
    }
}
