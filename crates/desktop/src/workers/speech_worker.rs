use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use signreel_core::shared::model_resolver::FetchPolicy;
use signreel_core::speech::domain::speech_capture::SpeechError;
use signreel_core::speech::infrastructure::dictation::dictation_for_file;

pub enum SpeechMessage {
    DownloadProgress(u64, u64),
    Transcript(String),
    Unsupported(String),
    Failed(String),
}

pub struct SpeechParams {
    pub audio_path: PathBuf,
    pub allow_download: bool,
}

/// Transcribe one recorded utterance on a worker thread.
///
/// Setting the returned flag discards the transcript; whisper itself runs to
/// completion.
pub fn spawn(params: SpeechParams) -> (Receiver<SpeechMessage>, Arc<AtomicBool>) {
    let (tx, rx) = crossbeam_channel::unbounded::<SpeechMessage>();
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = cancelled.clone();

    thread::spawn(move || {
        let message = run_dictation(&tx, &params);
        if cancelled_clone.load(Ordering::Relaxed) {
            log::debug!("Dictation of {} discarded", params.audio_path.display());
            return;
        }
        let _ = tx.send(message);
    });

    (rx, cancelled)
}

fn run_dictation(tx: &Sender<SpeechMessage>, params: &SpeechParams) -> SpeechMessage {
    let policy = if params.allow_download {
        FetchPolicy::AllowDownload
    } else {
        FetchPolicy::CacheOnly
    };
    let progress_tx = tx.clone();
    let capture = dictation_for_file(
        &params.audio_path,
        None,
        policy,
        Some(Box::new(move |downloaded, total| {
            let _ = progress_tx.send(SpeechMessage::DownloadProgress(downloaded, total));
        })),
    );

    match capture.capture() {
        Ok(text) => {
            log::info!("Dictated {:?}", text);
            SpeechMessage::Transcript(text)
        }
        Err(SpeechError::Unsupported(reason)) => SpeechMessage::Unsupported(reason),
        Err(e @ SpeechError::Failed(_)) => SpeechMessage::Failed(e.to_string()),
    }
}
