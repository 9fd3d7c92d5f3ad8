use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::Sender;

use crate::media::domain::clip_reader::ClipReader;
use crate::shared::clip_metadata::ClipMetadata;
use crate::shared::frame::Frame;

/// Lifecycle signals from a playing clip, tagged with the session generation
/// and playlist index they belong to.
#[derive(Debug, Clone)]
pub enum ClipSignal {
    Opened {
        generation: u64,
        index: usize,
        metadata: ClipMetadata,
    },
    Frame {
        generation: u64,
        index: usize,
        frame: Frame,
    },
    Ended {
        generation: u64,
        index: usize,
    },
    Failed {
        generation: u64,
        index: usize,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Hold each frame for `1 / fps`, like an on-screen player.
    Realtime,
    /// Decode as fast as possible (headless runs, tests).
    AsFastAsPossible,
}

#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub generation: u64,
    pub index: usize,
    pub path: PathBuf,
    pub pacing: Pacing,
    /// Forward decoded frames; headless callers only need open/end/fail.
    pub emit_frames: bool,
}

/// Handle to one clip playing on a worker thread.
///
/// Dropping the handle stops playback; a stopped clip sends no further signals.
pub struct ClipPlayback {
    cancelled: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ClipPlayback {
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Block until the worker thread exits.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ClipPlayback {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn a worker that opens and plays one clip, reporting through `tx`.
pub fn spawn(
    mut reader: Box<dyn ClipReader>,
    request: ClipRequest,
    tx: Sender<ClipSignal>,
) -> ClipPlayback {
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = cancelled.clone();

    let handle = thread::spawn(move || {
        let generation = request.generation;
        let index = request.index;
        let result = play(&mut *reader, &request, &tx, &cancelled_clone);
        reader.close();

        if cancelled_clone.load(Ordering::Relaxed) {
            log::debug!("Clip {index} (generation {generation}) stopped");
            return;
        }
        let signal = match result {
            Ok(()) => ClipSignal::Ended { generation, index },
            Err(e) => {
                log::warn!("Clip {} failed: {e}", request.path.display());
                ClipSignal::Failed {
                    generation,
                    index,
                    reason: e.to_string(),
                }
            }
        };
        let _ = tx.send(signal);
    });

    ClipPlayback {
        cancelled,
        handle: Some(handle),
    }
}

fn play(
    reader: &mut dyn ClipReader,
    request: &ClipRequest,
    tx: &Sender<ClipSignal>,
    cancelled: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = reader.open(&request.path)?;
    let interval = metadata.frame_interval();
    log::debug!(
        "Playing {} ({}x{} @ {:.2} fps)",
        request.path.display(),
        metadata.width,
        metadata.height,
        metadata.fps
    );
    let _ = tx.send(ClipSignal::Opened {
        generation: request.generation,
        index: request.index,
        metadata,
    });

    let started = Instant::now();
    let mut shown = 0u32;
    for frame in reader.frames() {
        if cancelled.load(Ordering::Relaxed) {
            return Ok(());
        }
        let frame = frame?;

        if request.pacing == Pacing::Realtime {
            let due = interval * shown;
            if let Some(wait) = due.checked_sub(started.elapsed()) {
                thread::sleep(wait);
            }
        }
        if request.emit_frames {
            let _ = tx.send(ClipSignal::Frame {
                generation: request.generation,
                index: request.index,
                frame,
            });
        }
        shown += 1;
    }

    if shown == 0 {
        return Err("clip contains no decodable frames".into());
    }
    Ok(())
}
