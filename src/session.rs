//! Debounced asynchronous regeneration.
//!
//! A [`StickerSession`] owns one cutout and a worker thread. Every settings
//! change submitted to the session becomes an explicit generation request
//! carrying a monotonically increasing sequence number. Requests arriving
//! within the debounce window coalesce; only the newest one runs. A
//! generation in flight checks its [`GenerationToken`] at defined yield
//! points and stops silently once a newer request exists, dropping its
//! buffers instead of publishing them.
//!
//! At most one output is live at a time: publishing a new result swaps it
//! into an [`ArcSwapOption`], which releases the previous output's backing
//! memory as soon as no reader holds it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::StickerError;
use crate::generator::{self, Outcome};
use crate::settings::StickerSettings;

/// Debounce window: a request younger than this keeps the worker waiting
/// for the settings to settle before generating.
pub const DEBOUNCE_MS: u64 = 100;

// ============================================================================
// Generation Token
// ============================================================================

/// Cooperative cancellation token for one generation request.
///
/// A token is superseded once the session has minted a newer sequence
/// number. The pipeline checks the token at its yield points (start, after
/// dilation, before encode) and stops silently when superseded.
#[derive(Debug, Clone)]
pub struct GenerationToken {
    seq: u64,
    latest: Arc<AtomicU64>,
}

impl GenerationToken {
    pub(crate) fn new(seq: u64, latest: Arc<AtomicU64>) -> Self {
        Self { seq, latest }
    }

    /// A token that can never be superseded, for standalone synchronous
    /// generation.
    pub(crate) fn detached() -> Self {
        Self {
            seq: 0,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The sequence number of the request this token belongs to.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// True once a newer request exists and this generation's result would
    /// be discarded.
    pub fn is_superseded(&self) -> bool {
        self.latest.load(Ordering::Acquire) != self.seq
    }
}

// ============================================================================
// Sticker Output
// ============================================================================

/// One published generation result.
#[derive(Debug)]
pub struct StickerOutput {
    /// Sequence number of the request that produced this output.
    pub seq: u64,
    /// The settings the output reflects.
    pub settings: StickerSettings,
    /// The flattened composite.
    pub image: RgbaImage,
    /// PNG encoding of the composite, alpha preserved.
    pub png: Vec<u8>,
}

// ============================================================================
// Session
// ============================================================================

enum SessionMsg {
    Generate { seq: u64, settings: StickerSettings },
    Shutdown,
}

/// Debounced regeneration session for one cutout.
///
/// # Example
///
/// ```no_run
/// use image::RgbaImage;
/// use sticker_renderer::{StickerSession, StickerSettings};
///
/// let cutout = RgbaImage::new(64, 64);
/// let session = StickerSession::new(cutout);
///
/// let seq = session.submit(StickerSettings::default());
/// if let Some(output) = session.wait_for(seq, std::time::Duration::from_secs(5)) {
///     assert_eq!(output.seq, seq);
/// }
/// ```
pub struct StickerSession {
    tx: mpsc::Sender<SessionMsg>,
    latest: Arc<AtomicU64>,
    live: Arc<ArcSwapOption<StickerOutput>>,
    last_error: Arc<ArcSwapOption<StickerError>>,
    worker: Option<JoinHandle<()>>,
}

impl StickerSession {
    /// Starts a session for the given cutout. The cutout lives until the
    /// session is dropped or replaced.
    pub fn new(cutout: RgbaImage) -> Self {
        let (tx, rx) = mpsc::channel();
        let latest = Arc::new(AtomicU64::new(0));
        let live = Arc::new(ArcSwapOption::<StickerOutput>::empty());
        let last_error = Arc::new(ArcSwapOption::<StickerError>::empty());

        let worker = {
            let latest = Arc::clone(&latest);
            let live = Arc::clone(&live);
            let last_error = Arc::clone(&last_error);
            thread::spawn(move || worker_loop(cutout, rx, latest, live, last_error))
        };

        Self {
            tx,
            latest,
            live,
            last_error,
            worker: Some(worker),
        }
    }

    /// Submits a settings change, superseding any pending or in-flight
    /// generation. Returns the request's sequence number.
    pub fn submit(&self, settings: StickerSettings) -> u64 {
        let seq = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(seq, "sticker generation requested");
        let _ = self.tx.send(SessionMsg::Generate { seq, settings });
        seq
    }

    /// The sequence number of the newest submitted request.
    pub fn latest_seq(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// The currently live output, if any generation has completed.
    pub fn output(&self) -> Option<Arc<StickerOutput>> {
        self.live.load_full()
    }

    /// The most recent generation error, if any.
    pub fn last_error(&self) -> Option<Arc<StickerError>> {
        self.last_error.load_full()
    }

    /// Polls until an output with `seq` or newer is live, an error is
    /// recorded, or the timeout elapses.
    pub fn wait_for(&self, seq: u64, timeout: Duration) -> Option<Arc<StickerOutput>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(output) = self.output() {
                if output.seq >= seq {
                    return Some(output);
                }
            }
            if self.last_error().is_some() || Instant::now() >= deadline {
                return None;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }
}

impl Drop for StickerSession {
    fn drop(&mut self) {
        let _ = self.tx.send(SessionMsg::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

// ============================================================================
// Worker
// ============================================================================

fn worker_loop(
    cutout: RgbaImage,
    rx: mpsc::Receiver<SessionMsg>,
    latest: Arc<AtomicU64>,
    live: Arc<ArcSwapOption<StickerOutput>>,
    last_error: Arc<ArcSwapOption<StickerError>>,
) {
    let debounce = Duration::from_millis(DEBOUNCE_MS);
    let mut pending: Option<(u64, StickerSettings, Instant)> = None;

    loop {
        let msg = match &pending {
            // Nothing pending: block until a request (or shutdown) arrives.
            None => match rx.recv() {
                Ok(msg) => Some(msg),
                Err(_) => return,
            },
            // A request is settling: wait out the remainder of its window.
            Some((_, _, since)) => {
                let remaining = debounce.saturating_sub(since.elapsed());
                match rx.recv_timeout(remaining) {
                    Ok(msg) => Some(msg),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
        };

        match msg {
            Some(SessionMsg::Generate { seq, settings }) => {
                // Newer request within the window: the older one is
                // cancelled before it ever started.
                if let Some((old_seq, _, _)) = pending.replace((seq, settings, Instant::now())) {
                    debug!(old_seq, seq, "pending generation superseded");
                }
            }
            Some(SessionMsg::Shutdown) => return,
            None => {
                // Window closed without newer input: run the request.
                if let Some((seq, settings, _)) = pending.take() {
                    run_generation(&cutout, seq, settings, &latest, &live, &last_error);
                }
            }
        }
    }
}

fn run_generation(
    cutout: &RgbaImage,
    seq: u64,
    settings: StickerSettings,
    latest: &Arc<AtomicU64>,
    live: &Arc<ArcSwapOption<StickerOutput>>,
    last_error: &Arc<ArcSwapOption<StickerError>>,
) {
    let token = GenerationToken::new(seq, Arc::clone(latest));
    if token.is_superseded() {
        debug!(seq, "generation superseded before start");
        return;
    }

    match generator::run(cutout, &settings, &token) {
        Ok(Outcome::Superseded) => {
            // Buffers drop here, immediately, instead of accumulating.
            debug!(seq, "generation discarded mid-flight");
        }
        Ok(Outcome::Done(image)) => {
            if token.is_superseded() {
                debug!(seq, "generation discarded before encode");
                return;
            }
            match generator::encode_png(&image) {
                Ok(png) => {
                    if token.is_superseded() {
                        debug!(seq, "generation discarded before publish");
                        return;
                    }
                    // Swapping in the new output releases the previous
                    // one once its last reader drops.
                    live.store(Some(Arc::new(StickerOutput {
                        seq,
                        settings,
                        image,
                        png,
                    })));
                    last_error.store(None);
                    debug!(seq, "sticker output published");
                }
                Err(e) => {
                    warn!(seq, error = %e, "sticker encode failed");
                    last_error.store(Some(Arc::new(e)));
                }
            }
        }
        Err(e) => {
            warn!(seq, error = %e, "sticker generation failed");
            last_error.store(Some(Arc::new(e)));
        }
    }
}
