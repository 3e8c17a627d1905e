use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use thiserror::Error;

use crate::change::ObjectChange;
use crate::diff::diff_snapshots;
use crate::inspect::Inspect;
use crate::value::FieldValue;

/// Shared slot holding the value under observation. The sampler only ever
/// takes the read lock; callers mutate or wholesale-swap the value through
/// their own clone of the handle.
pub type WatchHandle<T> = Arc<RwLock<T>>;

#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Sampling period. Best effort, not a deadline.
    pub interval: Duration,
    /// When enabled, every detected change prints one
    /// `Change: <name> from <from> to <to>` line to stdout.
    pub trace_to_console: bool,
}

impl Default for RecorderConfig {
    fn default() -> RecorderConfig {
        RecorderConfig {
            interval: Duration::from_millis(20),
            trace_to_console: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("failed to join sampler thread: {0}")]
    Join(String),
}

#[derive(Debug)]
enum ThreadCommand {
    Stop,
}

struct Shared {
    changes: Mutex<Vec<ObjectChange>>,
    changed: AtomicBool,
    running: AtomicBool,
}

impl Shared {
    // A poisoned log mutex still holds a valid prefix of the change log, so
    // readers and the sampler recover the inner value instead of panicking.
    fn changes(&self) -> std::sync::MutexGuard<'_, Vec<ObjectChange>> {
        match self.changes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Periodically samples the named fields of a watched value on a background
/// thread and records every observed change.
///
/// Queries (`has_changed`, `last_change`, `all_changes`) are safe to call
/// from the owning thread while the sampler is appending.
pub struct ChangeRecorder<T> {
    handle: WatchHandle<T>,
    config: RecorderConfig,
    shared: Arc<Shared>,
    worker: Option<Worker>,
}

struct Worker {
    join_handle: thread::JoinHandle<()>,
    command_tx: mpsc::Sender<ThreadCommand>,
}

impl<T> ChangeRecorder<T> {
    /// Recorder with the default configuration (20 ms interval, no console
    /// trace).
    pub fn new(handle: WatchHandle<T>) -> ChangeRecorder<T> {
        ChangeRecorder::with_config(handle, RecorderConfig::default())
    }

    pub fn with_config(handle: WatchHandle<T>, config: RecorderConfig) -> ChangeRecorder<T> {
        ChangeRecorder {
            handle,
            config,
            shared: Arc::new(Shared {
                changes: Mutex::new(Vec::new()),
                changed: AtomicBool::new(false),
                running: AtomicBool::new(false),
            }),
            worker: None,
        }
    }

    /// Spawns the background sampler thread. Calling `start` while a sampler
    /// thread is active is caller error; release builds log and ignore it.
    pub fn start(&mut self)
    where
        T: Inspect + Send + Sync + 'static,
    {
        if self.worker.is_some() {
            debug_assert!(false, "start() called on an already started recorder");
            log::warn!("start() called while a sampler thread is active, ignoring");
            return;
        }

        let (command_tx, command_rx) = mpsc::channel();

        self.shared.running.store(true, Ordering::SeqCst);

        let handle = Arc::clone(&self.handle);
        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();

        let join_handle = thread::spawn(move || {
            let result = sampler_thread(handle, shared, config, command_rx);

            if let Err(err) = result {
                log::error!("sampler thread returned with error {:?}", err);
            }
        });

        self.worker = Some(Worker {
            join_handle,
            command_tx,
        });
    }

    /// Requests the sampler thread to exit and waits for it to terminate.
    /// A no-op when no sampler thread is active.
    pub fn stop(&mut self) -> Result<(), RecorderError> {
        let Some(worker) = self.worker.take() else {
            log::debug!("stop() called but no sampler thread is active");
            return Ok(());
        };

        self.shared.running.store(false, Ordering::SeqCst);

        if let Err(err) = worker.command_tx.send(ThreadCommand::Stop) {
            log::debug!(
                "asked to stop sampler but thread seems to already be dead (command send failed: {:?})",
                err
            );

            debug_assert!(worker.join_handle.is_finished());
        }

        worker
            .join_handle
            .join()
            .map_err(|payload| RecorderError::Join(panic_message(&payload)))
    }

    /// Returns whether any change has been recorded since the last call, and
    /// clears the flag in the same atomic step.
    ///
    /// The flag is a hint; the log is the source of truth.
    pub fn has_changed(&self) -> bool {
        self.shared.changed.swap(false, Ordering::SeqCst)
    }

    /// The most recently recorded change, if any.
    pub fn last_change(&self) -> Option<ObjectChange> {
        self.shared.changes().last().cloned()
    }

    /// Snapshot of the full change log, oldest first. Always a prefix of the
    /// eventual log.
    pub fn all_changes(&self) -> Vec<ObjectChange> {
        self.shared.changes().clone()
    }
}

impl<T> Drop for ChangeRecorder<T> {
    fn drop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        log::debug!("recorder dropped without stop(), joining sampler thread");

        self.shared.running.store(false, Ordering::SeqCst);

        // the send only fails when the thread is already gone
        let _ = worker.command_tx.send(ThreadCommand::Stop);

        if let Err(payload) = worker.join_handle.join() {
            log::warn!(
                "failed to join sampler thread on drop: {}",
                panic_message(&payload)
            );
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_owned()
    }
}

fn trace_line(change: &ObjectChange) -> String {
    format!(
        "Change: {} from {} to {}",
        change.name(),
        change.from(),
        change.to()
    )
}

fn read_fields<T: Inspect>(
    handle: &WatchHandle<T>,
) -> anyhow::Result<(Vec<String>, Vec<FieldValue>)> {
    let value = handle
        .read()
        .map_err(|_| anyhow::anyhow!("watched value lock is poisoned"))?;

    let fields = value.fields().context("field enumeration failed")?;

    Ok(fields.into_iter().unzip())
}

fn sampler_thread<T: Inspect>(
    handle: WatchHandle<T>,
    shared: Arc<Shared>,
    config: RecorderConfig,
    command_rx: mpsc::Receiver<ThreadCommand>,
) -> anyhow::Result<()> {
    // the first tick primes both snapshots from a single read, so the initial
    // state yields no records
    let (_, mut previous) = read_fields(&handle)?;

    log::debug!(
        "sampler thread started, {} fields, interval {:?}",
        previous.len(),
        config.interval
    );

    let mut next_tick_at = Instant::now() + config.interval;

    while shared.running.load(Ordering::SeqCst) {
        // 1. wait for the next tick; the command channel doubles as the
        //    interruptible sleep
        let now = Instant::now();
        let timeout = next_tick_at.saturating_duration_since(now);

        match command_rx.recv_timeout(timeout) {
            Ok(ThreadCommand::Stop) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        next_tick_at += config.interval;

        // 2. sample
        let (names, current) = read_fields(&handle)?;

        // 3. diff and publish
        for change in diff_snapshots(&previous, &current, &names) {
            log::trace!("{}", change);

            if config.trace_to_console {
                println!("{}", trace_line(&change));
            }

            shared.changes().push(change);
            shared.changed.store(true, Ordering::SeqCst);
        }

        // 4. current becomes the reference for the next tick
        previous = current;
    }

    log::debug!("sampler thread exiting");

    Ok(())
}
