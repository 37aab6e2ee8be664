//! Background scan scheduling.
//!
//! [`Scheduler::start`] spawns one thread that sleeps until the next
//! firing time and runs the job. The returned [`SchedulerHandle`] owns the
//! thread; [`SchedulerHandle::stop`] wakes it and joins it.

pub mod cron;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Local;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

pub use cron::{CronField, Schedule};

/// Upper bound on a single wait, so clock changes are picked up.
const MAX_WAIT: Duration = Duration::from_secs(3600);

pub struct Scheduler;

impl Scheduler {
    /// Start running `job` on `schedule` in a background thread.
    pub fn start<F>(schedule: Schedule, job: F) -> std::io::Result<SchedulerHandle>
    where
        F: Fn() + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let runs = Arc::new(AtomicUsize::new(0));
        let thread_runs = Arc::clone(&runs);
        let thread_schedule = schedule.clone();

        let handle = thread::Builder::new()
            .name("gogshelf-scheduler".to_string())
            .spawn(move || loop {
                let now = Local::now();
                let Some(next) = thread_schedule.next_after(&now) else {
                    warn!(schedule = %thread_schedule, "schedule never fires again; scheduler exiting");
                    return;
                };
                let until_next = (next - now).to_std().unwrap_or(Duration::ZERO);
                let wait = until_next.min(MAX_WAIT);
                debug!(next = %next, "next scheduled scan");

                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) if wait < until_next => continue,
                    Err(RecvTimeoutError::Timeout) => {
                        info!(schedule = %thread_schedule, "scheduled scan starting");
                        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(&job));
                        if result.is_err() {
                            warn!("scheduled scan panicked");
                        }
                        thread_runs.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
            })?;

        info!(schedule = %schedule, "scan scheduler started");
        Ok(SchedulerHandle {
            schedule,
            stop_tx,
            runs,
            handle: Some(handle),
        })
    }
}

/// Owner of a running scheduler thread.
pub struct SchedulerHandle {
    schedule: Schedule,
    stop_tx: Sender<()>,
    runs: Arc<AtomicUsize>,
    handle: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Completed job runs so far.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Block the calling thread until the scheduler thread exits.
    pub fn wait(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("scheduler thread panicked");
            }
        }
    }

    /// Stop the scheduler. A scan already in progress finishes first.
    pub fn stop(mut self) {
        self.shutdown();
        info!("scan scheduler stopped");
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("scheduler thread panicked");
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
