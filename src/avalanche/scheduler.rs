//! `Scheduler` (§6): a timer service that invokes a callback at a fixed
//! cadence until cancelled.
//!
//! Grounded on the donor crate's `shutdown.rs` `ShutdownManager`, which
//! guarantees a spawned task is cancelled via a `CancellationToken` owned by
//! the thing that spawned it — the same mechanism §5/§9 require for
//! "destruction of the processor cancels its scheduled callback
//! deterministically". `ShutdownManager` is one-shot; `TokioScheduler`
//! generalizes the pattern to a repeating tick.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Invoked by the scheduler on every tick. Must return promptly — it runs
/// `AvalancheProcessor::run_event_loop`, which must not block on I/O (§5).
pub type SchedulerCallback = Arc<dyn Fn() + Send + Sync>;

/// Opaque handle returned by `schedule_every`, passed back to `cancel`.
/// `token` is the cancellation identity shared with `TokioScheduler`;
/// `manual_id` is only meaningful to `ManualScheduler`'s test double.
pub struct SchedulerHandle {
    token: CancellationToken,
    manual_id: Option<u64>,
}

/// `schedule_every(interval, callback) -> handle`, `cancel(handle)`,
/// `stop(wait)` (§6).
pub trait Scheduler: Send + Sync {
    fn schedule_every(&self, interval: Duration, callback: SchedulerCallback) -> SchedulerHandle;
    fn cancel(&self, handle: &SchedulerHandle);
    fn stop(&self, wait: bool);
}

/// Production `Scheduler` built on a `tokio` interval task per handle,
/// cancelled via `CancellationToken` the way `shutdown.rs` cancels its
/// spawned tasks.
#[derive(Default)]
pub struct TokioScheduler {
    tasks: Mutex<Vec<(CancellationToken, JoinHandle<()>)>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_every(&self, interval: Duration, callback: SchedulerCallback) -> SchedulerHandle {
        let token = CancellationToken::new();
        let child = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => callback(),
                }
            }
        });
        self.tasks.lock().push((token.clone(), handle));
        SchedulerHandle { token, manual_id: None }
    }

    fn cancel(&self, handle: &SchedulerHandle) {
        handle.token.cancel();
        self.tasks.lock().retain(|(t, _)| !t.is_cancelled());
    }

    fn stop(&self, wait: bool) {
        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock();
            for (token, _) in tasks.iter() {
                token.cancel();
            }
            std::mem::take(&mut *tasks).into_iter().map(|(_, h)| h).collect()
        };
        if wait {
            for handle in handles {
                tokio::task::block_in_place(|| {
                    tokio::runtime::Handle::current().block_on(async {
                        let _ = handle.await;
                    });
                });
            }
        }
    }
}

/// A synchronous, deterministic `Scheduler` test double: `fire_all` drives
/// every registered callback inline instead of waiting on real time, which
/// is what makes `§8` scenarios S5/S6 reproducible without flaky sleeps.
#[derive(Default)]
pub struct ManualScheduler {
    callbacks: Mutex<Vec<(u64, SchedulerCallback)>>,
    next_id: std::sync::atomic::AtomicU64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks currently scheduled (§8 S6: "the scheduler
    /// reports exactly one queued task").
    pub fn active_count(&self) -> usize {
        self.callbacks.lock().len()
    }

    /// Synchronously invokes every registered callback once, in
    /// registration order.
    pub fn fire_all(&self) {
        let snapshot: Vec<SchedulerCallback> =
            self.callbacks.lock().iter().map(|(_, cb)| cb.clone()).collect();
        for cb in snapshot {
            cb();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_every(&self, _interval: Duration, callback: SchedulerCallback) -> SchedulerHandle {
        let id = self.next_id.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.callbacks.lock().push((id, callback));
        SchedulerHandle { token: CancellationToken::new(), manual_id: Some(id) }
    }

    fn cancel(&self, handle: &SchedulerHandle) {
        if let Some(id) = handle.manual_id {
            self.callbacks.lock().retain(|(cb_id, _)| *cb_id != id);
        }
        handle.token.cancel();
    }

    fn stop(&self, _wait: bool) {
        self.callbacks.lock().clear();
    }
}
