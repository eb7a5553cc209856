use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::SharedClock;
use crate::stats::{elapsed_fast_duration, FastDuration};

const TICK: Duration = Duration::from_secs(1);

/// Republishes the elapsed time of a running fast once per second.
///
/// The tick task belongs to this handle: it stops on [`FastingTicker::stop`]
/// or when the handle is dropped, so no timer outlives the view that started
/// it. Must be created inside a tokio runtime.
pub struct FastingTicker {
    rx: watch::Receiver<FastDuration>,
    handle: Option<JoinHandle<()>>,
}

impl FastingTicker {
    pub fn start(start_time: DateTime<Utc>, clock: SharedClock) -> Self {
        let (tx, rx) = watch::channel(elapsed_fast_duration(start_time, clock.now()));
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let elapsed = elapsed_fast_duration(start_time, clock.now());
                if tx.send(elapsed).is_err() {
                    break;
                }
            }
        });
        Self {
            rx,
            handle: Some(handle),
        }
    }

    /// A receiver that wakes on every tick.
    pub fn subscribe(&self) -> watch::Receiver<FastDuration> {
        self.rx.clone()
    }

    /// Most recently published elapsed time.
    pub fn latest(&self) -> FastDuration {
        *self.rx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancels the tick task and waits until it is gone.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for FastingTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
