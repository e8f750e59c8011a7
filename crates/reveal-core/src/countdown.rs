//! Countdown timer driving the reveal sequence.
//!
//! One tick task per controller. Every `start` hands back a fresh event
//! channel; stopping the controller aborts the tick task and drops the
//! channel's sender, so a superseded receiver simply runs dry without ever
//! seeing `Expired`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Seconds left after this tick (always > 0)
    Tick(u64),
    /// Fired exactly once per started countdown that runs to zero
    Expired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountdownPhase {
    #[default]
    Idle,
    Running { remaining: u64 },
    Stopped,
}

/// Snapshot of the countdown for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining_seconds: u64,
    pub running: bool,
}

impl From<CountdownPhase> for CountdownState {
    fn from(phase: CountdownPhase) -> Self {
        match phase {
            CountdownPhase::Running { remaining } => CountdownState {
                remaining_seconds: remaining,
                running: true,
            },
            CountdownPhase::Idle | CountdownPhase::Stopped => CountdownState::default(),
        }
    }
}

pub type CountdownEvents = mpsc::UnboundedReceiver<CountdownEvent>;

pub struct CountdownController {
    period: Duration,
    phase: Arc<watch::Sender<CountdownPhase>>,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
    timers_started: u64,
}

impl CountdownController {
    pub fn new(period: Duration) -> Self {
        let (phase, _) = watch::channel(CountdownPhase::Idle);
        Self {
            period: period.max(Duration::from_millis(1)),
            phase: Arc::new(phase),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
            timers_started: 0,
        }
    }

    /// Start counting down from `seconds`, stopping any running countdown first.
    ///
    /// `start(0)` delivers `Expired` before returning and never enters `Running`.
    pub fn start(&mut self, seconds: u64) -> CountdownEvents {
        self.stop();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = mpsc::unbounded_channel();

        if seconds == 0 {
            self.phase.send_replace(CountdownPhase::Stopped);
            let _ = tx.send(CountdownEvent::Expired);
            tracing::debug!("countdown expired immediately");
            return rx;
        }

        self.phase
            .send_replace(CountdownPhase::Running { remaining: seconds });
        self.timers_started += 1;
        tracing::debug!(seconds, "countdown started");

        let period = self.period;
        let phase = self.phase.clone();
        let current = self.generation.clone();
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut remaining = seconds;

            loop {
                ticker.tick().await;
                remaining -= 1;

                let next = if remaining > 0 {
                    CountdownPhase::Running { remaining }
                } else {
                    CountdownPhase::Stopped
                };
                let live = phase.send_if_modified(|p| {
                    if current.load(Ordering::SeqCst) != generation {
                        return false;
                    }
                    *p = next;
                    true
                });
                if !live {
                    break;
                }

                if remaining > 0 {
                    let _ = tx.send(CountdownEvent::Tick(remaining));
                } else {
                    tracing::debug!("countdown expired");
                    let _ = tx.send(CountdownEvent::Expired);
                    break;
                }
            }
        }));
        rx
    }

    /// Stop the running countdown without firing `Expired`.
    pub fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.phase.send_if_modified(|p| {
            if matches!(p, CountdownPhase::Running { .. }) {
                *p = CountdownPhase::Stopped;
                true
            } else {
                false
            }
        });
    }

    pub fn phase(&self) -> CountdownPhase {
        *self.phase.borrow()
    }

    pub fn state(&self) -> CountdownState {
        self.phase().into()
    }

    /// Number of tick timers this controller has created.
    pub fn timers_started(&self) -> u64 {
        self.timers_started
    }
}

impl Default for CountdownController {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Drop for CountdownController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// `"{m}m {s}s"` as shown next to the map.
pub fn format_countdown(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}
