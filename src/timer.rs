//! Deadline-advancing interval timer
//!
//! Fires an action once after a delay, or repeatedly at a fixed period,
//! with bounded drift: the next deadline is advanced from the previous
//! deadline rather than from "now", so slice overhead does not accumulate
//! across firings. Each firing runs the action on its own thread so a slow
//! action cannot delay the next scheduling decision.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::config;

/// Cancellation handle for a running timer.
///
/// Cloneable so a downstream component (the encode consumer) can halt
/// capture ticks when the session ends on its own.
#[derive(Clone)]
pub struct TimerHandle {
    running: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Request the timer to stop. The wait loop observes the flag at its
    /// next slice boundary and exits without firing again.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// A repeating (or one-shot) timer running on its own thread.
pub struct IntervalTimer {
    running: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl IntervalTimer {
    /// Start firing `action` every `period`, or exactly once after
    /// `period` when `run_once` is set. `period` is clamped to a minimum
    /// of 10ms.
    pub fn start<F>(period: Duration, run_once: bool, action: F) -> anyhow::Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let period = period.max(Duration::from_millis(config::timer::MIN_PERIOD_MS));
        let slice = if period < Duration::from_millis(config::timer::SHORT_PERIOD_THRESHOLD_MS) {
            period / config::timer::SHORT_PERIOD_SLICE_DIVISOR
        } else {
            Duration::from_millis(config::timer::LONG_PERIOD_SLICE_MS)
        };

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let action: Arc<F> = Arc::new(action);
        let worker = thread::Builder::new()
            .name("interval-timer".into())
            .spawn(move || run_loop(period, slice, run_once, flag, action))
            .context("failed to spawn timer thread")?;

        Ok(Self {
            running,
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> TimerHandle {
        TimerHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Stop the timer. In-flight action firings are not interrupted.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.stop();
        // The wait loop exits within one slice of the flag flipping.
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_loop<F>(
    period: Duration,
    slice: Duration,
    run_once: bool,
    running: Arc<AtomicBool>,
    action: Arc<F>,
) where
    F: Fn() + Send + Sync + 'static,
{
    let mut deadline = Instant::now() + period;

    if run_once {
        while Instant::now() < deadline {
            if !running.load(Ordering::SeqCst) {
                return;
            }
            thread::sleep(slice);
        }
        if running.load(Ordering::SeqCst) {
            fire(&action);
        }
        running.store(false, Ordering::SeqCst);
        return;
    }

    while running.load(Ordering::SeqCst) {
        while Instant::now() < deadline {
            if !running.load(Ordering::SeqCst) {
                return;
            }
            thread::sleep(slice);
        }

        // Advance from the previous deadline, not from now, so slice
        // overhead does not drift across firings.
        deadline += period;
        if running.load(Ordering::SeqCst) {
            fire(&action);
        }
    }
}

fn fire<F>(action: &Arc<F>)
where
    F: Fn() + Send + Sync + 'static,
{
    let action = Arc::clone(action);
    let spawned = thread::Builder::new()
        .name("timer-action".into())
        .spawn(move || action());
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "failed to spawn timer action thread");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::mpsc;

    fn counted_timer(period_ms: u64, run_once: bool) -> (IntervalTimer, Arc<AtomicU32>) {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        let timer = IntervalTimer::start(Duration::from_millis(period_ms), run_once, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        (timer, count)
    }

    #[test]
    fn repeated_firings_do_not_accumulate_slice_drift() {
        let (tx, rx) = mpsc::channel();
        let timer = IntervalTimer::start(Duration::from_millis(20), false, move || {
            let _ = tx.send(Instant::now());
        })
        .unwrap();

        let mut fires = Vec::new();
        for _ in 0..11 {
            fires.push(rx.recv_timeout(Duration::from_secs(2)).unwrap());
        }
        timer.stop();

        // Ten 20ms intervals. If each firing restarted from "now" the
        // per-slice overhead would add up to well over one period.
        let total = fires[10].duration_since(fires[0]);
        assert!(total >= Duration::from_millis(180), "ran fast: {:?}", total);
        assert!(total <= Duration::from_millis(245), "drifted: {:?}", total);
    }

    #[test]
    fn stop_halts_firing_within_a_slice() {
        let (timer, count) = counted_timer(20, false);
        thread::sleep(Duration::from_millis(130));
        timer.stop();
        thread::sleep(Duration::from_millis(60));

        let settled = count.load(Ordering::SeqCst);
        assert!(settled >= 3, "too few firings before stop: {}", settled);
        thread::sleep(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), settled);
    }

    #[test]
    fn run_once_fires_exactly_once() {
        let (timer, count) = counted_timer(20, true);
        thread::sleep(Duration::from_millis(120));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timer.handle().is_running());
    }

    #[test]
    fn run_once_can_be_cancelled_before_firing() {
        let (timer, count) = counted_timer(100, true);
        thread::sleep(Duration::from_millis(20));
        timer.stop();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sub_minimum_periods_are_clamped() {
        let (timer, count) = counted_timer(1, false);
        thread::sleep(Duration::from_millis(105));
        timer.stop();

        // A 1ms period clamps to 10ms, so ~10 firings, nowhere near 100.
        let fired = count.load(Ordering::SeqCst);
        assert!((5..=15).contains(&fired), "unexpected firing count: {}", fired);
    }

    #[test]
    fn handle_observes_running_state() {
        let (timer, _count) = counted_timer(20, false);
        let handle = timer.handle();
        assert!(handle.is_running());
        handle.stop();
        assert!(!handle.is_running());
    }
}
