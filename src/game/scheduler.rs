use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crate::game::GameEvent;

/// Recurring timer that asks the engine to step the adversaries.
///
/// Every tick is tagged with the session generation it was started for, so a
/// tick that was already queued when the session got replaced can be dropped.
pub struct AdversaryScheduler {
    /// Flag to let the timer thread stop. Set by [`AdversaryScheduler::cancel`] only.
    should_stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl AdversaryScheduler {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);
    /// Upper bound on how long the timer thread sleeps before checking the stop flag
    const POLL_INTERVAL: Duration = Duration::from_millis(50);

    /// Spawn the timer thread. The first tick fires one `period` from now.
    pub fn start(period: Duration, generation: u64, event_tx: Sender<GameEvent>) -> Self {
        let should_stop = Arc::new(AtomicBool::new(false));
        let should_stop_for_timer = should_stop.clone();
        let handle = std::thread::spawn(move || {
            run_timer(period, generation, &event_tx, &should_stop_for_timer);
        });
        tracing::debug!(
            "[scheduler] Started for session #{} with period {:?}",
            generation,
            period
        );
        AdversaryScheduler {
            should_stop,
            handle: Some(handle),
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the timer and wait for its thread to exit. No tick is sent after this returns.
    pub fn cancel(&mut self) {
        self.should_stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("[scheduler] Timer thread panicked");
            }
            tracing::debug!("[scheduler] Cancelled for session #{}", self.generation);
        }
    }
}

impl Drop for AdversaryScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Deadline of the tick after the one due at `scheduled`, which fired at `now`.
/// A late tick restarts the spacing from `now` instead of catching up.
fn next_deadline(scheduled: Instant, now: Instant, period: Duration) -> Instant {
    let next = scheduled + period;
    if next <= now { now + period } else { next }
}

fn run_timer(
    period: Duration,
    generation: u64,
    event_tx: &Sender<GameEvent>,
    should_stop: &AtomicBool,
) {
    let mut next_tick = Instant::now() + period;
    loop {
        if should_stop.load(Ordering::Acquire) {
            return;
        }
        let now = Instant::now();
        if now >= next_tick {
            if event_tx.send(GameEvent::Tick { generation }).is_err() {
                // Engine is gone
                return;
            }
            next_tick = next_deadline(next_tick, now, period);
            continue;
        }
        std::thread::sleep((next_tick - now).min(AdversaryScheduler::POLL_INTERVAL));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_on_time_tick_keeps_cadence() {
        let scheduled = Instant::now();
        let period = Duration::from_secs(1);
        let now = scheduled + Duration::from_millis(20);
        assert_eq!(next_deadline(scheduled, now, period), scheduled + period);
    }

    #[test]
    fn test_late_tick_does_not_catch_up() {
        let scheduled = Instant::now();
        let period = Duration::from_secs(1);
        // Woke up three periods late: only one tick goes out, the next is a full period away
        let now = scheduled + Duration::from_millis(3500);
        assert_eq!(next_deadline(scheduled, now, period), now + period);
    }

    #[test]
    fn test_sends_tagged_ticks() {
        let (tx, rx) = channel();
        let mut scheduler = AdversaryScheduler::start(Duration::from_millis(10), 7, tx);
        for _ in 0..3 {
            match rx.recv_timeout(Duration::from_secs(2)) {
                Ok(GameEvent::Tick { generation }) => assert_eq!(generation, 7),
                other => panic!("unexpected event: {other:?}"),
            }
        }
        scheduler.cancel();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_no_ticks_after_cancel() {
        let (tx, rx) = channel();
        let mut scheduler = AdversaryScheduler::start(Duration::from_millis(5), 0, tx);
        std::thread::sleep(Duration::from_millis(30));
        scheduler.cancel();
        // Drain whatever was sent before the cancel
        while rx.try_recv().is_ok() {}
        std::thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_cancel_is_prompt_for_long_period() {
        let (tx, _rx) = channel();
        let mut scheduler = AdversaryScheduler::start(Duration::from_secs(60), 0, tx);
        let started = Instant::now();
        scheduler.cancel();
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_stops_when_receiver_dropped() {
        let (tx, rx) = channel();
        let scheduler = AdversaryScheduler::start(Duration::from_millis(5), 0, tx);
        drop(rx);
        let started = Instant::now();
        while scheduler.is_running() && started.elapsed() < Duration::from_secs(2) {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!scheduler.is_running());
    }
}
