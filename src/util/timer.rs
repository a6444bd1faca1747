//! A periodic callback thread, used to drive the analyzer at a fixed rate.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

type Callback = Arc<Mutex<dyn FnMut() + Send + 'static>>;

pub struct TimerThread {
    cb: Callback,
    thread: Option<JoinHandle<()>>,

    interval: Duration,
    sentinel: Arc<AtomicBool>,
}

impl TimerThread {
    pub fn new<F: FnMut() + Send + 'static>(cb: F) -> Self {
        Self {
            cb: Arc::new(Mutex::new(cb)),
            thread: None,

            interval: Duration::ZERO,
            sentinel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts calling the callback every `interval_secs` seconds. Has no
    /// effect if the timer is already running.
    pub fn start(&mut self, interval_secs: f64) {
        if self.thread.is_some() {
            return;
        }

        let interval = Duration::from_secs_f64(interval_secs.max(1e-4));
        self.interval = interval;
        self.sentinel.store(true, Ordering::Release);

        let sentinel = Arc::clone(&self.sentinel);
        let cb = Arc::clone(&self.cb);

        let thread = std::thread::spawn(move || {
            let mut deadline = Instant::now() + interval;

            while sentinel.load(Ordering::Acquire) {
                let now = Instant::now();

                if now < deadline {
                    // short sleeps so that stop() is never held up for a
                    // whole interval
                    std::thread::sleep((deadline - now).min(Duration::from_millis(5)));
                    continue;
                }

                if let Ok(mut guard) = cb.lock() {
                    (*guard)();
                }

                deadline += interval;

                // skip missed ticks rather than bursting to catch up
                let now = Instant::now();
                if deadline < now {
                    deadline = now + interval;
                }
            }
        });

        log::debug!("timer thread started ({:.1} Hz)", interval.as_secs_f64().recip());
        self.thread = Some(thread);
    }

    pub fn start_hz(&mut self, interval_rate_hz: f64) {
        self.start(interval_rate_hz.recip());
    }

    /// Stops the timer and joins its thread. The callback is never called
    /// after this returns.
    pub fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.sentinel.store(false, Ordering::Release);

            if thread.join().is_err() {
                log::warn!("timer thread panicked");
            }
        }
    }

    pub const fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// The callback interval in seconds, or `0.0` if never started.
    pub fn interval(&self) -> f64 {
        self.interval.as_secs_f64()
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn calls_back_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let mut timer = TimerThread::new(move || {
            c.fetch_add(1, Ordering::Relaxed);
        });

        timer.start_hz(200.0);
        assert!(timer.is_running());
        std::thread::sleep(Duration::from_millis(100));
        timer.stop();

        assert!(!timer.is_running());
        let after_stop = count.load(Ordering::Relaxed);
        assert!(after_stop > 0);

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::Relaxed), after_stop);
    }

    #[test]
    fn start_twice_is_ignored() {
        let mut timer = TimerThread::new(|| {});
        timer.start(0.5);
        timer.start(0.01);

        assert!(within(timer.interval(), 0.5));
    }

    fn within(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
}
