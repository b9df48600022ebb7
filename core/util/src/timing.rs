//! Timing primitives: stopwatch, debounce, throttle.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Measures elapsed wall-clock time from its creation or last reset.
#[derive(Debug)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time elapsed since the stopwatch started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Restart the measurement.
    pub fn reset(&mut self) {
        self.started = Instant::now();
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

/// Run `f`, returning its output together with the time it took.
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let watch = Stopwatch::start();
    let output = f();
    (output, watch.elapsed())
}

/// Trailing-edge debouncer: runs a task only after `delay` has passed
/// without another call.
///
/// Each call replaces the previously scheduled task, so a burst of calls
/// executes once, with the last task winning. Dropping the debouncer
/// cancels whatever is still scheduled. Calls must happen within a Tokio
/// runtime.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `task` to run after the delay, cancelling any task already
    /// scheduled.
    pub fn call<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            task.await;
        }));
    }

    /// Cancel the scheduled task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Leading-edge throttle: runs a call immediately, then drops every call
/// inside the following window.
pub struct Throttle {
    window: Duration,
    last_run: Option<Instant>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_run: None,
        }
    }

    /// Run `task` unless a previous run happened inside the window.
    /// Returns the task's output when it ran.
    pub fn call<R>(&mut self, task: impl FnOnce() -> R) -> Option<R> {
        let now = Instant::now();
        match self.last_run {
            Some(last) if now.duration_since(last) < self.window => None,
            _ => {
                self.last_run = Some(now);
                Some(task())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_stopwatch_measures_elapsed_time() {
        let watch = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(10));

        assert!(watch.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_stopwatch_reset_restarts() {
        let mut watch = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(10));
        watch.reset();

        assert!(watch.elapsed() < Duration::from_millis(10));
    }

    #[test]
    fn test_timed_returns_output_and_duration() {
        let (output, duration) = timed(|| {
            std::thread::sleep(Duration::from_millis(5));
            42
        });

        assert_eq!(output, 42);
        assert!(duration >= Duration::from_millis(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_collapses_bursts() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        for _ in 0..3 {
            let count = Arc::clone(&count);
            debouncer.call(async move {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        sleep(Duration::from_millis(300)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_retrigger_resets_delay() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        let first = Arc::clone(&count);
        debouncer.call(async move {
            first.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(60)).await;

        let second = Arc::clone(&count);
        debouncer.call(async move {
            second.fetch_add(1, Ordering::SeqCst);
        });

        // The first task was cancelled; the second fires 100ms after the
        // re-trigger.
        sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_cancel_discards_pending_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        let task_count = Arc::clone(&count);
        debouncer.call(async move {
            task_count.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_throttle_runs_leading_edge_only() {
        let mut throttle = Throttle::new(Duration::from_millis(50));

        assert_eq!(throttle.call(|| 1), Some(1));
        assert_eq!(throttle.call(|| 2), None);
        assert_eq!(throttle.call(|| 3), None);
    }

    #[test]
    fn test_throttle_reopens_after_window() {
        let mut throttle = Throttle::new(Duration::from_millis(20));

        assert_eq!(throttle.call(|| 1), Some(1));
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(throttle.call(|| 2), Some(2));
    }
}
