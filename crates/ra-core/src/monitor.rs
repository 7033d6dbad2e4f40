//! Run monitors: progress reporting and cancellation.
//!
//! The engine notifies a monitor once per finished section and asks it at
//! every section boundary whether to stop. Monitors never influence which
//! assignment a section receives.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::outcome::AllocationResult;

/// Observer of an allocation run.
pub trait RunMonitor {
    /// Called once before the first section, with the number of sections.
    fn on_start(&mut self, _total: usize) {}

    /// Called after each section reaches a terminal outcome. `done` counts
    /// finished sections including this one.
    fn on_section(&mut self, _done: usize, _total: usize, _result: &AllocationResult) {}

    /// Checked before each section; returning `true` aborts the run.
    fn should_stop(&self) -> bool {
        false
    }
}

/// A monitor that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl RunMonitor for NoopMonitor {}

/// Stops the run once a shared flag is raised.
///
/// The flag may be set from another thread while the run is in progress.
#[derive(Debug, Clone, Copy)]
pub struct InterruptMonitor<'a> {
    stop_flag: &'a AtomicBool,
}

impl<'a> InterruptMonitor<'a> {
    pub const fn new(stop_flag: &'a AtomicBool) -> Self {
        Self { stop_flag }
    }
}

impl RunMonitor for InterruptMonitor<'_> {
    fn should_stop(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

/// Fans every notification out to several monitors; stops when any of them
/// asks to.
#[derive(Default)]
pub struct CompositeMonitor<'a> {
    monitors: Vec<&'a mut dyn RunMonitor>,
}

impl<'a> CompositeMonitor<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, monitor: &'a mut dyn RunMonitor) -> Self {
        self.monitors.push(monitor);
        self
    }
}

impl RunMonitor for CompositeMonitor<'_> {
    fn on_start(&mut self, total: usize) {
        for m in &mut self.monitors {
            m.on_start(total);
        }
    }

    fn on_section(&mut self, done: usize, total: usize, result: &AllocationResult) {
        for m in &mut self.monitors {
            m.on_section(done, total, result);
        }
    }

    fn should_stop(&self) -> bool {
        self.monitors.iter().any(|m| m.should_stop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        started: Option<usize>,
        seen: usize,
    }

    impl RunMonitor for Counter {
        fn on_start(&mut self, total: usize) {
            self.started = Some(total);
        }

        fn on_section(&mut self, _done: usize, _total: usize, _result: &AllocationResult) {
            self.seen += 1;
        }
    }

    #[test]
    fn test_interrupt_monitor_follows_flag() {
        let flag = AtomicBool::new(false);
        let monitor = InterruptMonitor::new(&flag);
        assert!(!monitor.should_stop());
        flag.store(true, Ordering::Relaxed);
        assert!(monitor.should_stop());
    }

    #[test]
    fn test_composite_forwards_and_stops_on_any() {
        let flag = AtomicBool::new(false);
        let mut interrupt = InterruptMonitor::new(&flag);
        let mut counter = Counter::default();
        {
            let mut composite = CompositeMonitor::new()
                .with(&mut counter)
                .with(&mut interrupt);
            composite.on_start(3);
            assert!(!composite.should_stop());
            flag.store(true, Ordering::Relaxed);
            assert!(composite.should_stop());
        }
        assert_eq!(counter.started, Some(3));
        assert_eq!(counter.seen, 0);
    }
}
