// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reflow scheduling.
//!
//! Decides when the geometry resolver has to run again after the outline
//! layout changed. The host feeds it layout observations and polls it once
//! per frame; it answers whether a recompute pass is due.
//!
//! ```text
//! [container resize] ─┐
//! [window resize]    ─┼─→ ReflowSynchronizer ─→ poll(now) ─→ recompute pass
//! [layout mutation]  ─┤     (debounce, retries)
//! [startup retries]  ─┘
//! ```

use std::time::{Duration, Instant};

/// A layout-affecting signal from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflowTrigger {
    ContainerResize,
    WindowResize,
    /// Nodes inserted/removed or collapse state toggled.
    Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FirstPass {
    /// Mounted this frame; wait one frame boundary before measuring.
    AwaitFrame,
    Pending,
    Done,
}

#[derive(Debug, Clone)]
pub struct ReflowSynchronizer {
    debounce: Duration,
    retry_ladder: Vec<Duration>,
    mounted: bool,
    ready: bool,
    first_pass: FirstPass,
    immediate: bool,
    debounce_deadline: Option<Instant>,
    retries: Vec<Instant>,
}

impl ReflowSynchronizer {
    pub fn new(debounce: Duration, retry_ladder: Vec<Duration>) -> Self {
        Self {
            debounce,
            retry_ladder,
            mounted: false,
            ready: false,
            first_pass: FirstPass::Done,
            immediate: false,
            debounce_deadline: None,
            retries: Vec::new(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Start observing. Schedules the deferred first pass and the retry ladder.
    pub fn mount(&mut self, now: Instant) {
        self.mounted = true;
        self.ready = false;
        self.first_pass = FirstPass::AwaitFrame;
        self.immediate = false;
        self.debounce_deadline = None;
        self.retries = self.retry_ladder.iter().map(|d| now + *d).collect();
        self.retries.sort();
    }

    /// Stop observing and drop every pending timer.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.ready = false;
        self.first_pass = FirstPass::Done;
        self.immediate = false;
        self.debounce_deadline = None;
        self.retries.clear();
    }

    /// The host knows the outline has mounted: replace the retry ladder by a
    /// single pass on the next poll.
    pub fn mark_ready(&mut self) {
        if !self.mounted || self.ready {
            return;
        }
        self.ready = true;
        self.retries.clear();
        self.immediate = true;
        log::debug!("Outline ready, startup retries cancelled");
    }

    pub fn notify(&mut self, trigger: ReflowTrigger, now: Instant) {
        if !self.mounted {
            return;
        }
        match trigger {
            ReflowTrigger::ContainerResize | ReflowTrigger::WindowResize => self.immediate = true,
            // Let layout settle before measuring; later mutations extend the wait.
            ReflowTrigger::Mutation => self.debounce_deadline = Some(now + self.debounce),
        }
    }

    /// Called once per frame. Returns true if a recompute pass should run now.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }

        let mut due = std::mem::take(&mut self.immediate);

        match self.first_pass {
            FirstPass::AwaitFrame => self.first_pass = FirstPass::Pending,
            FirstPass::Pending => {
                self.first_pass = FirstPass::Done;
                due = true;
            }
            FirstPass::Done => {}
        }

        if self.debounce_deadline.is_some_and(|d| now >= d) {
            self.debounce_deadline = None;
            due = true;
        }

        let expired = self.retries.iter().take_while(|t| **t <= now).count();
        if expired > 0 {
            self.retries = self.retries.split_off(expired);
            due = true;
        }

        due
    }

    /// Whether the host must render another frame without waiting for input.
    pub fn wants_frame(&self) -> bool {
        self.mounted && (self.immediate || self.first_pass != FirstPass::Done)
    }

    /// Earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.debounce_deadline, self.retries.first().copied()]
            .into_iter()
            .flatten()
            .min()
    }
}

/// Turns per-frame layout observations into reflow triggers, the way
/// resize and mutation observers would report them.
#[derive(Debug, Clone, Default)]
pub struct LayoutObserver {
    last: Option<Observation>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Observation {
    signature: u64,
    container: (f32, f32),
    window: (f32, f32),
}

impl LayoutObserver {
    pub fn observe(&mut self, signature: u64, container: (f32, f32), window: (f32, f32)) -> Vec<ReflowTrigger> {
        let current = Observation {
            signature,
            container,
            window,
        };
        let Some(last) = self.last.replace(current) else {
            return Vec::new();
        };

        let mut triggers = Vec::new();
        if last.window != current.window {
            triggers.push(ReflowTrigger::WindowResize);
        }
        if last.container != current.container {
            triggers.push(ReflowTrigger::ContainerResize);
        }
        if triggers.is_empty() && last.signature != current.signature {
            triggers.push(ReflowTrigger::Mutation);
        }
        triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn synchronizer() -> ReflowSynchronizer {
        ReflowSynchronizer::new(ms(50), vec![ms(100), ms(300), ms(600), ms(1000)])
    }

    #[test]
    fn test_first_pass_waits_one_frame() {
        let t0 = Instant::now();
        let mut sync = synchronizer();
        sync.mount(t0);
        assert!(sync.wants_frame());
        assert!(!sync.poll(t0));
        assert!(sync.poll(t0 + ms(16)));
        assert!(!sync.poll(t0 + ms(32)));
    }

    #[test]
    fn test_retry_ladder() {
        let t0 = Instant::now();
        let mut sync = synchronizer();
        sync.mount(t0);
        sync.poll(t0);
        sync.poll(t0);

        assert_eq!(sync.next_deadline(), Some(t0 + ms(100)));
        assert!(!sync.poll(t0 + ms(99)));
        assert!(sync.poll(t0 + ms(100)));
        assert!(!sync.poll(t0 + ms(200)));
        // Two rungs expired between polls still yield one pass.
        assert!(sync.poll(t0 + ms(650)));
        assert_eq!(sync.next_deadline(), Some(t0 + ms(1000)));
        assert!(sync.poll(t0 + ms(1000)));
        assert_eq!(sync.next_deadline(), None);
    }

    #[test]
    fn test_mutation_debounced() {
        let t0 = Instant::now();
        let mut sync = ReflowSynchronizer::new(ms(50), Vec::new());
        sync.mount(t0);
        sync.poll(t0);
        sync.poll(t0);

        sync.notify(ReflowTrigger::Mutation, t0);
        assert!(!sync.poll(t0 + ms(20)));
        sync.notify(ReflowTrigger::Mutation, t0 + ms(30));
        assert!(!sync.poll(t0 + ms(60)));
        assert!(sync.poll(t0 + ms(80)));
        assert!(!sync.poll(t0 + ms(200)));
    }

    #[test]
    fn test_resize_immediate() {
        let t0 = Instant::now();
        let mut sync = ReflowSynchronizer::new(ms(50), Vec::new());
        sync.mount(t0);
        sync.poll(t0);
        sync.poll(t0);

        sync.notify(ReflowTrigger::ContainerResize, t0);
        assert!(sync.wants_frame());
        assert!(sync.poll(t0));
        sync.notify(ReflowTrigger::WindowResize, t0);
        assert!(sync.poll(t0));
        assert!(!sync.poll(t0));
    }

    #[test]
    fn test_mark_ready_cancels_retries() {
        let t0 = Instant::now();
        let mut sync = synchronizer();
        sync.mount(t0);
        sync.mark_ready();
        assert_eq!(sync.next_deadline(), None);
        assert!(sync.poll(t0));
        // Ready is one-shot.
        sync.mark_ready();
        sync.poll(t0);
        assert!(!sync.poll(t0 + ms(5000)));
    }

    #[test]
    fn test_unmounted_ignores_everything() {
        let t0 = Instant::now();
        let mut sync = synchronizer();
        sync.notify(ReflowTrigger::ContainerResize, t0);
        assert!(!sync.poll(t0));

        sync.mount(t0);
        sync.unmount();
        assert!(!sync.poll(t0 + ms(2000)));
        assert_eq!(sync.next_deadline(), None);
    }

    #[test]
    fn test_observer_classifies_changes() {
        let mut observer = LayoutObserver::default();
        assert!(observer.observe(1, (300.0, 800.0), (1280.0, 720.0)).is_empty());
        assert!(observer.observe(1, (300.0, 800.0), (1280.0, 720.0)).is_empty());
        assert_eq!(
            observer.observe(2, (300.0, 800.0), (1280.0, 720.0)),
            vec![ReflowTrigger::Mutation]
        );
        assert_eq!(
            observer.observe(3, (300.0, 900.0), (1280.0, 720.0)),
            vec![ReflowTrigger::ContainerResize]
        );
        assert_eq!(
            observer.observe(3, (350.0, 900.0), (1400.0, 720.0)),
            vec![ReflowTrigger::WindowResize, ReflowTrigger::ContainerResize]
        );
    }
}
