// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_core::{EffectContext, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// An [`EffectContext`] whose liveness and cycle state are set by the test.
///
/// `schedule_cycle` marks a cycle active while it runs the effect, and counts
/// how many cycles it started.
#[derive(Debug, Default)]
pub struct MockContext {
    destroyed: AtomicBool,
    cycle_active: AtomicBool,
    scheduled_cycles: AtomicUsize,
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }

    pub fn set_cycle_active(&self, active: bool) {
        self.cycle_active.store(active, Ordering::SeqCst);
    }

    pub fn scheduled_cycles(&self) -> usize {
        self.scheduled_cycles.load(Ordering::SeqCst)
    }
}

impl EffectContext for MockContext {
    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn cycle_active(&self) -> bool {
        self.cycle_active.load(Ordering::SeqCst)
    }

    fn schedule_cycle<F: FnOnce()>(&self, effect: F) -> Result<()> {
        self.scheduled_cycles.fetch_add(1, Ordering::SeqCst);
        self.set_cycle_active(true);
        effect();
        self.set_cycle_active(false);
        Ok(())
    }
}
