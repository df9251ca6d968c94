use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Payload carried by the engine readiness event so the continuation can
/// tell a current-cycle signal from one left over by a torn-down cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct EngineReadyPayload {
    pub(crate) generation: u64,
}

/// One-shot notification gate between the engine's bringup context and
/// the controller. Armed once per startup/restart cycle; accepts exactly
/// one signal for the armed generation and swallows everything else.
#[derive(Debug)]
pub(crate) struct ReadinessGate {
    generation: AtomicU64,
    fired: AtomicBool,
}

impl ReadinessGate {
    pub(crate) fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            fired: AtomicBool::new(true),
        }
    }

    pub(crate) fn arm(&self, generation: u64) {
        self.generation.store(generation, Ordering::Release);
        self.fired.store(false, Ordering::Release);
    }

    /// Accept the signal for `generation`. True exactly once per armed
    /// cycle; stale generations and duplicate fires return false.
    pub(crate) fn accept(&self, generation: u64) -> bool {
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        !self.fired.swap(true, Ordering::AcqRel)
    }

    /// Drop the armed cycle without accepting anything, used during
    /// teardown so a late signal from the old cycle cannot land.
    pub(crate) fn disarm(&self) {
        self.fired.store(true, Ordering::Release);
    }
}
