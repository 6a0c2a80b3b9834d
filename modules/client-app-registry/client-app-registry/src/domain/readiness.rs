//! Readiness of the remote catalog connection.
//!
//! The gate starts not-ready and is flipped once by whoever owns the catalog
//! connection lifecycle. Consumers only get a [`ReadinessProbe`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

static PROCESS_GATE: LazyLock<ReadinessGate> = LazyLock::new(ReadinessGate::new);

/// Writable side of the readiness signal.
#[derive(Debug, Clone, Default)]
pub struct ReadinessGate {
    ready: Arc<AtomicBool>,
}

impl ReadinessGate {
    /// A private gate, not-ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide gate shared by every catalog client built with it.
    #[must_use]
    pub fn process() -> Self {
        PROCESS_GATE.clone()
    }

    /// Flip to ready. Returns `true` only for the call that flipped it.
    pub fn mark_ready(&self) -> bool {
        !self.ready.swap(true, Ordering::AcqRel)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Read-only view of this gate.
    #[must_use]
    pub fn probe(&self) -> ReadinessProbe {
        ReadinessProbe {
            ready: Arc::clone(&self.ready),
        }
    }
}

/// Read-only side of the readiness signal.
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    ready: Arc<AtomicBool>,
}

impl ReadinessProbe {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_ready() {
        let gate = ReadinessGate::new();
        assert!(!gate.is_ready());
        assert!(!gate.probe().is_ready());
    }

    #[test]
    fn mark_ready_flips_once() {
        let gate = ReadinessGate::new();
        let probe = gate.probe();

        assert!(gate.mark_ready());
        assert!(!gate.mark_ready());
        assert!(gate.is_ready());
        assert!(probe.is_ready());
    }

    #[test]
    fn clones_share_state() {
        let gate = ReadinessGate::new();
        let other = gate.clone();
        other.mark_ready();
        assert!(gate.is_ready());
    }

    #[test]
    fn private_gates_are_independent() {
        let a = ReadinessGate::new();
        let b = ReadinessGate::new();
        a.mark_ready();
        assert!(!b.is_ready());
    }

    #[test]
    fn process_gate_is_shared() {
        let a = ReadinessGate::process();
        let b = ReadinessGate::process();
        a.mark_ready();
        assert!(b.is_ready());
    }
}
