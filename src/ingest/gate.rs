use std::sync::atomic::{AtomicBool, Ordering};

/// Allows one snapshot write per open cycle
#[derive(Debug, Default)]
pub struct SaveGate(AtomicBool);

impl SaveGate {
    pub fn open(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Closes the gate, returning whether it was open.
    /// Only one caller per open cycle sees `true`.
    pub fn try_consume(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}
