//! Server lifecycle state shared between startup, the signal listener and
//! the realtime layer.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Starting = 0,
    Running = 1,
    Stopping = 2,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Starting,
            1 => LifecycleState::Running,
            _ => LifecycleState::Stopping,
        }
    }
}

/// What the signal listener should do about a termination signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDecision {
    /// Nothing has been served yet: exit right away with success.
    ExitImmediately,
    /// A previous signal already started the shutdown.
    AlreadyStopping,
    /// This signal moved the server to `Stopping`; drain and exit.
    BeginDrain,
}

/// Atomic cell holding the current [`LifecycleState`].
///
/// Transitions only move forward: `Starting -> Running -> Stopping`, or
/// straight to `Stopping`.
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Starting as u8),
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Record that the server is accepting requests. Has no effect once
    /// stopping.
    pub fn mark_running(&self) -> bool {
        self.state
            .compare_exchange(
                LifecycleState::Starting as u8,
                LifecycleState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Apply a termination signal.
    ///
    /// Exactly one caller ever receives [`SignalDecision::BeginDrain`].
    pub fn on_term_signal(&self) -> SignalDecision {
        match self.state.compare_exchange(
            LifecycleState::Running as u8,
            LifecycleState::Stopping as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => SignalDecision::BeginDrain,
            Err(current) => match LifecycleState::from_u8(current) {
                LifecycleState::Starting => SignalDecision::ExitImmediately,
                LifecycleState::Stopping => SignalDecision::AlreadyStopping,
                // Unreachable: a failed exchange never observes `Running`.
                LifecycleState::Running => SignalDecision::AlreadyStopping,
            },
        }
    }

    pub fn is_stopping(&self) -> bool {
        self.state() == LifecycleState::Stopping
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
