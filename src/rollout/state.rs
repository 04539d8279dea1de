// ABOUTME: Rollout state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce valid state transitions at compile time.

/// Initial state: target observed, nothing changed yet.
/// Available actions: `dispatch()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pending;

/// Replace instruction issued: the target is transitioning.
/// Available actions: `health_check()`, `roll_back()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Updating;

/// Terminal success: the new digest passed its health gate and is the
/// target's confirmed digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Committed;

/// Terminal failure: the previous confirmed digest was reissued (or there
/// was nothing to restore on a first deploy).
#[derive(Debug, Clone, Copy, Default)]
pub struct RolledBack;
