//! Configuration constants for the core crate.

/// Absolute tolerance for the change-detection rule.
///
/// Rates are published with two decimal places; a movement below this bound
/// is treated as the same value re-confirmed, not a change.
pub const RATE_TOLERANCE: f64 = 1e-4;
