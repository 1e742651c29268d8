//! Conventional priority bands. Lower values run earlier; any `i32` is accepted.

use std::ops::Range;

/// Vetoes that must run before anything else can observe the command (permission checks, guards)
pub const SECURITY: Range<i32> = 0..100;

/// Ordinary extensions
pub const NORMAL: Range<i32> = 100..500;

/// Extensions acting on the outcome of earlier ones (auto-commit, naming)
pub const SUPPORT: Range<i32> = 500..900;

/// Tracing and analytics, always last
pub const MONITORING: Range<i32> = 900..1000;

/// Priority of a hook that does not choose one
pub const DEFAULT: i32 = 100;
