//! Integration test suite for the Typer game engine.
//!
//! The scenarios here drive the engine the way a chat transport would:
//! commands and chat messages in, notifications and stored records out.
//! Economy invariants are verified end to end across trades, accrual ticks,
//! throttling, and restarts.

pub mod helpers;
