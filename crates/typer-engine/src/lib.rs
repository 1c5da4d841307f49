//! # typer-engine
//! Per-player runtime around [`typer_core`]: session registry, cooldown
//! control, the tokio accrual scheduler, and the game orchestrator that the
//! transport layer drives.

pub mod cooldown;
pub mod game;
pub mod scheduler;
pub mod session;
pub mod traits;

pub use game::{Game, GameConfig, ItemStats, PlayerStats};
pub use traits::{GameNotifier, LogNotifier, MemoryStore, PlayerStore};
