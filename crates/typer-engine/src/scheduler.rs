//! Per-player accrual tasks.
//!
//! One tokio task per running game, firing on a fixed interval and driving
//! [`Game::tick`]. The scheduler only owns the task handles; all game state
//! stays in the session registry, so aborting a task never loses anything
//! beyond an in-flight tick.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;

use typer_core::types::PlayerId;

use crate::game::Game;

#[derive(Debug, Default)]
pub struct AccrualScheduler {
    handles: DashMap<PlayerId, JoinHandle<()>>,
}

impl AccrualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the accrual task for a player. An existing task
    /// for the same player is aborted first, so at most one runs per id.
    pub fn start(&self, player: PlayerId, game: Arc<Game>) {
        let interval = game.config.tick_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of a tokio interval fires immediately; skip it
            // so a fresh game accrues nothing at second zero.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !game.tick(player) {
                    debug!(player = player.0, "session gone, accrual task exiting");
                    break;
                }
            }
        });
        if let Some(previous) = self.handles.insert(player, handle) {
            previous.abort();
        }
    }

    /// Stop the accrual task for a player, if one runs.
    pub fn stop(&self, player: PlayerId) {
        if let Some((_, handle)) = self.handles.remove(&player) {
            handle.abort();
        }
    }

    pub fn is_running(&self, player: PlayerId) -> bool {
        self.handles.contains_key(&player)
    }

    /// Number of live accrual tasks.
    pub fn active(&self) -> usize {
        self.handles.len()
    }

    /// Abort every task. Used on shutdown after a final flush.
    pub fn shutdown(&self) {
        self.handles.retain(|_, handle| {
            handle.abort();
            false
        });
    }
}
