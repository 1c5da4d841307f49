//! # typer-core
//! Simulation core for the Typer idle economy: catalog, geometric pricing,
//! capped resource ledger, unlock and achievement detection, and the pure
//! trade planner behind the shop commands.

pub mod achievements;
pub mod catalog;
pub mod commands;
pub mod constants;
pub mod display;
pub mod error;
pub mod ledger;
pub mod pricing;
pub mod record;
pub mod trade;
pub mod types;
pub mod unlock;
