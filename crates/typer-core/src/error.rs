//! Error types for the game core.
use thiserror::Error;

use crate::catalog::{ItemId, UpgradeId};
use crate::types::{Amount, PlayerId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error("{0} is still locked")] ItemLocked(ItemId),
    #[error("{0} cannot be traded")] NotForSale(ItemId),
    #[error("insufficient {currency}: have {have}, need {need}")] Insufficient { currency: ItemId, have: Amount, need: Amount },
    #[error("cannot afford a single {0}")] CannotAffordAny(ItemId),
    #[error("no {0} to sell")] NothingToSell(ItemId),
    #[error("quantity must be positive")] ZeroQuantity,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpgradeError {
    #[error("{0} already acquired")] AlreadyAcquired(UpgradeId),
    #[error("{id} requires {required} current {item}")] Prerequisite { id: UpgradeId, item: ItemId, required: u64 },
    #[error(transparent)] Payment(#[from] TradeError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("malformed shop token: {0:?}")] BadToken(String),
    #[error("unknown item code: {0:?}")] UnknownItem(char),
    #[error("unknown trade action: {0:?}")] UnknownAction(char),
    #[error("bad quantity: {0:?}")] BadQuantity(String),
    #[error("unknown command: {0:?}")] UnknownCommand(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend: {0}")] Backend(String),
    #[error("malformed record for player {0}")] MalformedRecord(PlayerId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)] Trade(#[from] TradeError),
    #[error(transparent)] Upgrade(#[from] UpgradeError),
    #[error(transparent)] Command(#[from] CommandError),
    #[error(transparent)] Store(#[from] StoreError),
    #[error("throttled, retry in {retry_in} ticks")] Throttled { retry_in: u32 },
    #[error("no running game for player {0}")] UnknownPlayer(PlayerId),
}
