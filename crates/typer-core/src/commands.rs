//! Semantic command surface, independent of the chat transport.
//!
//! Shop sub-actions travel as short tokens `<item-code><action><quantity>`
//! (e.g. `cb10` = buy 10 contacts, `gsa` = sell all groups). The transport
//! builds its inline buttons from [`ShopToken`]'s `Display` form and hands
//! the pressed token back for parsing; nothing here touches I/O.

use std::fmt;
use std::str::FromStr;

use crate::catalog::ItemId;
use crate::error::CommandError;
use crate::trade::{TradeAction, TradeQuantity};

/// Sentinel quantity meaning "maximum affordable" (buy) or "everything
/// held" (sell).
const MAX_SENTINEL: char = 'a';

/// A parsed shop sub-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopToken {
    pub item: ItemId,
    pub action: TradeAction,
    pub quantity: TradeQuantity,
}

impl FromStr for ShopToken {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(item_code), Some(action_code)) = (chars.next(), chars.next()) else {
            return Err(CommandError::BadToken(s.to_string()));
        };
        let item =
            ItemId::from_code(item_code).ok_or(CommandError::UnknownItem(item_code))?;
        let action = match action_code {
            'b' => TradeAction::Buy,
            's' => TradeAction::Sell,
            other => return Err(CommandError::UnknownAction(other)),
        };

        let rest = chars.as_str();
        let quantity = if rest.len() == 1 && rest.starts_with(MAX_SENTINEL) {
            TradeQuantity::Max
        } else {
            rest.parse::<u64>()
                .map(TradeQuantity::Exact)
                .map_err(|_| CommandError::BadQuantity(rest.to_string()))?
        };

        Ok(ShopToken {
            item,
            action,
            quantity,
        })
    }
}

impl fmt::Display for ShopToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            TradeAction::Buy => 'b',
            TradeAction::Sell => 's',
        };
        write!(f, "{}{}", self.item.code(), action)?;
        match self.quantity {
            TradeQuantity::Exact(n) => write!(f, "{n}"),
            TradeQuantity::Max => write!(f, "{MAX_SENTINEL}"),
        }
    }
}

/// A top-level player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame,
    StopGame,
    ShowStats,
    ShowAchievements,
    OpenShop,
    Shop(ShopToken),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_game" | "new" | "reset_game" | "reset" => Ok(Command::NewGame),
            "stop_game" | "stop" | "end_game" | "end" => Ok(Command::StopGame),
            "stats" | "stat" => Ok(Command::ShowStats),
            "achievements" | "achievement" => Ok(Command::ShowAchievements),
            "shop" | "interface" => Ok(Command::OpenShop),
            token => token
                .parse::<ShopToken>()
                .map(Command::Shop)
                .map_err(|_| CommandError::UnknownCommand(s.to_string())),
        }
    }
}
