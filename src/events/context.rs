use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the game client's state, as last reported by the host.
///
/// All three flags are captured together so an escalation decision never
/// mixes flags observed at different instants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameContext {
    pub in_match: bool,
    pub in_online_match: bool,
    pub in_freeplay: bool,
}

impl GameContext {
    /// In a local or online match.
    pub fn is_in_match(&self) -> bool {
        self.in_match || self.in_online_match
    }

    /// Not in any match and not in freeplay: main menu or something close to it.
    pub fn is_menu_like(&self) -> bool {
        !self.is_in_match() && !self.in_freeplay
    }
}

impl fmt::Display for GameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_online_match {
            write!(f, "online match")
        } else if self.in_match {
            write!(f, "local match")
        } else if self.in_freeplay {
            write!(f, "freeplay")
        } else {
            write!(f, "menu")
        }
    }
}
