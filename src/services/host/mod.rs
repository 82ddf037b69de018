//! GameHost seam: responsibility and boundaries
//!
//! This module is responsible ONLY for talking to the game side: key state,
//! game-context reports, console command delivery, notifications and the
//! window-manager last resort. It MUST NOT contain any escalation logic;
//! what a trigger means is decided exclusively by the EscalationController.

mod dry_run;
mod remote;
mod r#trait;

pub use self::r#trait::{create_host, GameHost};
