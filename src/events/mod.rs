pub mod context;
pub mod host;
pub mod keyboard;

pub use context::GameContext;
pub use host::{HostEvent, WindowHandle};
pub use keyboard::{ComboState, KeyCode};
