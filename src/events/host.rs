use std::fmt;

/// Plugin-facing command pushed by the host connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// "Trigger the escalation now", the user-facing console command.
    ManualTrigger,
    /// Flip the enabled gate.
    SetEnabled(bool),
}

/// Identifier of a top-level window as reported by the window manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub String);

impl WindowHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
