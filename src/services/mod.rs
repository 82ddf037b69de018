pub mod combo_detector;
pub mod escalation;
pub mod host;

pub use combo_detector::ComboDetector;
pub use escalation::EscalationController;
pub use host::{create_host, GameHost};
