use serde::{Deserialize, Serialize};
use std::fmt;

/// Evdev key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

/// Previous-sample key-down status of the watched combination.
///
/// Updated once per poll tick. A trigger is reported only on the sample
/// where the combination transitions from "not both held" to "both held",
/// so holding the combo across N ticks yields exactly one trigger.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComboState {
    modifier_down: bool,
    action_down: bool,
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current sample; returns true on a rising edge of "both held".
    pub fn update(&mut self, modifier_down: bool, action_down: bool) -> bool {
        let was_held = self.is_held();
        self.modifier_down = modifier_down;
        self.action_down = action_down;
        self.is_held() && !was_held
    }

    pub fn is_held(&self) -> bool {
        self.modifier_down && self.action_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_samples(samples: &[(bool, bool)]) -> usize {
        let mut combo = ComboState::new();
        samples
            .iter()
            .filter(|(m, a)| combo.update(*m, *a))
            .count()
    }

    #[test]
    fn test_rising_edge_fires_once_per_hold() {
        // Held across three consecutive samples: one trigger, not three
        assert_eq!(run_samples(&[(true, true), (true, true), (true, true)]), 1);
    }

    #[test]
    fn test_release_rearms_trigger() {
        let samples = [(true, true), (true, true), (false, false), (true, true)];
        assert_eq!(run_samples(&samples), 2);
    }

    #[test]
    fn test_partial_hold_does_not_fire() {
        assert_eq!(run_samples(&[(true, false), (false, true), (false, false)]), 0);
    }

    #[test]
    fn test_partial_release_rearms() {
        // Releasing just one of the two keys is enough to re-arm
        let samples = [(true, true), (true, false), (true, true)];
        assert_eq!(run_samples(&samples), 2);
    }

    #[test]
    fn test_completing_the_combo_fires() {
        let mut combo = ComboState::new();
        assert!(!combo.update(true, false));
        assert!(combo.update(true, true));
        assert!(combo.is_held());
    }
}
