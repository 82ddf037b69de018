/// Translation of configured key names into evdev codes.
pub struct KeyName;

impl KeyName {
    /// Translate a key name from the config into its evdev code.
    pub fn translate(key_name: &str) -> Result<u16, String> {
        let normalized = key_name.to_lowercase();
        let code = match normalized.as_str() {
            // Letters
            "a" => 30,
            "b" => 48,
            "c" => 46,
            "d" => 32,
            "e" => 18,
            "f" => 33,
            "g" => 34,
            "h" => 35,
            "i" => 23,
            "j" => 36,
            "k" => 37,
            "l" => 38,
            "m" => 50,
            "n" => 49,
            "o" => 24,
            "p" => 25,
            "q" => 16,
            "r" => 19,
            "s" => 31,
            "t" => 20,
            "u" => 22,
            "v" => 47,
            "w" => 17,
            "x" => 45,
            "y" => 21,
            "z" => 44,

            // Digits (top row)
            "1" => 2,
            "2" => 3,
            "3" => 4,
            "4" => 5,
            "5" => 6,
            "6" => 7,
            "7" => 8,
            "8" => 9,
            "9" => 10,
            "0" => 11,

            // Function keys
            "f1" => 59,
            "f2" => 60,
            "f3" => 61,
            "f4" => 62,
            "f5" => 63,
            "f6" => 64,
            "f7" => 65,
            "f8" => 66,
            "f9" => 67,
            "f10" => 68,
            "f11" => 87,
            "f12" => 88,

            // Modifiers ("alt" etc. mean the left-hand key)
            "alt" | "leftalt" => 56,
            "rightalt" => 100,
            "ctrl" | "leftctrl" => 29,
            "rightctrl" => 97,
            "shift" | "leftshift" => 42,
            "rightshift" => 54,
            "super" | "leftmeta" => 125,
            "rightmeta" => 126,

            // Other keys worth binding
            "esc" | "escape" => 1,
            "tab" => 15,
            "enter" => 28,
            "space" => 57,
            "backspace" => 14,
            "delete" => 111,
            "home" => 102,
            "end" => 107,
            "pause" => 119,
            "scrolllock" => 70,

            _ => return Err(format!("Unknown key name: {key_name}")),
        };

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_combo_keys() {
        // The shipped default binding is Alt+F4
        assert_eq!(KeyName::translate("alt"), Ok(56));
        assert_eq!(KeyName::translate("leftalt"), Ok(56));
        assert_eq!(KeyName::translate("f4"), Ok(62));
    }

    #[test]
    fn test_translation_is_case_insensitive() {
        assert_eq!(KeyName::translate("F4"), KeyName::translate("f4"));
        assert_eq!(KeyName::translate("Alt"), KeyName::translate("alt"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(KeyName::translate("hyper").is_err());
        assert!(KeyName::translate("").is_err());
    }
}
