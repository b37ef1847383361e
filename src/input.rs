//! Key-name to lane mapping
//!
//! Window/event plumbing lives outside the crate; it hands us key names
//! (e.g. "d", "space", "left") and we decide what they mean.

use crate::error::ConfigError;

/// What a key press should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Tap the given lane
    Lane(usize),
    /// Start a fresh run (only offered once the current one is over)
    Restart,
    Quit,
    Ignored,
}

/// Lane bindings from `controls.keys`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    keys: Vec<String>,
}

impl KeyMap {
    /// Normalize names (trimmed, lowercase) and reject blanks or repeats
    pub fn new(keys: &[String]) -> Result<Self, ConfigError> {
        let mut normalized: Vec<String> = Vec::with_capacity(keys.len());
        for raw in keys {
            let name = normalize(raw);
            if name.is_empty() {
                return Err(ConfigError::EmptyControlKey);
            }
            if normalized.contains(&name) {
                return Err(ConfigError::DuplicateControlKey(raw.clone()));
            }
            normalized.push(name);
        }
        Ok(Self { keys: normalized })
    }

    pub fn lane_for(&self, key: &str) -> Option<usize> {
        let key = normalize(key);
        self.keys.iter().position(|k| *k == key)
    }

    /// Lane keys win while the run is live; R restarts a finished run; Esc/Q quit
    pub fn action(&self, key: &str, run_over: bool) -> KeyAction {
        if let Some(lane) = self.lane_for(key) {
            if !run_over {
                return KeyAction::Lane(lane);
            }
        }
        match normalize(key).as_str() {
            "r" if run_over => KeyAction::Restart,
            "escape" | "esc" | "q" => KeyAction::Quit,
            _ => KeyAction::Ignored,
        }
    }

    pub fn lanes(&self) -> usize {
        self.keys.len()
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keymap(keys: &[&str]) -> KeyMap {
        let keys: Vec<String> = keys.iter().map(|s| s.to_string()).collect();
        KeyMap::new(&keys).unwrap()
    }

    #[test]
    fn test_lanes_case_insensitive() {
        let map = keymap(&["D", "f", " J ", "k"]);
        assert_eq!(map.lane_for("d"), Some(0));
        assert_eq!(map.lane_for("J"), Some(2));
        assert_eq!(map.lane_for("x"), None);
        assert_eq!(map.lanes(), 4);
    }

    #[test]
    fn test_rejects_duplicates_and_blanks() {
        let dup: Vec<String> = vec!["a".into(), "A".into()];
        assert!(matches!(
            KeyMap::new(&dup),
            Err(ConfigError::DuplicateControlKey(_))
        ));
        let blank: Vec<String> = vec!["a".into(), "".into()];
        assert!(matches!(KeyMap::new(&blank), Err(ConfigError::EmptyControlKey)));
    }

    #[test]
    fn test_actions() {
        let map = keymap(&["d", "f", "j", "q"]);
        assert_eq!(map.action("f", false), KeyAction::Lane(1));
        assert_eq!(map.action("q", false), KeyAction::Lane(3));
        assert_eq!(map.action("q", true), KeyAction::Quit);
        assert_eq!(map.action("f", true), KeyAction::Ignored);
        assert_eq!(map.action("r", false), KeyAction::Ignored);
        assert_eq!(map.action("R", true), KeyAction::Restart);
        assert_eq!(map.action("Escape", false), KeyAction::Quit);
    }
}
