//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time and seeds
//! - Keyboard mapping
//! - Loop drivers, listeners and DOM access (web only, see [`web`])

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Unix time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Current wall-clock time as a UTC date, for score records
pub fn now_utc() -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp_millis(now_ms() as i64).unwrap_or_default()
}

/// Fresh RNG seed for a new session
pub fn seed() -> u64 {
    now_ms() as u64
}

/// Keys the games respond to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Key> {
        match key {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            _ => None,
        }
    }

    /// Space and Enter both start a game
    pub fn is_start(self) -> bool {
        matches!(self, Key::Space | Key::Enter)
    }

    /// Whether the browser's default action (scrolling) should be suppressed
    pub fn captures_default(self) -> bool {
        !matches!(self, Key::Enter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_key("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_key(" "), Some(Key::Space));
        assert_eq!(Key::from_key("Enter"), Some(Key::Enter));
        assert_eq!(Key::from_key("a"), None);
        assert!(Key::Enter.is_start());
        assert!(!Key::Up.is_start());
    }

    #[test]
    fn test_now_utc_tracks_now_ms() {
        let before = now_ms() as i64;
        let now = now_utc().timestamp_millis();
        assert!(now >= before);
        assert!(now - before < 60_000);
    }

    #[test]
    fn test_clock_moves_forward() {
        let a = now_ms();
        let b = now_ms();
        assert!(a > 1.6e12);
        assert!(b >= a);
    }
}
