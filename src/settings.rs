//! Table settings
//!
//! Every recognized option lives here. Missing fields in a settings file
//! fall back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{TableError, TableResult};

/// Which set of key bindings drives the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// On-screen triggers, with `p` / `Tab` / `f` as key fallbacks
    #[default]
    Triggers,
    /// Arrow keys for paddles, space for the shooter
    Keyboard,
}

impl InputMode {
    /// Key names (as reported by `KeyboardEvent.key`) for this mode
    pub fn bindings(&self) -> KeyBindings {
        match self {
            InputMode::Triggers => KeyBindings {
                left_paddle: "p".into(),
                right_paddle: "Tab".into(),
                shooter: "f".into(),
            },
            InputMode::Keyboard => KeyBindings {
                left_paddle: "ArrowLeft".into(),
                right_paddle: "ArrowRight".into(),
                shooter: " ".into(),
            },
        }
    }
}

/// Key names bound to each logical action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left_paddle: String,
    pub right_paddle: String,
    pub shooter: String,
}

/// World bounds rectangle (origin at top-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: TABLE_WIDTH,
            height: TABLE_HEIGHT,
        }
    }
}

/// Table settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_mode: InputMode,
    /// Auto-play: paddles fire on contact, ball relaunches on drain
    pub demo_mode: bool,
    pub bounds: Bounds,
    /// Gravity magnitude (scaled by `GRAVITY_SCALE`)
    pub gravity: f32,
    /// Per-axis ball velocity cap (px/tick)
    pub max_velocity: f32,
    /// Stopper attraction constant
    pub paddle_pull: f32,
    /// Launcher charge resolution
    pub launcher_steps: u32,
    /// RNG seed for demo launches; random when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_mode: InputMode::default(),
            demo_mode: false,
            bounds: Bounds::default(),
            gravity: GRAVITY,
            max_velocity: MAX_VELOCITY,
            paddle_pull: PADDLE_PULL,
            launcher_steps: LAUNCHER_STEPS,
            seed: None,
        }
    }
}

impl Settings {
    /// Settings with demo mode on
    pub fn demo() -> Self {
        Self {
            demo_mode: true,
            ..Self::default()
        }
    }

    pub fn key_bindings(&self) -> KeyBindings {
        self.input_mode.bindings()
    }

    /// Apply a URL fragment switch (`#keyboard`, `#demo`); unknown fragments are ignored
    pub fn apply_fragment(&mut self, fragment: &str) {
        match fragment.trim_start_matches('#') {
            "keyboard" => self.input_mode = InputMode::Keyboard,
            "demo" => self.demo_mode = true,
            other => log::debug!("Ignoring unknown fragment '{}'", other),
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> TableResult<()> {
        if !(self.bounds.width > 0.0 && self.bounds.height > 0.0) {
            return Err(TableError::InvalidSetting {
                name: "bounds",
                value: self.bounds.width.min(self.bounds.height) as f64,
                expected: "positive in both dimensions",
            });
        }
        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(TableError::InvalidSetting {
                name: "gravity",
                value: self.gravity as f64,
                expected: "finite and >= 0",
            });
        }
        if !self.max_velocity.is_finite() || self.max_velocity <= 0.0 {
            return Err(TableError::InvalidSetting {
                name: "max_velocity",
                value: self.max_velocity as f64,
                expected: "finite and > 0",
            });
        }
        if !self.paddle_pull.is_finite() || self.paddle_pull <= 0.0 {
            return Err(TableError::InvalidSetting {
                name: "paddle_pull",
                value: self.paddle_pull as f64,
                expected: "finite and > 0",
            });
        }
        if self.launcher_steps < 2 {
            return Err(TableError::InvalidSetting {
                name: "launcher_steps",
                value: self.launcher_steps as f64,
                expected: "at least 2",
            });
        }
        Ok(())
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> TableResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> TableResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flipper_table_settings";

    /// Load settings from LocalStorage, then apply the page's URL fragment (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let mut settings = window
            .as_ref()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|json| Self::from_json(&json).ok())
            .unwrap_or_else(|| {
                log::info!("Using default settings");
                Self::default()
            });

        if let Some(hash) = window.and_then(|w| w.location().hash().ok()) {
            if !hash.is_empty() {
                settings.apply_fragment(&hash);
            }
        }
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.launcher_steps, 12);
        assert_eq!(settings.max_velocity, 38.0);
        assert!(!settings.demo_mode);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings = Settings::from_json(r#"{ "demo_mode": true, "max_velocity": 50 }"#).unwrap();
        assert!(settings.demo_mode);
        assert_eq!(settings.max_velocity, 50.0);
        assert_eq!(settings.gravity, GRAVITY);
        assert_eq!(settings.input_mode, InputMode::Triggers);
    }

    #[test]
    fn test_input_mode_parses_lowercase() {
        let settings = Settings::from_json(r#"{ "input_mode": "keyboard" }"#).unwrap();
        assert_eq!(settings.input_mode, InputMode::Keyboard);
        assert!(Settings::from_json(r#"{ "input_mode": "joystick" }"#).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut settings = Settings::default();
        settings.launcher_steps = 1;
        assert!(matches!(
            settings.validate(),
            Err(TableError::InvalidSetting {
                name: "launcher_steps",
                ..
            })
        ));

        let mut settings = Settings::default();
        settings.max_velocity = 0.0;
        assert!(settings.validate().is_err());

        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(TableError::Config(_))
        ));
    }

    #[test]
    fn test_fragments_switch_modes() {
        let mut settings = Settings::default();
        settings.apply_fragment("#keyboard");
        assert_eq!(settings.key_bindings().shooter, " ");
        settings.apply_fragment("#demo");
        assert!(settings.demo_mode);
        settings.apply_fragment("#nothing");
        assert_eq!(settings.input_mode, InputMode::Keyboard);
    }

    #[test]
    fn test_trigger_bindings() {
        let keys = InputMode::Triggers.bindings();
        assert_eq!(keys.left_paddle, "p");
        assert_eq!(keys.right_paddle, "Tab");
        assert_eq!(keys.shooter, "f");
    }
}
