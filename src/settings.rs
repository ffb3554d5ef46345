//! Game settings and preferences
//!
//! Read once at start-up from an optional JSON block embedded in the page.
//! Nothing is ever written back.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Session rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// 60-second countdown, shots rate-limited
    #[default]
    Timed,
    /// No countdown, no fire cooldown
    Classic,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Timed => "Timed",
            Variant::Classic => "Classic",
        }
    }

    /// Balance preset for this variant
    pub fn tuning(&self) -> Tuning {
        match self {
            Variant::Timed => Tuning::timed(),
            Variant::Classic => Tuning::classic(),
        }
    }
}

/// Image and sound file locations, relative to the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub player_image: String,
    pub enemy_image: String,
    pub music: String,
    pub gun_sound: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            player_image: "player.png".to_string(),
            enemy_image: "enemy.png".to_string(),
            music: "bgmusic.mp3".to_string(),
            gun_sound: "gun.mp3".to_string(),
        }
    }
}

/// Host settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rule set
    pub variant: Variant,
    /// Overrides the variant's preset entirely when present
    pub tuning: Option<Tuning>,

    // === Audio ===
    /// Background loop volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Gun one-shot volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,

    pub assets: AssetPaths,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Timed,
            tuning: None,

            music_volume: 0.5,
            sfx_volume: 0.7,
            muted: false,

            assets: AssetPaths::default(),
        }
    }
}

impl Settings {
    /// Parse a (possibly partial) settings object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Balance values in effect: explicit override, else the variant preset
    pub fn effective_tuning(&self) -> Tuning {
        self.tuning
            .clone()
            .map(Tuning::sanitized)
            .unwrap_or_else(|| self.variant.tuning())
    }

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }

    /// Effective effect volume (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    /// Id of the optional `<script type="application/json">` config block
    const CONFIG_ELEMENT_ID: &'static str = "game-config";

    /// Load settings from the page's config block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(json) = text else {
            log::info!("No #{} block, using default settings", Self::CONFIG_ELEMENT_ID);
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings ({} variant)", settings.variant.as_str());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed #{}: {}", Self::CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }

    /// Native: settings come from `CANVAS_INVADERS_CONFIG` if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(json) = std::env::var("CANVAS_INVADERS_CONFIG") else {
            log::debug!("{} not used natively, using defaults", Self::CONFIG_ELEMENT_ID);
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings ({} variant)", settings.variant.as_str());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed CANVAS_INVADERS_CONFIG: {}", e);
                Self::default()
            }
        }
    }
}
