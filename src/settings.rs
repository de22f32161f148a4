//! Presentation settings and preferences
//!
//! Nothing here affects gameplay. Settings come from the page URL query
//! (`?quality=low&muted=1`) and are never written back.

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 250,
            QualityPreset::High => 1000,
        }
    }

    /// Segments used for round shapes (particles, bullets)
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 10,
            QualityPreset::High => 16,
        }
    }
}

/// Presentation preferences
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Explosion debris
    pub particles: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            show_fps: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse a URL query string. Unknown keys and bad values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "quality" => {
                    if let Some(preset) = QualityPreset::from_str(value) {
                        settings.quality = preset;
                    }
                }
                "particles" => settings.particles = parse_flag(value, settings.particles),
                "fps" => settings.show_fps = parse_flag(value, true),
                "muted" | "mute" => settings.muted = parse_flag(value, true),
                "volume" => {
                    if let Ok(v) = value.parse::<f32>() {
                        settings.master_volume = v.clamp(0.0, 1.0);
                    }
                }
                "sfx" => {
                    if let Ok(v) = value.parse::<f32>() {
                        settings.sfx_volume = v.clamp(0.0, 1.0);
                    }
                }
                _ => log::debug!("Ignoring unknown setting `{}`", key),
            }
        }

        settings
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective output gain for sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

/// `1/true/on/yes` and `0/false/off/no`; a bare key uses `default`
fn parse_flag(value: &str, default: bool) -> bool {
    match value.to_lowercase().as_str() {
        "" => default,
        "1" | "true" | "on" | "yes" => true,
        "0" | "false" | "off" | "no" => false,
        _ => default,
    }
}
