#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every constant the page depends on lives here: element selectors,
//! modifier class names, splash timings, an optional input-mode override and
//! the log level. Defaults match the shipped markup and stylesheet; the host
//! may override any subset through JSON, with durations in milliseconds:
//!
//! ```
//! use std::time::Duration;
//! use tinks_core::PageConfig;
//!
//! let config = PageConfig::from_json(r#"{ "splash": { "display": 1000 } }"#).unwrap();
//! assert_eq!(config.splash.display, Duration::from_millis(1000));
//! assert_eq!(config.splash.fade, Duration::from_millis(800));
//! assert_eq!(config.classes.dimmed, "dimmed");
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::error::ConfigError;
use crate::flip::InputMode;

/// Identifiers and classes used to locate page elements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Id of the scrolling card container.
    pub carousel_id: String,
    /// Class of each card inside the container.
    pub card_class: String,
    /// Id of the "previous" arrow button.
    pub prev_id: String,
    /// Id of the "next" arrow button.
    pub next_id: String,
    /// Id of the splash overlay.
    pub splash_id: String,
    /// Class of the "see more" control inside a card.
    pub expand_class: String,
    /// Class of the "see less" control inside a card.
    pub collapse_class: String,
    /// Class of the outbound "visit" link inside a card.
    pub visit_class: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            carousel_id: "carousel".to_owned(),
            card_class: "card".to_owned(),
            prev_id: "navPrev".to_owned(),
            next_id: "navNext".to_owned(),
            splash_id: "splash".to_owned(),
            expand_class: "card-cta".to_owned(),
            collapse_class: "btn-less".to_owned(),
            visit_class: "btn-visit".to_owned(),
        }
    }
}

/// Modifier class names toggled by the controllers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// On every card except the active one.
    pub dimmed: String,
    /// On cards showing their detail side.
    pub flipped: String,
    /// On the splash overlay while it fades.
    pub fade_out: String,
    /// On the body once the splash is gone.
    pub loaded: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            dimmed: "dimmed".to_owned(),
            flipped: "flipped".to_owned(),
            fade_out: "fade-out".to_owned(),
            loaded: "loaded".to_owned(),
        }
    }
}

/// Splash sequence delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SplashTimings {
    /// How long the overlay is shown before fading (about two GIF loops).
    #[serde(with = "millis")]
    pub display: Duration,
    /// Fade transition length. Must match the stylesheet transition.
    #[serde(with = "millis")]
    pub fade: Duration,
    /// Delay between overlay removal and the entrance trigger.
    #[serde(with = "millis")]
    pub entrance_delay: Duration,
    /// Delay after the entrance trigger before initial dimming, so it does
    /// not collide with entrance animations.
    #[serde(with = "millis")]
    pub settle: Duration,
}

impl Default for SplashTimings {
    fn default() -> Self {
        Self {
            display: Duration::from_millis(3500),
            fade: Duration::from_millis(800),
            entrance_delay: Duration::ZERO,
            settle: Duration::from_millis(1200),
        }
    }
}

/// Console log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    #[must_use]
    pub const fn as_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
            Self::Off => LevelFilter::OFF,
        }
    }
}

/// Complete page configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub selectors: Selectors,
    pub classes: ClassNames,
    pub splash: SplashTimings,
    /// Force an input mode instead of detecting touch capability.
    pub input_mode: Option<InputMode>,
    pub log_level: LogLevel,
}

impl PageConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the page cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("selectors.carousel_id", &self.selectors.carousel_id),
            ("selectors.card_class", &self.selectors.card_class),
            ("selectors.prev_id", &self.selectors.prev_id),
            ("selectors.next_id", &self.selectors.next_id),
            ("selectors.splash_id", &self.selectors.splash_id),
            ("selectors.expand_class", &self.selectors.expand_class),
            ("selectors.collapse_class", &self.selectors.collapse_class),
            ("selectors.visit_class", &self.selectors.visit_class),
            ("classes.dimmed", &self.classes.dimmed),
            ("classes.flipped", &self.classes.flipped),
            ("classes.fade_out", &self.classes.fade_out),
            ("classes.loaded", &self.classes.loaded),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty",
                });
            }
            if value.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a single identifier",
                });
            }
        }
        if self.splash.fade.is_zero() {
            return Err(ConfigError::Invalid {
                field: "splash.fade",
                reason: "must be non-zero to match the fade transition",
            });
        }
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_shipped_page() {
        let config = PageConfig::default();
        assert_eq!(config.selectors.carousel_id, "carousel");
        assert_eq!(config.selectors.prev_id, "navPrev");
        assert_eq!(config.selectors.next_id, "navNext");
        assert_eq!(config.selectors.expand_class, "card-cta");
        assert_eq!(config.selectors.collapse_class, "btn-less");
        assert_eq!(config.selectors.visit_class, "btn-visit");
        assert_eq!(config.splash.display, Duration::from_millis(3500));
        assert_eq!(config.splash.fade, Duration::from_millis(800));
        assert_eq!(config.splash.entrance_delay, Duration::ZERO);
        assert_eq!(config.splash.settle, Duration::from_millis(1200));
        assert_eq!(config.input_mode, None);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(PageConfig::from_json("{}").unwrap(), PageConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = PageConfig::from_json(
            r#"{
                "classes": { "dimmed": "is-dim" },
                "input_mode": "touch",
                "log_level": "debug",
                "splash": { "settle": 0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.classes.dimmed, "is-dim");
        assert_eq!(config.classes.flipped, "flipped");
        assert_eq!(config.input_mode, Some(InputMode::Touch));
        assert_eq!(config.log_level.as_filter(), LevelFilter::DEBUG);
        assert_eq!(config.splash.settle, Duration::ZERO);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            PageConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PageConfig::from_json(r#"{ "input_mode": "stylus" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn empty_names_are_rejected() {
        let err = PageConfig::from_json(r#"{ "classes": { "flipped": "  " } }"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                field: "classes.flipped",
                reason: "must not be empty",
            }
        );
    }

    #[test]
    fn multi_word_names_are_rejected() {
        let err = PageConfig::from_json(r#"{ "selectors": { "card_class": "card big" } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "selectors.card_class",
                ..
            }
        ));
    }

    #[test]
    fn zero_fade_is_rejected() {
        let err = PageConfig::from_json(r#"{ "splash": { "fade": 0 } }"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config `splash.fade`: must be non-zero to match the fade transition"
        );
    }
}
