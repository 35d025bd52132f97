#![forbid(unsafe_code)]

//! Plain-data controller options.
//!
//! Everything a controller needs that is not a node handle or a callback
//! lives in [`ReorderOptions`], so it can be kept in a settings file:
//!
//! ```toml
//! # dragsort.toml
//! delay_ms = 250
//! refresh_debounce_ms = 50
//! clone_element_class = "drag-ghost"
//!
//! [clone_element_style]
//! opacity = "0.8"
//! width = 320
//! ```
//!
//! ```rust,ignore
//! let options = ReorderOptions::from_toml_file("dragsort.toml")?;
//! let config = ReorderConfig::new().group_element(list).with_options(options);
//! ```
//!
//! Numeric style values are pixel lengths; strings are used verbatim.

use std::collections::BTreeMap;
use std::fmt;
#[cfg(feature = "config")]
use std::path::Path;

use dragsort_core::style::StyleValue;
#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Default displacement animation length.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);
/// Default geometry refresh debounce window.
pub const DEFAULT_REFRESH_DEBOUNCE: Duration = Duration::from_millis(50);

const MAX_DELAY_MS: u64 = 60_000;
const MAX_REFRESH_DEBOUNCE_MS: u64 = 10_000;

/// Tunable controller options.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ReorderOptions {
    /// Displacement animation length in milliseconds.
    pub delay_ms: u64,
    /// Geometry refresh debounce window in milliseconds.
    pub refresh_debounce_ms: u64,
    /// Class applied to the drag overlay.
    pub clone_element_class: Option<String>,
    /// Inline styles applied to the drag overlay when it is created.
    ///
    /// Applied after the positioning styles, in property-name order.
    pub clone_element_style: BTreeMap<String, StyleValue>,
}

impl Default for ReorderOptions {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            refresh_debounce_ms: DEFAULT_REFRESH_DEBOUNCE.as_millis() as u64,
            clone_element_class: None,
            clone_element_style: BTreeMap::new(),
        }
    }
}

impl ReorderOptions {
    /// Displacement animation length.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Geometry refresh debounce window.
    #[must_use]
    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }

    /// Validate ranges. An empty list means the options are usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.delay_ms > MAX_DELAY_MS {
            errors.push(format!(
                "delay_ms must be <= {MAX_DELAY_MS}, got {}",
                self.delay_ms
            ));
        }

        if self.refresh_debounce_ms > MAX_REFRESH_DEBOUNCE_MS {
            errors.push(format!(
                "refresh_debounce_ms must be <= {MAX_REFRESH_DEBOUNCE_MS}, got {}",
                self.refresh_debounce_ms
            ));
        }

        for (property, value) in &self.clone_element_style {
            if property.trim().is_empty() {
                errors.push("clone_element_style has an empty property name".into());
            }
            if let StyleValue::Px(px) = value
                && !px.is_finite()
            {
                errors.push(format!(
                    "clone_element_style.{property} must be finite, got {px}"
                ));
            }
        }

        if let Some(class) = &self.clone_element_class
            && class.trim().is_empty()
        {
            errors.push("clone_element_class must not be blank".into());
        }

        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, OptionsError> {
        toml::from_str(s).map_err(OptionsError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(OptionsError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(s).map_err(OptionsError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(OptionsError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, OptionsError> {
        toml::to_string_pretty(self).map_err(OptionsError::TomlSer)
    }
}

/// Error loading options from a file or string.
#[derive(Debug)]
pub enum OptionsError {
    /// Reading the file failed.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_DELAY, DEFAULT_REFRESH_DEBOUNCE, ReorderOptions};
    use dragsort_core::style::StyleValue;

    #[test]
    fn defaults_match_builtin_timings() {
        let options = ReorderOptions::default();
        assert_eq!(options.delay(), DEFAULT_DELAY);
        assert_eq!(options.refresh_debounce(), DEFAULT_REFRESH_DEBOUNCE);
        assert!(options.validate().is_empty());
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let mut options = ReorderOptions {
            delay_ms: 120_000,
            refresh_debounce_ms: 20_000,
            ..ReorderOptions::default()
        };
        options
            .clone_element_style
            .insert("width".into(), StyleValue::Px(f64::NAN));
        options.clone_element_class = Some("  ".into());
        let errors = options.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors[0].starts_with("delay_ms"));
        assert!(errors[1].starts_with("refresh_debounce_ms"));
    }

    #[test]
    fn zero_delay_is_allowed() {
        let options = ReorderOptions {
            delay_ms: 0,
            refresh_debounce_ms: 0,
            ..ReorderOptions::default()
        };
        assert!(options.validate().is_empty());
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_round_trip_keeps_style_kinds() {
        let options = ReorderOptions::from_toml_str(
            r#"
            delay_ms = 250
            clone_element_class = "ghost"

            [clone_element_style]
            opacity = "0.8"
            width = 320
            "#,
        )
        .expect("valid toml");
        assert_eq!(options.delay_ms, 250);
        assert_eq!(options.refresh_debounce_ms, 50);
        assert_eq!(options.clone_element_class.as_deref(), Some("ghost"));
        assert_eq!(
            options.clone_element_style.get("width"),
            Some(&StyleValue::Px(320.0))
        );
        assert_eq!(
            options.clone_element_style.get("opacity"),
            Some(&StyleValue::keyword("0.8"))
        );

        let text = options.to_toml_string().expect("serializable");
        let reparsed = ReorderOptions::from_toml_str(&text).expect("reparse");
        assert_eq!(reparsed, options);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_partial_uses_defaults() {
        let options = ReorderOptions::from_json_str(r#"{"refresh_debounce_ms": 16}"#)
            .expect("valid json");
        assert_eq!(options.refresh_debounce_ms, 16);
        assert_eq!(options.delay_ms, 300);
    }

    #[cfg(feature = "config")]
    #[test]
    fn malformed_input_reports_format() {
        let err = ReorderOptions::from_json_str("{").expect_err("truncated json");
        assert!(err.to_string().starts_with("JSON parse error"));
        let err = ReorderOptions::from_toml_str("delay_ms = \"slow\"").expect_err("wrong type");
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}
