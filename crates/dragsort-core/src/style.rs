#![forbid(unsafe_code)]

//! Inline style properties, values, and the vendor-prefix fallback table.
//!
//! Hosts differ in which property names their style maps accept. Instead of
//! probing on every write, a [`StyleTable`] is resolved once when a
//! controller is constructed: each name the host does not support is mapped
//! to its `-webkit-` form, and every later write goes through the table.

use std::fmt;

/// Vendor prefix tried when a host rejects a canonical property name.
pub const WEBKIT_PREFIX: &str = "-webkit-";

/// Style properties the controller itself writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Transition,
    Transform,
    Position,
    Left,
    Top,
}

impl StyleProperty {
    /// All built-in properties, indexed by [`StyleProperty::index`].
    pub const ALL: [StyleProperty; 5] = [
        Self::Transition,
        Self::Transform,
        Self::Position,
        Self::Left,
        Self::Top,
    ];

    /// Canonical (unprefixed) CSS name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transition => "transition",
            Self::Transform => "transform",
            Self::Position => "position",
            Self::Left => "left",
            Self::Top => "top",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Transition => 0,
            Self::Transform => 1,
            Self::Position => 2,
            Self::Left => 3,
            Self::Top => 4,
        }
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value written into a host style map.
///
/// Numeric values are lengths and gain a `px` suffix; keywords pass through
/// untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StyleValue {
    Px(f64),
    Keyword(String),
}

impl StyleValue {
    /// Keyword value.
    #[must_use]
    pub fn keyword(value: impl Into<String>) -> Self {
        Self::Keyword(value.into())
    }

    /// `translate3d(x, y, 0)` with pixel offsets.
    #[must_use]
    pub fn translate3d(x: f64, y: f64) -> Self {
        Self::Keyword(format!("translate3d({x}px, {y}px, 0)"))
    }

    /// `all <ms>ms` transition.
    #[must_use]
    pub fn transition_all(duration: web_time::Duration) -> Self {
        Self::Keyword(format!("all {}ms", duration.as_millis()))
    }

    /// The literal `none`.
    #[must_use]
    pub fn none() -> Self {
        Self::Keyword("none".to_owned())
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Keyword(value) => f.write_str(value),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(px: f64) -> Self {
        Self::Px(px)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::keyword(value)
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Keyword(value)
    }
}

/// Canonical property name → name the host accepts, resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTable {
    builtin: [String; 5],
    extra: Vec<(String, String)>,
}

impl StyleTable {
    /// Resolve the built-in properties plus `extra` names against `supports`.
    ///
    /// `supports` is asked once per distinct canonical name.
    pub fn resolve<'a, F>(extra: impl IntoIterator<Item = &'a str>, mut supports: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        let mut pick = |name: &str| {
            if supports(name) {
                name.to_owned()
            } else {
                format!("{WEBKIT_PREFIX}{name}")
            }
        };
        let builtin = StyleProperty::ALL.map(|prop| pick(prop.as_str()));
        let mut resolved_extra: Vec<(String, String)> = Vec::new();
        for name in extra {
            if StyleProperty::ALL.iter().any(|prop| prop.as_str() == name)
                || resolved_extra.iter().any(|(canonical, _)| canonical == name)
            {
                continue;
            }
            resolved_extra.push((name.to_owned(), pick(name)));
        }
        Self {
            builtin,
            extra: resolved_extra,
        }
    }

    /// Table that accepts every canonical name as-is.
    #[must_use]
    pub fn identity() -> Self {
        Self::resolve(std::iter::empty(), |_| true)
    }

    /// Host name for a built-in property.
    #[must_use]
    pub fn property(&self, prop: StyleProperty) -> &str {
        &self.builtin[prop.index()]
    }

    /// Host name for an arbitrary canonical name.
    ///
    /// Names that were not part of the resolution pass fall back to the
    /// canonical spelling.
    #[must_use]
    pub fn name<'a>(&'a self, canonical: &'a str) -> &'a str {
        if let Some(prop) = StyleProperty::ALL
            .iter()
            .find(|prop| prop.as_str() == canonical)
        {
            return self.property(*prop);
        }
        self.extra
            .iter()
            .find(|(name, _)| name == canonical)
            .map_or(canonical, |(_, resolved)| resolved.as_str())
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::identity()
    }
}
