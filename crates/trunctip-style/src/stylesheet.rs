#![forbid(unsafe_code)]

//! StyleSheet registry for named styles.
//!
//! Named styles play the part of CSS classes: a widget is told a class
//! name, looks it up here, and patches the result with any inline style.
//!
//! # Example
//! ```
//! use trunctip_style::{Style, StyleSheet};
//! use trunctip_render::cell::PackedRgba;
//!
//! let sheet = StyleSheet::new();
//! sheet.define("tooltip", Style::new().bg(PackedRgba::rgb(40, 40, 40)));
//!
//! let body = sheet.resolve("tooltip", Style::new(), Style::new().bold());
//! assert_eq!(body.bg, Some(PackedRgba::rgb(40, 40, 40)));
//! assert!(body.attrs.is_some());
//! ```

use crate::style::Style;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use trunctip_render::cell::PackedRgba;

/// Class name used for the tooltip body when none is configured.
pub const TOOLTIP_CLASS: &str = "tooltip";

/// Class name used for the tooltip arrow when none is configured.
pub const TOOLTIP_ARROW_CLASS: &str = "tooltip-arrow";

const TOOLTIP_BG: PackedRgba = PackedRgba::rgb(60, 60, 60);

/// Tooltip body style used when no sheet defines the class.
pub const DEFAULT_TOOLTIP_STYLE: Style = Style::new()
    .fg(PackedRgba::rgb(230, 230, 230))
    .bg(TOOLTIP_BG);

/// Arrow style used when no sheet defines the class.
pub const DEFAULT_TOOLTIP_ARROW_STYLE: Style = Style::new().fg(TOOLTIP_BG);

/// A registry of named styles.
///
/// Reads and writes go through an internal `RwLock`, so a sheet can be
/// shared behind an `Arc` and redefined while widgets hold it. A poisoned
/// lock is recovered rather than propagated: the map holds plain values and
/// cannot be left half-updated.
#[derive(Debug, Default)]
pub struct StyleSheet {
    styles: RwLock<HashMap<String, Style>>,
}

impl StyleSheet {
    /// Create a new empty StyleSheet.
    #[inline]
    pub fn new() -> Self {
        Self {
            styles: RwLock::new(HashMap::new()),
        }
    }

    /// Create a StyleSheet with the tooltip classes defined.
    ///
    /// - `tooltip`: light text on a dark gray background
    /// - `tooltip-arrow`: same gray as the tooltip background
    #[must_use]
    pub fn with_defaults() -> Self {
        let sheet = Self::new();
        sheet.define(TOOLTIP_CLASS, DEFAULT_TOOLTIP_STYLE);
        sheet.define(TOOLTIP_ARROW_CLASS, DEFAULT_TOOLTIP_ARROW_STYLE);
        sheet
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Style>> {
        self.styles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Style>> {
        self.styles.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Define a named style, replacing any previous definition.
    pub fn define(&self, name: impl Into<String>, style: Style) {
        self.write().insert(name.into(), style);
    }

    /// Remove a named style, returning it if it existed.
    pub fn remove(&self, name: &str) -> Option<Style> {
        self.write().remove(name)
    }

    /// Get a named style.
    pub fn get(&self, name: &str) -> Option<Style> {
        self.read().get(name).copied()
    }

    /// Check if a style with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Number of defined styles.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the stylesheet is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up `class`, falling back to `fallback` when it is not defined,
    /// and patch the result with an inline style.
    ///
    /// This is the lookup widgets use for `*_class` / `*_style` pairs.
    pub fn resolve(&self, class: &str, fallback: Style, inline: Style) -> Style {
        self.get(class).unwrap_or(fallback).patch(inline)
    }
}

impl Clone for StyleSheet {
    fn clone(&self) -> Self {
        Self {
            styles: RwLock::new(self.read().clone()),
        }
    }
}
