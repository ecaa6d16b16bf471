#![forbid(unsafe_code)]

//! Policy-as-data configuration for the page behaviors.
//!
//! Every tunable of the page lives in one [`FolioConfig`] that can be loaded
//! from JSON (what the browser runner receives) or TOML, so offsets, delays
//! and element names can change without touching code.
//!
//! ```toml
//! [nav]
//! probe_offset_px = 120.0
//!
//! [toast]
//! duration_ms = 6000
//! ```
//!
//! # Defaults
//!
//! `FolioConfig::default()` reproduces the page's stock behavior: a 150 px
//! navigation probe, a 150 px reveal offset, a 10% visibility threshold with a
//! 50 px bottom root-margin contraction, 100 ms progress stagger, a 4 s toast,
//! a 1.5 s simulated submit, and a 5 s Konami animation.

use std::path::Path;

use folio_core::geometry::Insets;
use folio_core::key_sequence::KONAMI_KEYS;
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Element ids, classes and attributes the page is scanned for.
    pub names: ElementNames,
    pub nav: NavConfig,
    pub navbar: NavbarConfig,
    pub reveal: RevealConfig,
    pub observer: ObserverConfig,
    pub toast: ToastConfig,
    pub form: FormConfig,
    pub follower: FollowerConfig,
    pub parallax: ParallaxConfig,
    pub konami: KonamiConfig,
    pub typewriter: TypewriterConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            names: ElementNames::default(),
            nav: NavConfig::default(),
            navbar: NavbarConfig::default(),
            reveal: RevealConfig::default(),
            observer: ObserverConfig::default(),
            toast: ToastConfig::default(),
            form: FormConfig::default(),
            follower: FollowerConfig::default(),
            parallax: ParallaxConfig::default(),
            konami: KonamiConfig::default(),
            typewriter: TypewriterConfig::default(),
        }
    }
}

impl FolioConfig {
    /// Parse from a JSON string without validating.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Parse from a TOML string without validating.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    /// Load a TOML file from disk and validate it.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)?.validated()
    }

    /// Parse and validate JSON in one step.
    pub fn load_json(s: &str) -> Result<Self, ConfigError> {
        Self::from_json_str(s)?.validated()
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of violations. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.nav.probe_offset_px.is_finite() {
            errors.push("nav.probe_offset_px must be finite".into());
        }
        if !self.reveal.offset_px.is_finite() {
            errors.push("reveal.offset_px must be finite".into());
        }
        if !self.navbar.threshold_px.is_finite() {
            errors.push("navbar.threshold_px must be finite".into());
        }
        if !(0.0..=1.0).contains(&self.observer.threshold) {
            errors.push(format!(
                "observer.threshold must be in [0, 1], got {}",
                self.observer.threshold
            ));
        }
        let m = self.observer.root_margin;
        if ![m.top, m.right, m.bottom, m.left].iter().all(|v| v.is_finite()) {
            errors.push("observer.root_margin must be finite".into());
        }
        if self.toast.duration_ms == 0 {
            errors.push("toast.duration_ms must be > 0".into());
        }
        if self.konami.sequence.is_empty() {
            errors.push("konami.sequence must not be empty".into());
        }
        if self.konami.duration_ms == 0 {
            errors.push("konami.duration_ms must be > 0".into());
        }
        if ![
            self.parallax.first_factor,
            self.parallax.second_factor,
            self.follower.offset_px,
        ]
        .iter()
        .all(|v| v.is_finite())
        {
            errors.push("parallax factors and follower.offset_px must be finite".into());
        }
        if self.names.reveal_classes.is_empty() {
            errors.push("names.reveal_classes must not be empty".into());
        }
        for (field, value) in self.names.required_names() {
            if value.trim().is_empty() {
                errors.push(format!("names.{field} must not be empty"));
            }
        }

        errors
    }
}

/// Element ids, class names and attributes the page is scanned for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementNames {
    pub mouse_follower: String,
    pub menu_button: String,
    pub menu_close: String,
    pub menu_panel: String,
    pub menu_link_class: String,
    pub navbar: String,
    pub nav_link_class: String,
    pub nav_target_attribute: String,
    pub section_tag: String,
    pub reveal_classes: Vec<String>,
    pub progress_class: String,
    /// Custom property holding a bar's target width.
    pub progress_width_property: String,
    pub toast: String,
    pub toast_title: String,
    pub toast_message: String,
    pub toast_icon_class: String,
    pub contact_form: String,
    pub submit_button: String,
    pub blob_first_class: String,
    pub blob_second_class: String,
}

impl Default for ElementNames {
    fn default() -> Self {
        Self {
            mouse_follower: "mouseFollower".into(),
            menu_button: "mobileMenuBtn".into(),
            menu_close: "mobileCloseBtn".into(),
            menu_panel: "mobileMenu".into(),
            menu_link_class: "mobile-nav-link".into(),
            navbar: "navbar".into(),
            nav_link_class: "nav-link".into(),
            nav_target_attribute: "data-section".into(),
            section_tag: "section".into(),
            reveal_classes: vec![
                "expertise-card".into(),
                "automation-card".into(),
                "timeline-item".into(),
                "education-card".into(),
            ],
            progress_class: "progress-fill".into(),
            progress_width_property: "--width".into(),
            toast: "toast".into(),
            toast_title: "toastTitle".into(),
            toast_message: "toastMessage".into(),
            toast_icon_class: "toast-icon".into(),
            contact_form: "contactForm".into(),
            submit_button: "submitBtn".into(),
            blob_first_class: "bg-blob-1".into(),
            blob_second_class: "bg-blob-2".into(),
        }
    }
}

impl ElementNames {
    fn required_names(&self) -> [(&'static str, &str); 8] {
        [
            ("nav_link_class", self.nav_link_class.as_str()),
            ("nav_target_attribute", self.nav_target_attribute.as_str()),
            ("section_tag", self.section_tag.as_str()),
            ("progress_class", self.progress_class.as_str()),
            ("progress_width_property", self.progress_width_property.as_str()),
            ("toast", self.toast.as_str()),
            ("contact_form", self.contact_form.as_str()),
            ("menu_panel", self.menu_panel.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Distance below the scroll offset used as the "in view" probe.
    pub probe_offset_px: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            probe_offset_px: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    /// Scroll offset above which the navbar uses `scrolled_background`.
    pub threshold_px: f64,
    pub scrolled_background: String,
    pub resting_background: String,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            threshold_px: 50.0,
            scrolled_background: "rgba(0, 0, 0, 0.5)".into(),
            resting_background: "rgba(0, 0, 0, 0.2)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// A card is revealed once its top is above `viewport height - offset_px`.
    pub offset_px: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { offset_px: 150.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Fraction of a section that must be visible.
    pub threshold: f64,
    /// Root margin applied to the viewport (negative contracts).
    pub root_margin: Insets,
    /// Delay between consecutive bar fills inside one section.
    pub stagger_ms: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: Insets::new(0.0, 0.0, -50.0, 0.0),
            stagger_ms: 100,
        }
    }
}

impl ObserverConfig {
    #[must_use]
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub duration_ms: u64,
    pub success_glyph: String,
    pub failure_glyph: String,
    pub success_color: String,
    pub failure_color: String,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: 4000,
            success_glyph: "✓".into(),
            failure_glyph: "✗".into(),
            success_color: "#4ade80".into(),
            failure_color: "#ef4444".into(),
        }
    }
}

impl ToastConfig {
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Delay before the transport is called.
    pub delay_ms: u64,
    pub sending_label_html: String,
    pub success_title: String,
    pub success_message: String,
    pub failure_title: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1500,
            sending_label_html: "<span class=\"spinner\"></span> Sending...".into(),
            success_title: "Message sent successfully! 🎉".into(),
            success_message: "I'll get back to you as soon as possible.".into(),
            failure_title: "Message not sent".into(),
        }
    }
}

impl FormConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    /// Subtracted from both pointer coordinates to center the follower.
    pub offset_px: f64,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self { offset_px: 12.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub first_factor: f64,
    pub second_factor: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            first_factor: 0.1,
            second_factor: -0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KonamiConfig {
    /// DOM key names, in order.
    pub sequence: Vec<String>,
    /// How long the body animation stays applied.
    pub duration_ms: u64,
    pub animation: String,
}

impl Default for KonamiConfig {
    fn default() -> Self {
        Self {
            sequence: KONAMI_KEYS.iter().map(|k| (*k).to_string()).collect(),
            duration_ms: 5000,
            animation: "rainbow 2s linear infinite".into(),
        }
    }
}

impl KonamiConfig {
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    /// Delay between characters.
    pub speed_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self { speed_ms: 100 }
    }
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(String),
    /// JSON parse error.
    Json(String),
    /// Validation errors.
    Validation(Vec<String>),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}
