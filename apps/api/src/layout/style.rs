//! Customization resolver: the handful of user-picked style options and the
//! derived style payload the preview renderer consumes.
//!
//! Sizes are CSS pixels, spacing units are rem. The offset/floor ladder is
//! fixed so that server-side previews match what the browser draws.

use serde::{Deserialize, Serialize};
use tracing::warn;

// ────────────────────────────────────────────────────────────────────────────
// Color schemes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Blue,
    Purple,
    Green,
    Orange,
    Slate,
}

struct SchemeEntry {
    scheme: ColorScheme,
    name: &'static str,
    label: &'static str,
    primary: &'static str,
}

static COLOR_SCHEMES: [SchemeEntry; 5] = [
    SchemeEntry {
        scheme: ColorScheme::Blue,
        name: "blue",
        label: "Professional Blue",
        primary: "#3b82f6",
    },
    SchemeEntry {
        scheme: ColorScheme::Purple,
        name: "purple",
        label: "Creative Purple",
        primary: "#a855f7",
    },
    SchemeEntry {
        scheme: ColorScheme::Green,
        name: "green",
        label: "Fresh Green",
        primary: "#10b981",
    },
    SchemeEntry {
        scheme: ColorScheme::Orange,
        name: "orange",
        label: "Energetic Orange",
        primary: "#f97316",
    },
    SchemeEntry {
        scheme: ColorScheme::Slate,
        name: "slate",
        label: "Modern Slate",
        primary: "#64748b",
    },
];

impl ColorScheme {
    pub fn from_name(name: &str) -> Option<Self> {
        COLOR_SCHEMES
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.scheme)
    }

    fn entry(self) -> &'static SchemeEntry {
        // Every variant has exactly one row in COLOR_SCHEMES.
        &COLOR_SCHEMES[self as usize]
    }

    pub fn primary(self) -> &'static str {
        self.entry().primary
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font families
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Modern sans-serif.
    Inter,
    /// Classic serif.
    Georgia,
    /// Clean sans-serif.
    Roboto,
    /// Elegant display serif.
    Playfair,
}

impl FontFamily {
    pub fn css_stack(self) -> &'static str {
        match self {
            FontFamily::Inter => "'Inter', sans-serif",
            FontFamily::Georgia => "'Georgia', serif",
            FontFamily::Roboto => "'Roboto', sans-serif",
            FontFamily::Playfair => "'Playfair Display', serif",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

pub const MIN_FONT_SIZE: u8 = 12;
pub const MAX_FONT_SIZE: u8 = 18;
pub const MIN_SPACING: f32 = 1.0;
pub const MAX_SPACING: f32 = 3.0;
pub const SPACING_STEP: f32 = 0.5;

/// User-chosen style options.
///
/// `accent_color` always equals `color_scheme.primary()`; only
/// [`CustomizationOptions::set_color_scheme`] writes either field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizationOptions {
    pub color_scheme: ColorScheme,
    pub font_family: FontFamily,
    pub font_size: u8,
    pub spacing: f32,
    pub accent_color: String,
}

impl Default for CustomizationOptions {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Blue,
            font_family: FontFamily::Inter,
            font_size: 14,
            spacing: 1.5,
            accent_color: ColorScheme::Blue.primary().to_string(),
        }
    }
}

impl CustomizationOptions {
    /// Re-establishes the invariants on options received from a client.
    pub fn normalized(self) -> Self {
        let scheme = self.color_scheme;
        let size = i32::from(self.font_size);
        let spacing = self.spacing;
        let mut options = self.set_font_size(size).set_spacing(spacing);
        if !spacing.is_finite() {
            options.spacing = CustomizationOptions::default().spacing;
        }
        options.accent_color = scheme.primary().to_string();
        options
    }

    /// Switches the scheme and its accent color together. Unknown names leave
    /// the options as they were.
    pub fn set_color_scheme(mut self, name: &str) -> Self {
        match ColorScheme::from_name(name) {
            Some(scheme) => {
                self.color_scheme = scheme;
                self.accent_color = scheme.primary().to_string();
            }
            None => warn!("Ignoring unknown color scheme '{name}'"),
        }
        self
    }

    pub fn set_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    pub fn set_font_size(mut self, size: i32) -> Self {
        let clamped = size.clamp(i32::from(MIN_FONT_SIZE), i32::from(MAX_FONT_SIZE));
        self.font_size = clamped as u8;
        self
    }

    /// Clamps to [1, 3] and snaps to the nearest half step. Non-finite input
    /// is ignored.
    pub fn set_spacing(mut self, spacing: f32) -> Self {
        if !spacing.is_finite() {
            warn!("Ignoring non-finite spacing value");
            return self;
        }
        let clamped = spacing.clamp(MIN_SPACING, MAX_SPACING);
        self.spacing = (clamped / SPACING_STEP).round() * SPACING_STEP;
        self
    }
}

/// One change from the customization panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CustomizationAction {
    SetColorScheme { name: String },
    SetFontFamily { family: FontFamily },
    SetFontSize { size: i32 },
    SetSpacing { spacing: f32 },
}

pub fn apply_customization(
    options: CustomizationOptions,
    action: CustomizationAction,
) -> CustomizationOptions {
    match action {
        CustomizationAction::SetColorScheme { name } => options.set_color_scheme(&name),
        CustomizationAction::SetFontFamily { family } => options.set_font_family(family),
        CustomizationAction::SetFontSize { size } => options.set_font_size(size),
        CustomizationAction::SetSpacing { spacing } => options.set_spacing(spacing),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Derived style
// ────────────────────────────────────────────────────────────────────────────

/// (offset, floor) per display tier: name, title, section, body, small, micro.
const FONT_LADDER: [(i32, i32); 6] = [(4, 18), (2, 14), (0, 12), (-2, 10), (-3, 9), (-4, 8)];

/// Spacing coefficients per tier: section, subsection, item, element.
const SPACING_COEFFICIENTS: [f32; 4] = [0.5, 0.3, 0.2, 0.1];

const LINE_HEIGHT: f32 = 1.3;
const LETTER_SPACING: &str = "0.02em";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizes {
    pub name: u8,
    pub title: u8,
    pub section: u8,
    pub body: u8,
    pub small: u8,
    pub micro: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingUnits {
    pub section: f32,
    pub subsection: f32,
    pub item: f32,
    pub element: f32,
}

/// Accent color with an 8-bit alpha suffix, as used for borders and fills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccentTints {
    pub header_border: String,
    pub tag_border: String,
    pub connector: String,
    pub tag_background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStyle {
    pub accent_color: String,
    /// Display name of the selected scheme, e.g. "Professional Blue".
    pub scheme_label: String,
    pub tints: AccentTints,
    pub font_family_css: String,
    pub fonts: FontSizes,
    pub spacing: SpacingUnits,
    pub line_height: f32,
    pub letter_spacing: String,
}

pub fn font_sizes(base: u8) -> FontSizes {
    let base = i32::from(base);
    let [name, title, section, body, small, micro] =
        FONT_LADDER.map(|(offset, floor)| (base + offset).max(floor) as u8);
    FontSizes {
        name,
        title,
        section,
        body,
        small,
        micro,
    }
}

pub fn spacing_units(spacing: f32) -> SpacingUnits {
    let [section, subsection, item, element] = SPACING_COEFFICIENTS.map(|c| spacing * c);
    SpacingUnits {
        section,
        subsection,
        item,
        element,
    }
}

/// Resolves options into the style payload consumed by rendering.
pub fn resolve(options: &CustomizationOptions) -> DerivedStyle {
    let accent = options.accent_color.as_str();
    DerivedStyle {
        accent_color: accent.to_string(),
        scheme_label: options.color_scheme.label().to_string(),
        tints: AccentTints {
            header_border: format!("{accent}30"),
            tag_border: format!("{accent}40"),
            connector: format!("{accent}20"),
            tag_background: format!("{accent}08"),
        },
        font_family_css: options.font_family.css_stack().to_string(),
        fonts: font_sizes(options.font_size),
        spacing: spacing_units(options.spacing),
        line_height: LINE_HEIGHT,
        letter_spacing: LETTER_SPACING.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
