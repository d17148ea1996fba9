//! Blend mode enumeration.
//!
//! 29 modes in three families:
//!
//! | Family | Modes |
//! |--------|-------|
//! | Porter-Duff | Clear, Source, Destination, SourceOver, DestinationOver, SourceIn, DestinationIn, SourceOut, DestinationOut, SourceAtop, DestinationAtop, Xor, Plus, Modulate |
//! | Separable | Multiply, Screen, Overlay, Darken, Lighten, ColorDodge, ColorBurn, HardLight, SoftLight, Difference, Exclusion |
//! | Non-separable | Hue, Saturation, Color, Luminosity |
//!
//! Modes print and parse as kebab-case names, so they can be stored in
//! scene descriptions and settings:
//!
//! ```rust
//! use blit_ops::BlendMode;
//!
//! let mode: BlendMode = "color-dodge".parse().unwrap();
//! assert_eq!(mode, BlendMode::ColorDodge);
//! assert_eq!(mode.to_string(), "color-dodge");
//! assert_eq!(BlendMode::from_index(200), BlendMode::SourceOver);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::OpsError;

/// Blend mode for compositing a source pixel onto a destination pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum BlendMode {
    /// Both operands discarded.
    Clear = 0,
    /// Source replaces destination.
    Source,
    /// Destination kept.
    Destination,
    /// Source over destination (normal alpha compositing).
    #[default]
    SourceOver,
    /// Destination over source.
    DestinationOver,
    /// Source where destination is opaque.
    SourceIn,
    /// Destination where source is opaque.
    DestinationIn,
    /// Source where destination is transparent.
    SourceOut,
    /// Destination where source is transparent.
    DestinationOut,
    /// Source on top of destination, keeping destination alpha.
    SourceAtop,
    /// Destination on top of source, keeping source alpha.
    DestinationAtop,
    /// Non-overlapping parts of both.
    Xor,
    /// Saturating sum.
    Plus,
    /// Channel-wise product, alpha included.
    Modulate,
    /// Darken by multiplication.
    Multiply,
    /// Lighten by inverse multiplication.
    Screen,
    /// Multiply or screen depending on destination.
    Overlay,
    /// Minimum per channel.
    Darken,
    /// Maximum per channel.
    Lighten,
    /// Brighten destination by dividing by inverted source.
    ColorDodge,
    /// Darken destination by dividing inverted destination by source.
    ColorBurn,
    /// Multiply or screen depending on source.
    HardLight,
    /// Soft version of hard light.
    SoftLight,
    /// Absolute difference.
    Difference,
    /// Lower-contrast difference.
    Exclusion,
    /// Source hue with destination saturation and luminosity.
    Hue,
    /// Source saturation with destination hue and luminosity.
    Saturation,
    /// Source hue and saturation with destination luminosity.
    Color,
    /// Source luminosity with destination hue and saturation.
    Luminosity,
}

/// Grouping of blend modes by how they combine channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFamily {
    /// Closed-form premultiplied compositing operators.
    PorterDuff,
    /// Per-channel functions on unpremultiplied color.
    Separable,
    /// Whole-color functions built on luminance and saturation.
    NonSeparable,
}

impl BlendMode {
    /// Number of modes.
    pub const COUNT: usize = 29;

    /// Every mode, in declaration order.
    pub const ALL: [BlendMode; Self::COUNT] = [
        Self::Clear,
        Self::Source,
        Self::Destination,
        Self::SourceOver,
        Self::DestinationOver,
        Self::SourceIn,
        Self::DestinationIn,
        Self::SourceOut,
        Self::DestinationOut,
        Self::SourceAtop,
        Self::DestinationAtop,
        Self::Xor,
        Self::Plus,
        Self::Modulate,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
        Self::Hue,
        Self::Saturation,
        Self::Color,
        Self::Luminosity,
    ];

    /// Mode for a raw ordinal. Out-of-range values resolve to
    /// [`BlendMode::SourceOver`].
    #[inline]
    pub fn from_index(index: u8) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(Self::SourceOver)
    }

    /// Ordinal of this mode.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Family this mode belongs to.
    pub fn family(self) -> BlendFamily {
        match self {
            Self::Clear
            | Self::Source
            | Self::Destination
            | Self::SourceOver
            | Self::DestinationOver
            | Self::SourceIn
            | Self::DestinationIn
            | Self::SourceOut
            | Self::DestinationOut
            | Self::SourceAtop
            | Self::DestinationAtop
            | Self::Xor
            | Self::Plus
            | Self::Modulate => BlendFamily::PorterDuff,
            Self::Multiply
            | Self::Screen
            | Self::Overlay
            | Self::Darken
            | Self::Lighten
            | Self::ColorDodge
            | Self::ColorBurn
            | Self::HardLight
            | Self::SoftLight
            | Self::Difference
            | Self::Exclusion => BlendFamily::Separable,
            Self::Hue | Self::Saturation | Self::Color | Self::Luminosity => {
                BlendFamily::NonSeparable
            }
        }
    }

    /// Returns `true` if a 16-lane kernel exists for this mode.
    pub fn has_batch_form(self) -> bool {
        crate::batch::batch_blend_func(self).is_some()
    }

    /// Kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Source => "source",
            Self::Destination => "destination",
            Self::SourceOver => "source-over",
            Self::DestinationOver => "destination-over",
            Self::SourceIn => "source-in",
            Self::DestinationIn => "destination-in",
            Self::SourceOut => "source-out",
            Self::DestinationOut => "destination-out",
            Self::SourceAtop => "source-atop",
            Self::DestinationAtop => "destination-atop",
            Self::Xor => "xor",
            Self::Plus => "plus",
            Self::Modulate => "modulate",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| OpsError::UnknownBlendMode(s.to_string()))
    }
}
