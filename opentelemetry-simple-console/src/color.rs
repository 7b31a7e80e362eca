//! Console colors and the severity color policy.
use crate::error::ConfigError;
use crate::severity::CanonicalSeverity;

/// A console color from the classic 16-color palette.
///
/// `Default` stands for whatever color the terminal uses when nothing
/// has been set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[allow(missing_docs)]
pub enum Color {
    #[default]
    Default,
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    DarkMagenta,
    DarkYellow,
    Gray,
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}

/// Foreground and background used for one severity tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ColorPair {
    /// Text color.
    pub foreground: Color,
    /// Cell color behind the text.
    pub background: Color,
}

impl ColorPair {
    /// Creates a new pair.
    pub const fn new(foreground: Color, background: Color) -> Self {
        ColorPair {
            foreground,
            background,
        }
    }
}

/// Severity to color lookup table.
///
/// Every [`CanonicalSeverity`] has an entry; a policy with gaps cannot be
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPolicy {
    pairs: [ColorPair; CanonicalSeverity::ALL.len()],
}

impl Default for ColorPolicy {
    fn default() -> Self {
        use Color::*;
        ColorPolicy {
            pairs: [
                ColorPair::new(Gray, Black),
                ColorPair::new(Gray, Black),
                ColorPair::new(DarkGreen, Black),
                ColorPair::new(Yellow, Black),
                ColorPair::new(Black, DarkRed),
                ColorPair::new(White, DarkRed),
                ColorPair::new(Gray, Black),
            ],
        }
    }
}

impl ColorPolicy {
    /// Builds a policy from explicit entries.
    ///
    /// Later entries for the same severity replace earlier ones. Fails with
    /// [`ConfigError::MisconfiguredColorPolicy`] naming the first severity
    /// left without a color.
    pub fn from_entries<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (CanonicalSeverity, ColorPair)>,
    {
        let mut slots: [Option<ColorPair>; CanonicalSeverity::ALL.len()] = Default::default();
        for (severity, pair) in entries {
            slots[severity.index()] = Some(pair);
        }

        let mut pairs = [ColorPair::new(Color::Default, Color::Default); CanonicalSeverity::ALL.len()];
        for severity in CanonicalSeverity::ALL {
            pairs[severity.index()] = slots[severity.index()]
                .ok_or(ConfigError::MisconfiguredColorPolicy(severity))?;
        }
        Ok(ColorPolicy { pairs })
    }

    /// Colors used for the given severity.
    pub fn colors_for(&self, severity: CanonicalSeverity) -> ColorPair {
        self.pairs[severity.index()]
    }
}
