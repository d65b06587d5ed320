use crate::error::FormatError;

/// Whether numbers are printed in scientific notation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SciMode {
    /// Decided per tensor from its values.
    #[default]
    Auto,
    /// Always fixed point.
    Never,
    /// Always scientific.
    Always,
}

impl SciMode {
    /// The forced decision, `None` for [`SciMode::Auto`].
    pub fn as_override(self) -> Option<bool> {
        match self {
            SciMode::Auto => None,
            SciMode::Never => Some(false),
            SciMode::Always => Some(true),
        }
    }
}

impl TryFrom<u8> for SciMode {
    type Error = FormatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SciMode::Auto),
            1 => Ok(SciMode::Never),
            2 => Ok(SciMode::Always),
            other => Err(FormatError::InvalidSciMode(other)),
        }
    }
}

impl From<SciMode> for u8 {
    fn from(mode: SciMode) -> Self {
        match mode {
            SciMode::Auto => 0,
            SciMode::Never => 1,
            SciMode::Always => 2,
        }
    }
}

/// Largest `precision` [`PrintOptions::validate`] accepts.
pub const MAX_PRECISION: u32 = 60;

/// Options governing every decision of one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrintOptions {
    /// Digits after the decimal point.
    pub precision: u32,
    /// Tensors with more elements than this are summarized.
    pub threshold: i64,
    /// Leading and trailing items kept per axis when summarizing.
    pub edgeitems: i64,
    /// Characters per line before a row wraps.
    pub linewidth: i64,
    /// Scientific notation policy.
    pub sci_mode: SciMode,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            precision: 4,
            threshold: 1000,
            edgeitems: 3,
            linewidth: 80,
            sci_mode: SciMode::Auto,
        }
    }
}

impl PrintOptions {
    /// A named preset: `default`, `short` or `full`.
    ///
    /// `short` prints two decimals and two edge items, `full` never summarizes.
    pub fn profile(name: &str) -> Result<Self, FormatError> {
        match name {
            "default" => Ok(Self::default()),
            "short" => Ok(Self {
                precision: 2,
                edgeitems: 2,
                ..Self::default()
            }),
            "full" => Ok(Self {
                threshold: i64::MAX,
                ..Self::default()
            }),
            other => Err(FormatError::UnknownProfile(other.to_string())),
        }
    }

    /// Checks the numeric ranges of the options.
    ///
    /// `edgeitems` must be non-negative and `precision` at most [`MAX_PRECISION`].
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.edgeitems < 0 {
            return Err(FormatError::InvalidOption {
                name: "edgeitems",
                reason: format!("must be non-negative, got {}", self.edgeitems),
            });
        }
        if self.precision > MAX_PRECISION {
            return Err(FormatError::InvalidOption {
                name: "precision",
                reason: format!("must be at most {MAX_PRECISION}, got {}", self.precision),
            });
        }
        Ok(())
    }

    /// Whether a tensor with `numel` elements gets summarized.
    pub fn summarizes(&self, numel: usize) -> bool {
        i64::try_from(numel).map_or(true, |n| n > self.threshold)
    }

    /// Edge items as a count. Negative values are rejected by [`PrintOptions::validate`].
    pub(crate) fn edge_items(&self) -> usize {
        usize::try_from(self.edgeitems).unwrap_or(0)
    }
}
