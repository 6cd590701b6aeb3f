use std::fmt;

use crate::error::InterpretError;

/// Width of the risk zone inside a reference band, as a fraction of the
/// band width.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RiskMargin(f64);

impl RiskMargin {
    pub const DEFAULT: RiskMargin = RiskMargin(0.10);
    pub const MAX: f64 = 0.5;

    pub fn new(fraction: f64) -> Result<Self, InterpretError> {
        if fraction.is_finite() && (0.0..=Self::MAX).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(InterpretError::InvalidRiskMargin(fraction))
        }
    }

    pub fn fraction(self) -> f64 {
        self.0
    }
}

impl Default for RiskMargin {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RiskMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0 * 100.0)
    }
}
