//! Averaging modes

use bayes_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which weighted average to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    /// Inverse-variance weighted mean; ignores the scatter of the data
    Standard,
    /// Inverse-variance mean with the uncertainty inflated by the Birge ratio
    Birge,
    /// Marginal over the true uncertainty with a Jeffreys `1/sigma'` prior
    #[default]
    Jeffreys,
    /// Marginal with Sivia's normalizable `sigma/sigma'^2` prior
    Conservative,
}

impl Mode {
    /// Every mode, in declaration order
    pub const ALL: [Mode; 4] = [Mode::Standard, Mode::Birge, Mode::Jeffreys, Mode::Conservative];

    /// Short name accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Birge => "birge",
            Self::Jeffreys => "jeffreys",
            Self::Conservative => "cons",
        }
    }

    /// Human-readable label used in summaries
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Birge => "Birge-corrected",
            Self::Jeffreys => "Jeffreys'",
            Self::Conservative => "Conservative",
        }
    }

    /// Whether the estimate comes from maximizing a marginal likelihood
    pub fn is_marginal(&self) -> bool {
        matches!(self, Self::Jeffreys | Self::Conservative)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "birge" => Ok(Self::Birge),
            "jeffreys" => Ok(Self::Jeffreys),
            "cons" | "conservative" => Ok(Self::Conservative),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}
