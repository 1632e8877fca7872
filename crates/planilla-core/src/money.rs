//! # Money Module
//!
//! Rates in basis points and the few amount helpers the engine needs.
//!
//! ## Why f64 Soles?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AMOUNTS IN THIS ENGINE ARE f64 SOLES, NOT INTEGER CÉNTIMOS             │
//! │                                                                         │
//! │  The CCD plan is written in fractional soles:                           │
//! │    • tier cut points sit at 1,999.99 / 4,999.99 / ...                   │
//! │    • a marginal slice can be worth less than one céntimo                │
//! │      (RR = 2,000.00 → tier-2 commission = 0.10 × 0.01 = S/ 0.001)       │
//! │    • NETO = BRUTO / 1.18 rarely lands on a céntimo                      │
//! │                                                                         │
//! │  Those values are part of the plan and must survive intermediate        │
//! │  steps unrounded. Rounding happens once, at the reporting edge,         │
//! │  via round_centimos().                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use planilla_core::money::{neto_from_bruto, round_centimos, Rate};
//!
//! // 18% IGV expressed in basis points
//! let igv = Rate::from_bps(1800);
//!
//! // Strip tax from a gross collection
//! let neto = neto_from_bruto(650.0, igv);
//! assert_eq!(round_centimos(neto), 550.85);
//!
//! // Apply a 10% marginal rate to a tier slice
//! let tier_rate = Rate::from_bps(1000);
//! assert_eq!(tier_rate.apply(3000.0), 300.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Rate Type
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (IGV), 4500 bps = 45% (payout cap)
///
/// Storing rates as integers keeps the policy tables exact and comparable;
/// the conversion to a fraction happens once, inside [`Rate::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (0.18 for 18%).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Applies the rate to an amount.
    ///
    /// ## Example
    /// ```rust
    /// use planilla_core::money::Rate;
    ///
    /// let cap = Rate::from_bps(4500); // 45%
    /// assert_eq!(cap.apply(4094.18), 4094.18 * 0.45);
    /// ```
    #[inline]
    pub fn apply(&self, amount: f64) -> f64 {
        amount * self.fraction()
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// Display as a percentage, the way the plan documents read.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Amount Helpers
// =============================================================================

/// Strips tax-inclusive IGV from a gross amount.
///
/// ## Formula
/// `NETO = BRUTO / (1 + igv)`. With the standard 18% rate this is the
/// plan's `BRUTO / 1.18`.
///
/// ## Example
/// ```rust
/// use planilla_core::money::{neto_from_bruto, Rate};
///
/// let neto = neto_from_bruto(1180.0, Rate::from_bps(1800));
/// assert!((neto - 1000.0).abs() < 1e-9);
/// ```
#[inline]
pub fn neto_from_bruto(bruto: f64, igv: Rate) -> f64 {
    bruto / (1.0 + igv.fraction())
}

/// Rounds an amount to céntimos (2 decimals), half away from zero.
///
/// Used only at reporting edges. Intermediate engine math stays unrounded
/// so that marginal slices below one céntimo survive.
///
/// ## Example
/// ```rust
/// use planilla_core::money::round_centimos;
///
/// assert_eq!(round_centimos(209.41899999), 209.42);
/// assert_eq!(round_centimos(-0.005), -0.01);
/// ```
#[inline]
pub fn round_centimos(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================
