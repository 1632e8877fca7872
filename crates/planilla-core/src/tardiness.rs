//! # Tardiness Classifier
//!
//! Maps an arrival time to a discount/compensation bracket.
//!
//! ## Two-Layer Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Classification vs. Applied Discount                    │
//! │                                                                         │
//! │  Arrival "09:42" ──► classify ──► TardyDiscount {                       │
//! │                                     category: range_2,   ◄── layer 1    │
//! │                                     discount: S/ 20,         (audit)    │
//! │                                     compensation: 60 min,               │
//! │                                     is_justified,        ◄── layer 2    │
//! │                                     compensation_completed (payroll)    │
//! │                                   }                                     │
//! │                                                                         │
//! │  applied_discount() = 0 when justified or compensated;                  │
//! │  the category NEVER changes. Reports always show the bracket,           │
//! │  payroll only charges what survived the overrides.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use planilla_core::policy::TardinessPolicy;
//! use planilla_core::tardiness::{classify_arrival, TardyCategory};
//!
//! let policy = TardinessPolicy::default();
//!
//! let event = classify_arrival(Some("09:15"), &policy).unwrap();
//! assert_eq!(event.category, TardyCategory::Range1);
//! assert_eq!(event.applied_discount(), 10.0);
//!
//! // No punch recorded: treated as on time, zero discount
//! let event = classify_arrival(None, &policy).unwrap();
//! assert_eq!(event.category, TardyCategory::OnTime);
//! ```

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::policy::{TardinessPolicy, TardyBracket};

// =============================================================================
// Tardy Category
// =============================================================================

/// The four arrival brackets of the attendance regulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TardyCategory {
    /// Arrival within tolerance of the scheduled start.
    #[serde(rename = "on_time")]
    OnTime,
    /// First discount bracket.
    #[serde(rename = "range_1")]
    Range1,
    /// Second discount bracket.
    #[serde(rename = "range_2")]
    Range2,
    /// Open-ended last bracket.
    #[serde(rename = "range_3")]
    Range3,
}

// =============================================================================
// Tardy Discount
// =============================================================================

/// One classified tardiness event.
///
/// The bracket fields (`category`, `discount`, `compensation_minutes`) are
/// frozen at classification time for the audit trail. The override flags
/// only affect [`TardyDiscount::applied_discount`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TardyDiscount {
    /// Bracket the arrival fell into.
    pub category: TardyCategory,

    /// Parsed arrival time; `None` when no punch was recorded.
    #[ts(as = "Option<String>")]
    pub arrival_time: Option<NaiveTime>,

    /// Bracket discount (S/), before overrides.
    pub discount: f64,

    /// Compensation work required to lift the discount (minutes).
    pub compensation_minutes: u32,

    /// A supervisor justified the tardiness.
    pub is_justified: bool,

    /// The employee completed the compensation minutes.
    pub compensation_completed: bool,
}

impl TardyDiscount {
    /// The discount payroll actually charges.
    ///
    /// Zero when the event was justified or compensated; the stored
    /// bracket stays untouched either way.
    #[inline]
    pub fn applied_discount(&self) -> f64 {
        if self.is_justified || self.compensation_completed {
            0.0
        } else {
            self.discount
        }
    }

    /// Whether this event still carries a charge.
    #[inline]
    pub fn is_chargeable(&self) -> bool {
        self.applied_discount() > 0.0
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Finds the bracket for an arrival expressed in minutes since midnight.
///
/// Walks the ordered bracket table; each bound is inclusive
/// (`scheduled start + max_minutes_late`). Arrivals before the scheduled
/// start land in the first bracket. The open last bracket catches
/// everything else.
pub fn classify_minutes(arrival_minutes: u32, policy: &TardinessPolicy) -> &TardyBracket {
    let start = policy.scheduled_start_minutes;
    for bracket in &policy.brackets {
        match bracket.max_minutes_late {
            Some(tolerance) if arrival_minutes <= start + tolerance => return bracket,
            Some(_) => continue,
            None => return bracket,
        }
    }
    // A validated policy ends with an open bracket, so the loop always
    // returns. Only an unvalidated empty table can reach this point.
    policy
        .brackets
        .last()
        .expect("tardiness policy has at least one bracket")
}

/// Parses an `HH:MM` arrival time.
pub fn parse_arrival(raw: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| ValidationError::InvalidFormat {
        field: "arrival_time".to_string(),
        reason: "expected HH:MM".to_string(),
    })
}

/// Classifies a raw arrival into a [`TardyDiscount`].
///
/// ## Missing Arrival
/// `None` or an empty/blank string classifies as the first bracket with no
/// discount. A missing punch never generates a payroll charge; detecting
/// unrecorded arrivals is upstream attendance validation's job.
///
/// ## Errors
/// A non-empty string that does not parse as `HH:MM` is malformed input
/// and returns [`ValidationError::InvalidFormat`]; the classifier is total
/// over everything else.
pub fn classify_arrival(
    arrival: Option<&str>,
    policy: &TardinessPolicy,
) -> Result<TardyDiscount, ValidationError> {
    let raw = arrival.map(str::trim).filter(|s| !s.is_empty());

    let (time, bracket) = match raw {
        None => (
            None,
            policy
                .brackets
                .first()
                .expect("tardiness policy has at least one bracket"),
        ),
        Some(raw) => {
            let time = parse_arrival(raw)?;
            let minutes = time.hour() * 60 + time.minute();
            (Some(time), classify_minutes(minutes, policy))
        }
    };

    Ok(TardyDiscount {
        category: bracket.category,
        arrival_time: time,
        discount: bracket.discount,
        compensation_minutes: bracket.compensation_minutes,
        is_justified: false,
        compensation_completed: false,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
