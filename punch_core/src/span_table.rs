//! # Span-Table Advisor
//!
//! Maps `(span length, kPa rating)` to the recommended profile variant and
//! joist spacing. The tables are engineering data, not logic: they are
//! encoded as ordered rows and scanned top to bottom, first match wins,
//! exactly as published.
//!
//! Note the 2.5 kPa table is deliberately non-monotonic across variants:
//! the `JoistSingle ≤ 9550` row precedes `JoistBox ≤ 9100`, so Single rows
//! are exhausted before any Box row is consulted. Do not "fix" the ordering;
//! it is part of the published contract.
//!
//! Bearers consult the same tables using the span of the joists they carry;
//! only the returned spacing applies to a bearer.
//!
//! ## Example
//!
//! ```rust
//! use punch_core::span_table::advise;
//! use punch_core::profile::{KpaRating, ProfileVariant};
//!
//! let advice = advise(6000.0, KpaRating::Kpa2_5);
//! assert_eq!(advice.variant, ProfileVariant::JoistSingle);
//! assert_eq!(advice.joist_spacing_mm, 600);
//! assert!(!advice.exceeds_limit);
//! ```

use serde::{Deserialize, Serialize};

use crate::profile::{KpaRating, ProfileVariant};

/// One row of a span table: spans up to `limit_mm` get this variant/spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanRow {
    pub limit_mm: f64,
    pub variant: ProfileVariant,
    pub joist_spacing_mm: u32,
}

const fn row(limit_mm: f64, variant: ProfileVariant, joist_spacing_mm: u32) -> SpanRow {
    SpanRow {
        limit_mm,
        variant,
        joist_spacing_mm,
    }
}

/// 2.5 kPa table. Ordering is load-bearing (see module docs).
pub const ROWS_2_5_KPA: [SpanRow; 8] = [
    row(6800.0, ProfileVariant::JoistSingle, 600),
    row(7600.0, ProfileVariant::JoistSingle, 500),
    row(8600.0, ProfileVariant::JoistSingle, 400),
    row(9550.0, ProfileVariant::JoistSingle, 300),
    row(9100.0, ProfileVariant::JoistBox, 600),
    row(9750.0, ProfileVariant::JoistBox, 500),
    row(10600.0, ProfileVariant::JoistBox, 400),
    row(11750.0, ProfileVariant::JoistBox, 300),
];

/// 5.0 kPa table.
pub const ROWS_5_0_KPA: [SpanRow; 7] = [
    row(4500.0, ProfileVariant::JoistSingle, 600),
    row(5100.0, ProfileVariant::JoistSingle, 500),
    row(5850.0, ProfileVariant::JoistSingle, 400),
    row(7000.0, ProfileVariant::JoistSingle, 300),
    row(7700.0, ProfileVariant::JoistBox, 500),
    row(8350.0, ProfileVariant::JoistBox, 400),
    row(9300.0, ProfileVariant::JoistBox, 300),
];

/// Advisor output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanAdvice {
    pub variant: ProfileVariant,
    pub joist_spacing_mm: u32,
    /// The span exceeds the last table row; the returned variant/spacing is
    /// the strongest available and the member needs engineering review.
    pub exceeds_limit: bool,
    /// The limit of the row that matched (the rating's span limit when
    /// `exceeds_limit`)
    pub limit_mm: f64,
}

/// Look up the recommended variant and joist spacing for a span.
pub fn advise(length_mm: f64, rating: KpaRating) -> SpanAdvice {
    let table: &[SpanRow] = match rating {
        KpaRating::Kpa2_5 => &ROWS_2_5_KPA,
        KpaRating::Kpa5_0 => &ROWS_5_0_KPA,
    };

    for row in table {
        if length_mm <= row.limit_mm {
            return SpanAdvice {
                variant: row.variant,
                joist_spacing_mm: row.joist_spacing_mm,
                exceeds_limit: false,
                limit_mm: row.limit_mm,
            };
        }
    }

    // Past the table: strongest row, flagged
    let last = table[table.len() - 1];
    SpanAdvice {
        variant: last.variant,
        joist_spacing_mm: last.joist_spacing_mm,
        exceeds_limit: true,
        limit_mm: rating.span_limit_mm(),
    }
}
