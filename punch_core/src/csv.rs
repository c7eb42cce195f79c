//! # Press Wire Format
//!
//! Serialises a [`Layout`] into the single-line CSV record the press brake
//! consumes verbatim, and reads such a line back for verification.
//!
//! ```text
//! csvCOMPONENT,<code>,<part>,<BEARER|JOIST>,NORMAL,<qty>,<len>,0,0,<len>,0,50[,<station>,<pos>]*
//! ```
//!
//! No header row, no trailing newline. Punches are merged across all five
//! lists, sorted by position (ties keep flange-before-web order), and
//! corner brackets emit under the shared `SERVICE` station.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::errors::{PlanError, PlanResult};
use crate::layout::Layout;
use crate::units::HalfMm;

/// Number of fixed fields before the station/position pairs begin.
const HEADER_FIELDS: usize = 12;

/// Fallback member length when a layout carries no geometry (a manual
/// layout installed without a prior computed spec).
const FALLBACK_LENGTH_MM: f64 = 5200.0;

/// Per-export metadata supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvMeta {
    /// Part code, e.g. `B_5200_J600_S1200`. Its leading letter selects the
    /// component code and member label.
    pub part_code: String,
    /// Number of identical members to run
    pub qty: u32,
}

impl CsvMeta {
    pub fn new(part_code: impl Into<String>, qty: u32) -> Self {
        CsvMeta {
            part_code: part_code.into(),
            qty,
        }
    }

    fn is_bearer(&self) -> bool {
        self.part_code.starts_with('B')
    }
}

/// Encode a layout as one press CSV line.
///
/// Never fails on a legal layout; inactive punches are skipped.
pub fn encode_csv(layout: &Layout, meta: &CsvMeta) -> String {
    let component_code = if meta.is_bearer() { "B1-1" } else { "J1-1" };
    let member_label = if meta.is_bearer() { "BEARER" } else { "JOIST" };

    let length = layout.length_mod_mm + layout.end_exclusion_mm;
    let length = if length > 0.0 { length } else { FALLBACK_LENGTH_MM };
    let length = HalfMm::from_mm(length);

    let mut line = format!(
        "csvCOMPONENT,{},{},{},NORMAL,{},{},0,0,{},0,50",
        component_code, meta.part_code, member_label, meta.qty, length, length
    );

    let mut punches: Vec<_> = layout.active_punches().collect();
    // Stable: equal positions keep the flange-before-web iteration order
    punches.sort_by_key(|p| p.position);

    for punch in punches {
        let _ = write!(
            line,
            ",{},{}",
            punch.kind.emit_station_name(),
            punch.position
        );
    }
    line
}

/// Parse the station/position pairs back out of a press CSV line.
///
/// Returns `(station, position_mm)` in line order. Used to verify a program
/// against the layout it was emitted from; the corner-bracket aliasing is
/// already applied on the wire, so those hits come back as `SERVICE`.
pub fn decode_punches(line: &str) -> PlanResult<Vec<(String, f64)>> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
    if fields.first() != Some(&"csvCOMPONENT") {
        return Err(PlanError::wire_format(0, "missing csvCOMPONENT prefix"));
    }
    if fields.len() < HEADER_FIELDS {
        return Err(PlanError::wire_format(
            fields.len(),
            "truncated header record",
        ));
    }
    let pairs = &fields[HEADER_FIELDS..];
    if pairs.len() % 2 != 0 {
        return Err(PlanError::wire_format(
            fields.len(),
            "dangling station without a position",
        ));
    }

    let mut punches = Vec::with_capacity(pairs.len() / 2);
    for (i, pair) in pairs.chunks(2).enumerate() {
        let position: f64 = pair[1].parse().map_err(|_| {
            PlanError::wire_format(
                HEADER_FIELDS + 2 * i + 1,
                format!("'{}' is not a position", pair[1]),
            )
        })?;
        punches.push((pair[0].to_string(), position));
    }
    Ok(punches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PunchKind;
    use crate::layout::Punch;

    fn sample_layout() -> Layout {
        let mut layout = Layout {
            length_mm: 5200.0,
            end_exclusion_mm: 800.0,
            length_mod_mm: 4400.0,
            ..Layout::default()
        };
        layout.push(PunchKind::BoltHole, 30.0);
        layout.push(PunchKind::BoltHole, 5170.0);
        layout.push(PunchKind::Dimple, 479.5);
        layout.push(PunchKind::WebTab, 600.0);
        layout.push(PunchKind::CornerBrackets, 131.0);
        layout
    }

    #[test]
    fn test_header_shape() {
        let line = encode_csv(&sample_layout(), &CsvMeta::new("B_5200_J600_S1200", 2));
        assert!(line.starts_with(
            "csvCOMPONENT,B1-1,B_5200_J600_S1200,BEARER,NORMAL,2,5200,0,0,5200,0,50,"
        ));
        assert!(!line.ends_with('\n'));
    }

    #[test]
    fn test_punches_sorted_and_aliased() {
        let line = encode_csv(&sample_layout(), &CsvMeta::new("B_5200_J600_S1200", 1));
        let tail: Vec<&str> = line.split(',').skip(12).collect();
        assert_eq!(
            tail,
            vec![
                "BOLT HOLE", "30", "SERVICE", "131", "DIMPLE", "479.5", "WEB TAB", "600",
                "BOLT HOLE", "5170"
            ]
        );
    }

    #[test]
    fn test_joist_component_code() {
        let line = encode_csv(&sample_layout(), &CsvMeta::new("J_6000_S600", 1));
        assert!(line.starts_with("csvCOMPONENT,J1-1,J_6000_S600,JOIST,"));
    }

    #[test]
    fn test_inactive_punches_skipped() {
        let mut layout = sample_layout();
        layout.push_manual(Punch {
            position: crate::units::HalfMm::from_mm(900.0),
            kind: PunchKind::WebTab,
            active: false,
        });
        let line = encode_csv(&layout, &CsvMeta::new("B_5200_J600_S1200", 1));
        assert!(!line.contains(",900"));
    }

    #[test]
    fn test_fallback_length() {
        let layout = Layout::default();
        let line = encode_csv(&layout, &CsvMeta::new("B_TEST", 1));
        assert!(line.contains(",5200,0,0,5200,0,50"));
    }

    #[test]
    fn test_tie_break_flange_first() {
        let mut layout = sample_layout();
        layout.push(PunchKind::BoltHole, 600.0);
        let line = encode_csv(&layout, &CsvMeta::new("B_5200_J600_S1200", 1));
        let bolt = line.find("BOLT HOLE,600").unwrap();
        let tab = line.find("WEB TAB,600").unwrap();
        assert!(bolt < tab);
    }

    #[test]
    fn test_decode_roundtrip() {
        let layout = sample_layout();
        let line = encode_csv(&layout, &CsvMeta::new("B_5200_J600_S1200", 2));
        let decoded = decode_punches(&line).unwrap();
        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded[0], ("BOLT HOLE".to_string(), 30.0));
        assert_eq!(decoded[1], ("SERVICE".to_string(), 131.0));
        assert_eq!(decoded[2], ("DIMPLE".to_string(), 479.5));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_punches("not,a,program").is_err());
        assert!(decode_punches("csvCOMPONENT,B1-1,P,BEARER,NORMAL,1,5200,0,0,5200,0,50,BOLT HOLE")
            .is_err());
        assert!(decode_punches(
            "csvCOMPONENT,B1-1,P,BEARER,NORMAL,1,5200,0,0,5200,0,50,BOLT HOLE,abc"
        )
        .is_err());
    }
}
