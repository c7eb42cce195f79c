//! # Punch Catalogue & Manufacturing Rules
//!
//! Immutable registry of punch stations (hit codes, shapes, die geometry) and
//! the numeric constants the layout and clash rules are specified against.
//!
//! ## Punch Stations
//!
//! | Station | Hit code | Shape | Nominal size |
//! |---------|----------|-------|--------------|
//! | Bolt hole | .1 | square | 11 × 11 |
//! | Dimple | .2 | round | Ø5 |
//! | Web tab | .3 | rectangular | 45 × 70 |
//! | Service (stub / corner bracket) | .4 | rectangular | 115 × 300 |
//! | Small service hole | .5 | round | Ø115 |
//! | M service hole | .6 | round | Ø200 |
//! | Large service hole | .7 | oval | 400 × 200 |
//!
//! Corner brackets share the `.4` service die and alias to `SERVICE` when a
//! program is emitted.
//!
//! The values in [`rules`] have visible manufacturing consequences and must
//! not be "tidied up"; the press tooling and the clash rules are calibrated
//! against them exactly.

use serde::{Deserialize, Serialize};

/// Geometric family of a punch die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Square,
    Round,
    Rectangular,
    Oval,
}

/// Which face of the C-section a punch lands on.
///
/// Flange punches (bolts, dimples) and web-face punches (tabs, service holes,
/// stubs) can never physically collide; keeping the plane in the model lets
/// the clash detector skip cross-plane pairs outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plane {
    Flange,
    WebFace,
}

/// The closed set of punch stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PunchKind {
    /// 11 × 11 square bolt hole (flange)
    BoltHole,
    /// Ø5 reinforcement stitch (flange)
    Dimple,
    /// 45 × 70 slot for joist fixing (web)
    WebTab,
    /// 115 × 300 stub-column cut (web)
    Service,
    /// Ø115 utility aperture (web)
    SmallServiceHole,
    /// Ø200 utility aperture (web)
    MServiceHole,
    /// 400 × 200 oval utility aperture (web)
    LargeServiceHole,
    /// Corner bracket, punched with the same die as [`PunchKind::Service`]
    CornerBrackets,
}

impl PunchKind {
    /// All stations, in hit-code order (corner brackets last as the alias)
    pub const ALL: [PunchKind; 8] = [
        PunchKind::BoltHole,
        PunchKind::Dimple,
        PunchKind::WebTab,
        PunchKind::Service,
        PunchKind::SmallServiceHole,
        PunchKind::MServiceHole,
        PunchKind::LargeServiceHole,
        PunchKind::CornerBrackets,
    ];

    /// Single-digit hit code identifying the station to the press
    pub fn hit_code(&self) -> &'static str {
        match self {
            PunchKind::BoltHole => ".1",
            PunchKind::Dimple => ".2",
            PunchKind::WebTab => ".3",
            PunchKind::Service => ".4",
            PunchKind::SmallServiceHole => ".5",
            PunchKind::MServiceHole => ".6",
            PunchKind::LargeServiceHole => ".7",
            PunchKind::CornerBrackets => ".4",
        }
    }

    /// Station name as it appears in drawings and the UI
    pub fn station_name(&self) -> &'static str {
        match self {
            PunchKind::BoltHole => "BOLT HOLE",
            PunchKind::Dimple => "DIMPLE",
            PunchKind::WebTab => "WEB TAB",
            PunchKind::Service => "SERVICE",
            PunchKind::SmallServiceHole => "SMALL SERVICE HOLE",
            PunchKind::MServiceHole => "M SERVICE HOLE",
            PunchKind::LargeServiceHole => "LARGE SERVICE HOLE",
            PunchKind::CornerBrackets => "CORNER BRACKETS",
        }
    }

    /// Station name on the wire. Corner brackets emit as `SERVICE`.
    pub fn emit_station_name(&self) -> &'static str {
        match self {
            PunchKind::CornerBrackets => "SERVICE",
            other => other.station_name(),
        }
    }

    /// Which face of the section the station punches
    pub fn plane(&self) -> Plane {
        match self {
            PunchKind::BoltHole | PunchKind::Dimple => Plane::Flange,
            PunchKind::WebTab
            | PunchKind::Service
            | PunchKind::SmallServiceHole
            | PunchKind::MServiceHole
            | PunchKind::LargeServiceHole
            | PunchKind::CornerBrackets => Plane::WebFace,
        }
    }

    /// Die geometry for this station
    pub fn geometry(&self) -> PunchGeometry {
        match self {
            PunchKind::BoltHole => PunchGeometry::square(".1", 11.0),
            PunchKind::Dimple => PunchGeometry::round(".2", 5.0),
            PunchKind::WebTab => PunchGeometry::rectangular(".3", 45.0, 70.0),
            PunchKind::Service => PunchGeometry::rectangular(".4", 115.0, 300.0),
            PunchKind::SmallServiceHole => PunchGeometry::round(".5", 115.0),
            PunchKind::MServiceHole => PunchGeometry::round(".6", 200.0),
            PunchKind::LargeServiceHole => PunchGeometry::oval(".7", 400.0, 200.0),
            PunchKind::CornerBrackets => PunchGeometry::rectangular(".4", 115.0, 300.0),
        }
    }

    /// Longitudinal clearance half-extent: the radius for round dies, half
    /// the width for everything else. Used by the face-overlap rule.
    pub fn clearance_mm(&self) -> f64 {
        let geo = self.geometry();
        match geo.shape {
            Shape::Round => geo.diameter_mm.unwrap_or(geo.width_mm) / 2.0,
            Shape::Square | Shape::Rectangular | Shape::Oval => geo.width_mm / 2.0,
        }
    }
}

impl std::fmt::Display for PunchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.station_name())
    }
}

/// Die geometry of a punch station. Catalogue data: serialisable for
/// drawing hosts, never read back in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PunchGeometry {
    /// Hit code suffix (`.1` … `.7`)
    pub hit_code: &'static str,
    pub shape: Shape,
    /// Extent along the member length
    pub width_mm: f64,
    /// Extent across the face
    pub height_mm: f64,
    /// Set for round dies only
    pub diameter_mm: Option<f64>,
}

impl PunchGeometry {
    const fn square(hit_code: &'static str, side: f64) -> Self {
        PunchGeometry {
            hit_code,
            shape: Shape::Square,
            width_mm: side,
            height_mm: side,
            diameter_mm: None,
        }
    }

    const fn round(hit_code: &'static str, diameter: f64) -> Self {
        PunchGeometry {
            hit_code,
            shape: Shape::Round,
            width_mm: diameter,
            height_mm: diameter,
            diameter_mm: Some(diameter),
        }
    }

    const fn rectangular(hit_code: &'static str, width: f64, height: f64) -> Self {
        PunchGeometry {
            hit_code,
            shape: Shape::Rectangular,
            width_mm: width,
            height_mm: height,
            diameter_mm: None,
        }
    }

    const fn oval(hit_code: &'static str, width: f64, height: f64) -> Self {
        PunchGeometry {
            hit_code,
            shape: Shape::Oval,
            width_mm: width,
            height_mm: height,
            diameter_mm: None,
        }
    }
}

/// Manufacturing rule constants.
///
/// Grouped the way the shop floor talks about them: end treatment, flange
/// pattern, web pattern, tolerances, screens offsets, span limits.
pub mod rules {
    /// Clear length kept free of service holes at each end, before the hole
    /// radius is added: `end_exclusion = 2 * (Ø/2 + END_EXCLUSION_BASE)`
    pub const END_EXCLUSION_BASE: f64 = 300.0;

    /// Interior window for bolts and box-mode dimples
    pub const MIN_CLEARANCE: f64 = 50.0;

    /// Half-width of the web-tab die
    pub const WEB_TAB_CLEARANCE: f64 = 22.5;

    /// Required stub-to-service-hole centre distance
    pub const SERVICE_CLEARANCE: f64 = 250.0;

    /// Bolt offsets either side of a bearer web tab
    pub const BOLT_OFFSET_PATTERN: [f64; 2] = [-29.5, 29.5];

    /// Canonical end bolt position from each member end
    pub const END_BOLT_POSITION: f64 = 30.0;

    /// End bolts at ~30 mm are exempt from the interior-bolt edge rule up to
    /// this distance from the end
    pub const END_BOLT_EXEMPTION: f64 = 35.0;

    /// Bearer dimple grid
    pub const DIMPLE_START_BEARER: f64 = 479.5;
    pub const DIMPLE_SPACING_BEARER: f64 = 450.0;
    /// Loop bound for the bearer dimple series (last value may land one step
    /// past `length - DIMPLE_END_CLEARANCE_BEARER`; see the series helper)
    pub const DIMPLE_END_CLEARANCE_BEARER: f64 = 270.5;

    /// Joist dimple pattern: pairs at `k * 600 ± 75`
    pub const DIMPLE_BASE_INTERVAL_JOIST: f64 = 600.0;
    pub const DIMPLE_OFFSET_JOIST: f64 = 75.0;

    /// Legacy joist dimple grid, still enforced by the clash detector even
    /// though the generator has moved to the 600 mm paired pattern
    pub const DIMPLE_START_JOIST: f64 = 509.5;
    pub const DIMPLE_SPACING_JOIST: f64 = 409.5;

    /// Nominal service-hole pitch
    pub const SERVICE_HOLE_SPACING: f64 = 650.0;

    /// Positional match tolerance (duplicate guard, bolt alignment)
    pub const POSITION_TOLERANCE: f64 = 10.0;

    /// Web-tab spacing tolerance: `max(15% of nominal, 100 mm)`
    pub const SPACING_TOLERANCE_PERCENT: f64 = 0.15;
    pub const MIN_SPACING_TOLERANCE: f64 = 100.0;

    /// Corner bracket position from each member end
    pub const CORNER_BRACKET_POSITION: f64 = 131.0;

    /// Service centres this close to an end are treated as corner brackets by
    /// the spacing rule
    pub const CORNER_BRACKET_EXCLUSION: f64 = 150.0;

    /// Canonical first user stub position
    pub const FIRST_STUB_POSITION: f64 = 331.0;

    /// Box-mode service hits land either side of the joist centreline
    pub const BOX_SERVICE_OFFSET: f64 = 12.0;

    /// Screens mode fixed edge offsets and intermediate cap
    pub const SCREENS_BEARER_FIRST_WEB_TAB: f64 = 475.0;
    pub const SCREENS_JOIST_FIRST_WEB_TAB: f64 = 425.0;
    pub const SCREENS_MAX_WEB_TAB_SPACING: f64 = 1200.0;

    /// Joist web-tab placement window between service holes
    pub const MAX_WEB_TAB_SPAN: f64 = 2400.0;
    pub const MIN_WEB_TAB_SPAN: f64 = 1200.0;

    /// Required clear distance between a web-tab centre and a service-hole
    /// centre: 100 hole radius + 20 half tab + 30 safety
    pub const WEB_TAB_CONFLICT_RADIUS: f64 = 150.0;

    /// Minimum dimple-to-bolt centre distance on the flange:
    /// 2.5 dimple radius + 5.5 bolt half-width + 5 safety
    pub const FLANGE_CONFLICT_DISTANCE: f64 = 13.0;

    /// Grid tolerance for the dimple pattern checks
    pub const DIMPLE_GRID_TOLERANCE: f64 = 1.0;

    /// Maximum member spans by load rating
    pub const SPAN_LIMIT_2_5_KPA: f64 = 11750.0;
    pub const SPAN_LIMIT_5_0_KPA: f64 = 9300.0;

    /// Flange widths by member role
    pub const FLANGE_JOIST: f64 = 59.0;
    pub const FLANGE_BEARER: f64 = 63.0;

    /// Sheet thickness
    pub const THICKNESS: f64 = 1.8;

    /// Diameter assumed when no service hole type is selected
    pub const DEFAULT_HOLE_DIAMETER: f64 = 200.0;

    /// Diameter assumed for unrecognised legacy hole types
    pub const LEGACY_HOLE_DIAMETER: f64 = 110.0;

    /// Web-tab height; tab vertical offset is `(profile_height - 70) / 2`
    pub const WEB_TAB_HEIGHT: f64 = 70.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_codes_total() {
        // Every station maps to a hit code; corner brackets share .4
        for kind in PunchKind::ALL {
            assert!(kind.hit_code().starts_with('.'));
        }
        assert_eq!(
            PunchKind::CornerBrackets.hit_code(),
            PunchKind::Service.hit_code()
        );
    }

    #[test]
    fn test_corner_bracket_emits_as_service() {
        assert_eq!(PunchKind::CornerBrackets.emit_station_name(), "SERVICE");
        assert_eq!(PunchKind::BoltHole.emit_station_name(), "BOLT HOLE");
    }

    #[test]
    fn test_planes() {
        assert_eq!(PunchKind::BoltHole.plane(), Plane::Flange);
        assert_eq!(PunchKind::Dimple.plane(), Plane::Flange);
        assert_eq!(PunchKind::WebTab.plane(), Plane::WebFace);
        assert_eq!(PunchKind::LargeServiceHole.plane(), Plane::WebFace);
        assert_eq!(PunchKind::CornerBrackets.plane(), Plane::WebFace);
    }

    #[test]
    fn test_geometry_table() {
        let tab = PunchKind::WebTab.geometry();
        assert_eq!(tab.shape, Shape::Rectangular);
        assert_eq!((tab.width_mm, tab.height_mm), (45.0, 70.0));

        let m = PunchKind::MServiceHole.geometry();
        assert_eq!(m.diameter_mm, Some(200.0));

        let oval = PunchKind::LargeServiceHole.geometry();
        assert_eq!(oval.shape, Shape::Oval);
        assert_eq!((oval.width_mm, oval.height_mm), (400.0, 200.0));
        assert_eq!(oval.diameter_mm, None);
    }

    #[test]
    fn test_clearances() {
        assert_eq!(PunchKind::WebTab.clearance_mm(), 22.5);
        assert_eq!(PunchKind::MServiceHole.clearance_mm(), 100.0);
        // Oval uses half its 400 width, not the 200 height
        assert_eq!(PunchKind::LargeServiceHole.clearance_mm(), 200.0);
        assert_eq!(PunchKind::Service.clearance_mm(), 57.5);
    }

    #[test]
    fn test_serialization() {
        let kind = PunchKind::SmallServiceHole;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"SmallServiceHole\"");
        let roundtrip: PunchKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, roundtrip);
    }
}
