//! # Profile Specification
//!
//! [`ProfileSpec`] is the single input to the layout planner: the member
//! role, its dimensions, the spacing rules and the station enable flags, as
//! they arrive from the host's input forms. All fields are JSON-first.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "variant": "BearerSingle",
//!   "length_mm": 5200,
//!   "profile_height_mm": 250,
//!   "joist_spacing_mm": 600,
//!   "stub_spacing_mm": 1200,
//!   "stub_positions": [331, 1531, 2731, 3931, 4869],
//!   "stubs_enabled": true,
//!   "hole_type": "None",
//!   "hole_spacing_mm": 650,
//!   "kpa_rating": 2.5
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{rules, PunchKind};
use crate::errors::{PlanError, PlanResult};

/// Member role and build-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProfileVariant {
    /// Single-profile joist
    #[default]
    JoistSingle,
    /// Boxed (doubled) joist
    JoistBox,
    /// Single-profile bearer
    BearerSingle,
    /// Boxed (doubled) bearer
    BearerBox,
}

impl ProfileVariant {
    pub fn is_joist(&self) -> bool {
        matches!(self, ProfileVariant::JoistSingle | ProfileVariant::JoistBox)
    }

    pub fn is_bearer(&self) -> bool {
        !self.is_joist()
    }

    pub fn is_box(&self) -> bool {
        matches!(self, ProfileVariant::JoistBox | ProfileVariant::BearerBox)
    }

    /// Role label as the press wire format spells it
    pub fn member_label(&self) -> &'static str {
        if self.is_bearer() {
            "BEARER"
        } else {
            "JOIST"
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProfileVariant::JoistSingle => "Joist (single)",
            ProfileVariant::JoistBox => "Joist (box)",
            ProfileVariant::BearerSingle => "Bearer (single)",
            ProfileVariant::BearerBox => "Bearer (box)",
        }
    }
}

impl std::fmt::Display for ProfileVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Service-hole style selected for the member.
///
/// Determines both the punch station emitted for service holes and the
/// diameter used in end-exclusion maths. Wire values outside the closed set
/// deserialize to [`HoleType::Legacy`] and are treated as the historical
/// Ø110 hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum HoleType {
    /// No service holes
    #[default]
    None,
    /// Ø50 routed hole, punched with the small-service die
    R50,
    /// Ø115 hole
    R115,
    /// Ø200 hole
    R200,
    /// 400 × 200 oval
    Oval200x400,
    /// Unrecognised legacy value; behaves as the historical Ø110 hole
    Legacy,
}

impl<'de> Deserialize<'de> for HoleType {
    /// Unknown wire values fall through to [`HoleType::Legacy`] instead of
    /// failing the whole spec; the planner logs the substitution.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "None" => HoleType::None,
            "R50" => HoleType::R50,
            "R115" => HoleType::R115,
            "R200" => HoleType::R200,
            "Oval200x400" => HoleType::Oval200x400,
            _ => HoleType::Legacy,
        })
    }
}

impl HoleType {
    /// Diameter used in end-exclusion maths. `None` has no hole and returns
    /// no diameter; the planner substitutes the 200 mm default.
    pub fn diameter_mm(&self) -> Option<f64> {
        match self {
            HoleType::None => None,
            HoleType::R50 => Some(50.0),
            HoleType::R115 => Some(115.0),
            HoleType::R200 => Some(200.0),
            HoleType::Oval200x400 => Some(400.0),
            HoleType::Legacy => Some(rules::LEGACY_HOLE_DIAMETER),
        }
    }

    /// The punch station used for service holes of this style
    pub fn service_kind(&self) -> Option<PunchKind> {
        match self {
            HoleType::None => None,
            HoleType::R50 | HoleType::R115 | HoleType::Legacy => Some(PunchKind::SmallServiceHole),
            HoleType::R200 => Some(PunchKind::MServiceHole),
            HoleType::Oval200x400 => Some(PunchKind::LargeServiceHole),
        }
    }
}

/// Structural load class. Selects the span-table rows and span limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum KpaRating {
    Kpa2_5,
    Kpa5_0,
}

impl KpaRating {
    pub fn as_kpa(&self) -> f64 {
        match self {
            KpaRating::Kpa2_5 => 2.5,
            KpaRating::Kpa5_0 => 5.0,
        }
    }

    /// Maximum member span for this rating
    pub fn span_limit_mm(&self) -> f64 {
        match self {
            KpaRating::Kpa2_5 => rules::SPAN_LIMIT_2_5_KPA,
            KpaRating::Kpa5_0 => rules::SPAN_LIMIT_5_0_KPA,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            KpaRating::Kpa2_5 => "2.5 kPa",
            KpaRating::Kpa5_0 => "5.0 kPa",
        }
    }
}

impl TryFrom<f64> for KpaRating {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        match value {
            v if v == 2.5 => Ok(KpaRating::Kpa2_5),
            v if v == 5.0 => Ok(KpaRating::Kpa5_0),
            other => Err(format!("unsupported kPa rating: {other}")),
        }
    }
}

impl From<KpaRating> for f64 {
    fn from(rating: KpaRating) -> Self {
        rating.as_kpa()
    }
}

impl std::fmt::Display for KpaRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn default_true() -> bool {
    true
}

/// Per-station enable flags.
///
/// A closed mapping over [`PunchKind`] rather than a heterogeneous list, so
/// queries are total and constant-time. All stations default to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchStations {
    #[serde(default = "default_true")]
    pub bolt_hole: bool,
    #[serde(default = "default_true")]
    pub dimple: bool,
    #[serde(default = "default_true")]
    pub web_tab: bool,
    #[serde(default = "default_true")]
    pub service: bool,
    #[serde(default = "default_true")]
    pub small_service_hole: bool,
    #[serde(default = "default_true")]
    pub m_service_hole: bool,
    #[serde(default = "default_true")]
    pub large_service_hole: bool,
    #[serde(default = "default_true")]
    pub corner_brackets: bool,
}

impl Default for PunchStations {
    fn default() -> Self {
        PunchStations {
            bolt_hole: true,
            dimple: true,
            web_tab: true,
            service: true,
            small_service_hole: true,
            m_service_hole: true,
            large_service_hole: true,
            corner_brackets: true,
        }
    }
}

impl PunchStations {
    /// All stations disabled
    pub fn none() -> Self {
        PunchStations {
            bolt_hole: false,
            dimple: false,
            web_tab: false,
            service: false,
            small_service_hole: false,
            m_service_hole: false,
            large_service_hole: false,
            corner_brackets: false,
        }
    }

    pub fn enabled(&self, kind: PunchKind) -> bool {
        match kind {
            PunchKind::BoltHole => self.bolt_hole,
            PunchKind::Dimple => self.dimple,
            PunchKind::WebTab => self.web_tab,
            PunchKind::Service => self.service,
            PunchKind::SmallServiceHole => self.small_service_hole,
            PunchKind::MServiceHole => self.m_service_hole,
            PunchKind::LargeServiceHole => self.large_service_hole,
            PunchKind::CornerBrackets => self.corner_brackets,
        }
    }

    pub fn set(&mut self, kind: PunchKind, enabled: bool) {
        match kind {
            PunchKind::BoltHole => self.bolt_hole = enabled,
            PunchKind::Dimple => self.dimple = enabled,
            PunchKind::WebTab => self.web_tab = enabled,
            PunchKind::Service => self.service = enabled,
            PunchKind::SmallServiceHole => self.small_service_hole = enabled,
            PunchKind::MServiceHole => self.m_service_hole = enabled,
            PunchKind::LargeServiceHole => self.large_service_hole = enabled,
            PunchKind::CornerBrackets => self.corner_brackets = enabled,
        }
    }

    /// Builder-style toggle
    pub fn with(mut self, kind: PunchKind, enabled: bool) -> Self {
        self.set(kind, enabled);
        self
    }
}

/// Full description of one member, as entered in the host's input forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    /// Member role and build-up
    pub variant: ProfileVariant,

    /// Member length (1000–15000 mm)
    pub length_mm: u32,

    /// Profile height: 200, 250, 300 or 350 mm
    pub profile_height_mm: u32,

    /// Span of the joists this bearer carries; drives the span-table lookup.
    /// Bearers only.
    #[serde(default)]
    pub joist_length_mm: Option<u32>,

    /// Joist pitch along the member (400–1200 mm)
    pub joist_spacing_mm: u32,

    /// Stub column pitch (600–2400 mm)
    pub stub_spacing_mm: u32,

    /// User-placed stub positions, ascending. Bearers only.
    #[serde(default)]
    pub stub_positions: Vec<u32>,

    /// Whether stub/corner-bracket cuts are punched at all
    #[serde(default)]
    pub stubs_enabled: bool,

    /// Service-hole style
    #[serde(default)]
    pub hole_type: HoleType,

    /// Nominal service-hole pitch (400–1000 mm)
    pub hole_spacing_mm: u32,

    /// Per-station enable flags
    #[serde(default)]
    pub punch_stations: PunchStations,

    /// Joist gets box-end treatment (naming only; the punch layout is
    /// unaffected). Joists only.
    #[serde(default)]
    pub end_box_joist: bool,

    /// Screens-platform spacing regime
    #[serde(default)]
    pub screens_enabled: bool,

    /// Bearer carries boxed joists: web tabs are replaced by paired service
    /// hits and flange bolts by dimples. Bearers only.
    #[serde(default)]
    pub joist_box: bool,

    /// Structural load class, when known
    #[serde(default)]
    pub kpa_rating: Option<KpaRating>,
}

impl ProfileSpec {
    /// Create a spec with shop-standard defaults for the secondary fields.
    pub fn new(variant: ProfileVariant, length_mm: u32) -> Self {
        ProfileSpec {
            variant,
            length_mm,
            profile_height_mm: 250,
            joist_length_mm: None,
            joist_spacing_mm: 600,
            stub_spacing_mm: 1200,
            stub_positions: Vec::new(),
            stubs_enabled: false,
            hole_type: HoleType::None,
            hole_spacing_mm: 650,
            punch_stations: PunchStations::default(),
            end_box_joist: false,
            screens_enabled: false,
            joist_box: false,
            kpa_rating: None,
        }
    }

    /// Validate every numeric field against its documented range.
    ///
    /// Called by the planner before any layout is produced, so an invalid
    /// spec never causes a partial state change.
    pub fn validate(&self) -> PlanResult<()> {
        if !(1000..=15000).contains(&self.length_mm) {
            return Err(PlanError::invalid_input(
                "length_mm",
                self.length_mm.to_string(),
                "Member length must be 1000-15000 mm",
            ));
        }
        if ![200, 250, 300, 350].contains(&self.profile_height_mm) {
            return Err(PlanError::invalid_input(
                "profile_height_mm",
                self.profile_height_mm.to_string(),
                "Profile height must be one of 200, 250, 300, 350 mm",
            ));
        }
        if !(400..=1200).contains(&self.joist_spacing_mm) {
            return Err(PlanError::invalid_input(
                "joist_spacing_mm",
                self.joist_spacing_mm.to_string(),
                "Joist spacing must be 400-1200 mm",
            ));
        }
        if !(600..=2400).contains(&self.stub_spacing_mm) {
            return Err(PlanError::invalid_input(
                "stub_spacing_mm",
                self.stub_spacing_mm.to_string(),
                "Stub spacing must be 600-2400 mm",
            ));
        }
        if !(400..=1000).contains(&self.hole_spacing_mm) {
            return Err(PlanError::invalid_input(
                "hole_spacing_mm",
                self.hole_spacing_mm.to_string(),
                "Service hole spacing must be 400-1000 mm",
            ));
        }
        if let Some(joist_length) = self.joist_length_mm {
            if !(1000..=15000).contains(&joist_length) {
                return Err(PlanError::invalid_input(
                    "joist_length_mm",
                    joist_length.to_string(),
                    "Joist length must be 1000-15000 mm",
                ));
            }
        }
        Ok(())
    }

    /// Service-hole diameter used in end-exclusion maths, with the 200 mm
    /// default when no hole type is selected.
    pub fn hole_diameter_mm(&self) -> f64 {
        self.hole_type
            .diameter_mm()
            .unwrap_or(rules::DEFAULT_HOLE_DIAMETER)
    }

    /// Flange width for the member role
    pub fn flange_mm(&self) -> f64 {
        if self.variant.is_bearer() {
            rules::FLANGE_BEARER
        } else {
            rules::FLANGE_JOIST
        }
    }
}
