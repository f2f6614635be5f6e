//! Path families: the per-road thresholds that close each vehicle loop.
//!
//! Every road in the site is the same closed loop (a diagonal entry ramp
//! followed by a straight lateral road); families differ only in where the
//! legs end and in which lateral leg they drive.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::vehicle::Phase;
use crate::error::SitewalkError;

/// Depth below which forward traffic leaves the approach leg.
pub const APPROACH_END_DEPTH: f32 = -400.0;
/// Depth above which backward traffic on the approach leg resets.
pub const APPROACH_RETURN_DEPTH: f32 = -250.0;
/// Lateral position beyond which forward traffic resets.
pub const LATERAL_END: f32 = 300.0;
/// Lateral position below which backward traffic rejoins the approach leg.
pub const LATERAL_RETURN: f32 = 248.0;
/// Lateral position below which backward traffic on the alternate leg
/// resets.
pub const LATERAL_ALT_RETURN: f32 = 80.0;

/// Which lateral leg a family drives after the approach leg.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LateralLeg {
    /// Backward traffic turns back onto the approach leg at the end of the
    /// road.
    #[default]
    Standard,
    /// Extra turn before the loop closes: both directions reset at the end
    /// of the road.
    Alternate,
}

/// The four numeric thresholds of one path family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PathThresholds {
    /// Depth (z) forward traffic must drop below to turn lateral.
    pub approach_end: f32,
    /// Depth (z) backward traffic must rise above to reset.
    pub approach_return: f32,
    /// Lateral (x) position forward traffic must exceed to reset.
    pub lateral_end: f32,
    /// Lateral (x) position backward traffic must fall below to leave the
    /// lateral leg.
    pub lateral_return: f32,
}

impl Default for PathThresholds {
    fn default() -> Self {
        Self {
            approach_end: APPROACH_END_DEPTH,
            approach_return: APPROACH_RETURN_DEPTH,
            lateral_end: LATERAL_END,
            lateral_return: LATERAL_RETURN,
        }
    }
}

/// A named road shape shared by any number of vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PathFamily {
    /// Identifier referenced by vehicle specs.
    pub id: String,
    /// Lateral leg driven after the approach leg.
    #[serde(default)]
    pub leg: LateralLeg,
    /// Leg end positions.
    #[serde(default)]
    pub thresholds: PathThresholds,
}

impl PathFamily {
    /// Family driving the standard lateral leg with the default thresholds.
    pub fn standard(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            leg: LateralLeg::Standard,
            thresholds: PathThresholds::default(),
        }
    }

    /// Family driving the alternate lateral leg, whose backward traffic runs
    /// the full road before resetting.
    pub fn alternate(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            leg: LateralLeg::Alternate,
            thresholds: PathThresholds {
                lateral_return: LATERAL_ALT_RETURN,
                ..PathThresholds::default()
            },
        }
    }

    /// Phase entered when forward traffic leaves the approach leg.
    #[must_use]
    pub fn lateral_phase(&self) -> Phase {
        match self.leg {
            LateralLeg::Standard => Phase::Lateral,
            LateralLeg::Alternate => Phase::LateralAlt,
        }
    }

    /// Whether vehicles on this family can occupy `phase`.
    #[must_use]
    pub fn supports(&self, phase: Phase) -> bool {
        phase == Phase::Approach || phase == self.lateral_phase()
    }

    /// Reject thresholds that cannot close a loop.
    pub fn validate(&self) -> Result<(), SitewalkError> {
        let t = &self.thresholds;
        let all_finite = [
            t.approach_end,
            t.approach_return,
            t.lateral_end,
            t.lateral_return,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(SitewalkError::InvalidOptions(format!(
                "path family '{}' has non-finite thresholds",
                self.id
            )));
        }
        if t.approach_return <= t.approach_end {
            return Err(SitewalkError::InvalidOptions(format!(
                "path family '{}': approach_return ({}) must lie above \
                 approach_end ({})",
                self.id, t.approach_return, t.approach_end
            )));
        }
        if t.lateral_end <= t.lateral_return {
            return Err(SitewalkError::InvalidOptions(format!(
                "path family '{}': lateral_end ({}) must lie beyond \
                 lateral_return ({})",
                self.id, t.lateral_end, t.lateral_return
            )));
        }
        Ok(())
    }
}

/// Families available without configuration: `a` (standard leg) and `b`
/// (alternate leg).
#[must_use]
pub fn builtin_families() -> Vec<PathFamily> {
    vec![PathFamily::standard("a"), PathFamily::alternate("b")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_family_supports_lateral_only() {
        let family = PathFamily::standard("a");
        assert!(family.supports(Phase::Approach));
        assert!(family.supports(Phase::Lateral));
        assert!(!family.supports(Phase::LateralAlt));
    }

    #[test]
    fn alternate_family_swaps_lateral_leg() {
        let family = PathFamily::alternate("b");
        assert_eq!(family.lateral_phase(), Phase::LateralAlt);
        assert!(!family.supports(Phase::Lateral));
        assert_eq!(family.thresholds.lateral_return, 80.0);
    }

    #[test]
    fn builtin_families_validate() {
        for family in builtin_families() {
            family.validate().unwrap();
        }
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut family = PathFamily::standard("bad");
        family.thresholds.approach_return = -500.0;
        assert!(matches!(
            family.validate(),
            Err(SitewalkError::InvalidOptions(_))
        ));

        let mut family = PathFamily::standard("nan");
        family.thresholds.lateral_end = f32::NAN;
        assert!(family.validate().is_err());
    }
}
