use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("rotation must be 0..=3 quarter turns (got {0})")]
pub struct RotationError(pub i64);

/// Quarter-turn rotation applied to a component's local offset.
///
/// Only the four axis-aligned orientations exist; hole placement tolerances
/// are fractions of a millimeter, so the transform is exact integer swaps
/// and negations, never trigonometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// Angle in radians, screen-space (y down).
    #[must_use]
    pub fn radians(self) -> f64 {
        f64::from(self.quarter_turns()) * std::f64::consts::FRAC_PI_2
    }

    /// Rotates a local offset by this many quarter turns.
    #[must_use]
    pub fn apply(self, offset: (f64, f64)) -> (f64, f64) {
        let (x, y) = offset;
        match self {
            Rotation::R0 => (x, y),
            Rotation::R90 => (-y, x),
            Rotation::R180 => (-x, -y),
            Rotation::R270 => (y, -x),
        }
    }
}

impl TryFrom<i64> for Rotation {
    type Error = RotationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::R0),
            1 => Ok(Rotation::R90),
            2 => Ok(Rotation::R180),
            3 => Ok(Rotation::R270),
            other => Err(RotationError(other)),
        }
    }
}

impl From<Rotation> for i64 {
    fn from(value: Rotation) -> Self {
        i64::from(value.quarter_turns())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_transforms_are_exact() {
        let offset = (1.25, -4.5);
        assert_eq!(Rotation::R0.apply(offset), (1.25, -4.5));
        assert_eq!(Rotation::R90.apply(offset), (4.5, 1.25));
        assert_eq!(Rotation::R180.apply(offset), (-1.25, 4.5));
        assert_eq!(Rotation::R270.apply(offset), (-4.5, -1.25));
    }

    #[test]
    fn four_applications_are_identity() {
        let offsets = [(0.0, 0.0), (1.0, 0.0), (2.54, -7.62), (-3.3, 4.4)];
        for r in Rotation::ALL {
            for offset in offsets {
                let mut p = offset;
                for _ in 0..4 {
                    p = r.apply(p);
                }
                assert_eq!(p, offset, "rotation {r:?} is not a 4-cycle");
            }
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(Rotation::try_from(4).is_err());
        assert!(Rotation::try_from(-1).is_err());
        assert!(Rotation::try_from(2).is_ok());
    }

    #[test]
    fn yaml_round_trip_uses_integers() {
        let r: Rotation = serde_yaml::from_str("2").unwrap();
        assert_eq!(r, Rotation::R180);
        assert!(serde_yaml::from_str::<Rotation>("5").is_err());
    }
}
