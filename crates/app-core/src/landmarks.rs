//! Typed boundary for hand-landmark payloads coming from an external detector.
//!
//! Detectors hand back loosely shaped data (a list of hands, each a list of
//! points). Everything past this module works with [`HandLandmarks`], which is
//! guaranteed to hold exactly [`HAND_LANDMARK_COUNT`] finite points.

use smallvec::SmallVec;
use thiserror::Error;

pub const HAND_LANDMARK_COUNT: usize = 21;

// Indices into the 21-point hand topology
pub const WRIST: usize = 0;
pub const MIDDLE_FINGER_MCP: usize = 9;
pub const MIDDLE_FINGER_TIP: usize = 12;

/// A single landmark in normalized image space (x, y in \[0, 1\]; z is relative depth).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Raw per-frame detector output: zero or more unvalidated hands.
#[derive(Clone, Debug, Default)]
pub struct Detections {
    pub hands: SmallVec<[Vec<Landmark>; 2]>,
}

impl Detections {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(hand: Vec<Landmark>) -> Self {
        let mut hands = SmallVec::new();
        hands.push(hand);
        Self { hands }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {got}")]
    WrongCount { expected: usize, got: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// A validated 21-point hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn from_points(points: &[Landmark]) -> Result<Self, LandmarkError> {
        if points.len() != HAND_LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: HAND_LANDMARK_COUNT,
                got: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        let mut out = [Landmark::default(); HAND_LANDMARK_COUNT];
        out.copy_from_slice(points);
        Ok(Self { points: out })
    }

    /// Build from a flat `[x0, y0, z0, x1, y1, z1, ...]` buffer (63 values).
    pub fn from_flat(values: &[f32]) -> Result<Self, LandmarkError> {
        if values.len() != HAND_LANDMARK_COUNT * 3 {
            return Err(LandmarkError::WrongCount {
                expected: HAND_LANDMARK_COUNT,
                got: values.len() / 3,
            });
        }
        let points: Vec<Landmark> = values
            .chunks_exact(3)
            .map(|c| Landmark::new(c[0], c[1], c[2]))
            .collect();
        Self::from_points(&points)
    }

    #[inline]
    pub fn points(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.points
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    #[inline]
    pub fn middle_tip(&self) -> Landmark {
        self.points[MIDDLE_FINGER_TIP]
    }

    #[inline]
    pub fn middle_mcp(&self) -> Landmark {
        self.points[MIDDLE_FINGER_MCP]
    }
}
