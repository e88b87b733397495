//! Open/closed hand classification and hand centroid.
//!
//! A single-feature heuristic: the image-plane distance between the middle
//! fingertip and the middle finger's MCP joint. No smoothing or hysteresis;
//! every frame is judged on its own.

use crate::constants::OPEN_HAND_THRESHOLD;
use crate::landmarks::{Detections, HandLandmarks, Landmark};
use glam::Vec2;

/// Result of classifying one hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandReading {
    pub is_open: bool,
    /// Centroid of all landmarks in normalized image space.
    pub position: Vec2,
}

#[derive(Clone, Copy, Debug)]
pub struct LandmarkClassifier {
    pub open_threshold: f32,
}

impl Default for LandmarkClassifier {
    fn default() -> Self {
        Self {
            open_threshold: OPEN_HAND_THRESHOLD,
        }
    }
}

impl LandmarkClassifier {
    pub fn classify(&self, hand: &HandLandmarks) -> HandReading {
        let dist = planar_distance(hand.middle_tip(), hand.middle_mcp());
        HandReading {
            is_open: dist > self.open_threshold,
            position: centroid(hand.points()),
        }
    }

    /// Classify the first hand of a frame. `None` means "no update this frame":
    /// no hand was detected, or the payload was malformed.
    pub fn classify_detections(&self, detections: &Detections) -> Option<HandReading> {
        let raw = detections.hands.first()?;
        match HandLandmarks::from_points(raw) {
            Ok(hand) => Some(self.classify(&hand)),
            Err(e) => {
                log::debug!("[gesture] ignoring malformed hand: {e}");
                None
            }
        }
    }
}

/// Euclidean distance in the image plane, depth ignored.
#[inline]
pub fn planar_distance(a: Landmark, b: Landmark) -> f32 {
    Vec2::new(a.x - b.x, a.y - b.y).length()
}

#[inline]
pub fn is_open_hand(tip: Landmark, base: Landmark, threshold: f32) -> bool {
    planar_distance(tip, base) > threshold
}

/// Arithmetic mean of x and y over all points. Empty input maps to the image center.
pub fn centroid(points: &[Landmark]) -> Vec2 {
    if points.is_empty() {
        return Vec2::splat(0.5);
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + Vec2::new(p.x, p.y));
    sum / points.len() as f32
}
