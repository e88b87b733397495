//! Desktop stand-in for a webcam and hand tracker: the mouse cursor is the
//! hand. Holding the left button makes a fist, releasing it opens the hand,
//! and a cursor outside the window reports no hands at all.

use app_core::{
    CameraConfig, Detections, DetectorOptions, FrameSource, GestureError, HandDetector,
    Landmark, HAND_LANDMARK_COUNT,
};
use glam::Vec2;
use instant::Instant;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Middle finger reach (MCP to tip) in normalized image units.
const OPEN_REACH: f32 = 0.12;
const FIST_REACH: f32 = 0.03;

/// One "camera frame": where the cursor is and whether it is pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    /// Normalized window coordinates, `None` when the cursor left the window.
    pub uv: Option<Vec2>,
    pub pressed: bool,
}

/// Written by the window event handler, read by [`PointerCamera`].
#[derive(Clone, Default)]
pub struct PointerHandle(Rc<Cell<PointerSample>>);

impl PointerHandle {
    pub fn move_to(&self, u: f32, v: f32) {
        let mut s = self.0.get();
        s.uv = Some(Vec2::new(u.clamp(0.0, 1.0), v.clamp(0.0, 1.0)));
        self.0.set(s);
    }

    pub fn leave(&self) {
        let mut s = self.0.get();
        s.uv = None;
        self.0.set(s);
    }

    pub fn set_pressed(&self, pressed: bool) {
        let mut s = self.0.get();
        s.pressed = pressed;
        self.0.set(s);
    }

    pub fn get(&self) -> PointerSample {
        self.0.get()
    }
}

/// Samples the pointer at the configured frame rate.
pub struct PointerCamera {
    pointer: PointerHandle,
    interval: Duration,
    last_frame: Option<Instant>,
    running: bool,
}

impl PointerCamera {
    pub fn new(pointer: PointerHandle) -> Self {
        Self {
            pointer,
            interval: Duration::ZERO,
            last_frame: None,
            running: false,
        }
    }
}

impl FrameSource for PointerCamera {
    type Frame = PointerSample;

    fn start(&mut self, config: &CameraConfig) -> Result<(), GestureError> {
        if !(config.fps > 0.0 && config.fps.is_finite()) {
            return Err(GestureError::CameraUnavailable(format!(
                "invalid frame rate {}",
                config.fps
            )));
        }
        self.interval = Duration::from_secs_f32(1.0 / config.fps);
        self.last_frame = None;
        self.running = true;
        log::info!(
            "[gesture] pointer camera started ({}x{} @ {} fps)",
            config.width,
            config.height,
            config.fps
        );
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            log::info!("[gesture] pointer camera stopped");
        }
        self.running = false;
    }

    fn next_frame(&mut self) -> Option<PointerSample> {
        if !self.running {
            return None;
        }
        let now = Instant::now();
        if let Some(last) = self.last_frame {
            if now.duration_since(last) < self.interval {
                return None;
            }
        }
        self.last_frame = Some(now);
        Some(self.pointer.get())
    }
}

#[derive(Default)]
pub struct PointerHandDetector {
    options: Option<DetectorOptions>,
}

impl HandDetector<PointerSample> for PointerHandDetector {
    fn initialize(&mut self, options: &DetectorOptions) -> Result<(), GestureError> {
        log::debug!("[gesture] pointer detector options: {options:?}");
        self.options = Some(options.clone());
        Ok(())
    }

    fn detect(&mut self, frame: &PointerSample) -> Result<Detections, GestureError> {
        if self.options.is_none() {
            return Err(GestureError::Detection("detector not initialized".into()));
        }
        Ok(match frame.uv {
            Some(uv) => Detections::single(synthetic_hand(uv, !frame.pressed)),
            None => Detections::empty(),
        })
    }

    fn close(&mut self) {
        self.options = None;
    }
}

/// A flat 21-point hand whose centroid sits on `center`: the wrist, then four
/// joints per finger from thumb to pinky, fingers pointing up the image.
pub fn synthetic_hand(center: Vec2, open: bool) -> Vec<Landmark> {
    let reach = if open { OPEN_REACH } else { FIST_REACH };
    let mut points = Vec::with_capacity(HAND_LANDMARK_COUNT);
    points.push(Vec2::new(0.0, 0.08));
    for finger in 0..5 {
        let base = Vec2::new(-0.04 + finger as f32 * 0.02, 0.0);
        let dir = if finger == 0 {
            Vec2::new(-1.0, -1.0).normalize()
        } else {
            Vec2::NEG_Y
        };
        for joint in 0..4 {
            points.push(base + dir * reach * joint as f32 / 3.0);
        }
    }
    let mean = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    points
        .into_iter()
        .map(|p| {
            let p = center + p - mean;
            Landmark::new(p.x, p.y, 0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{centroid, HandLandmarks, LandmarkClassifier};

    fn classify(center: Vec2, open: bool) -> app_core::HandReading {
        let hand = HandLandmarks::from_points(&synthetic_hand(center, open)).unwrap();
        LandmarkClassifier::default().classify(&hand)
    }

    #[test]
    fn released_button_reads_as_open_hand() {
        assert!(classify(Vec2::new(0.5, 0.5), true).is_open);
    }

    #[test]
    fn held_button_reads_as_fist() {
        assert!(!classify(Vec2::new(0.5, 0.5), false).is_open);
    }

    #[test]
    fn hand_is_centered_on_cursor() {
        let center = Vec2::new(0.2, 0.7);
        let c = centroid(&synthetic_hand(center, true));
        assert!((c - center).length() < 1e-5);
        assert_eq!(synthetic_hand(center, false).len(), HAND_LANDMARK_COUNT);
    }

    #[test]
    fn cursor_outside_window_reports_no_hands() {
        let mut detector = PointerHandDetector::default();
        detector.initialize(&DetectorOptions::default()).unwrap();
        let out = detector.detect(&PointerSample::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn uninitialized_detector_errors() {
        let mut detector = PointerHandDetector::default();
        assert!(detector.detect(&PointerSample::default()).is_err());
    }

    #[test]
    fn camera_throttles_to_frame_rate() {
        let pointer = PointerHandle::default();
        let mut camera = PointerCamera::new(pointer.clone());
        assert!(camera.next_frame().is_none());
        camera.start(&CameraConfig::default()).unwrap();
        pointer.move_to(0.25, 0.75);
        pointer.set_pressed(true);
        let frame = camera.next_frame().expect("first frame is immediate");
        assert_eq!(frame.uv, Some(Vec2::new(0.25, 0.75)));
        assert!(frame.pressed);
        assert!(camera.next_frame().is_none());
        camera.stop();
        assert!(camera.next_frame().is_none());
    }

    #[test]
    fn zero_fps_is_rejected() {
        let mut camera = PointerCamera::new(PointerHandle::default());
        let config = CameraConfig {
            fps: 0.0,
            ..CameraConfig::default()
        };
        assert!(camera.start(&config).is_err());
    }
}
