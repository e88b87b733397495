//! Gesture bridge: owns the camera and hand-detector collaborators, runs the
//! classifier on each analyzed frame and forwards a [`GestureUpdate`] upward.
//!
//! The collaborators are traits so the platform front-end decides where
//! frames come from. Frame analysis is pulled by the caller ([`GestureBridge::pump`])
//! at whatever rate the camera delivers; the bridge spawns nothing.

use crate::classifier::{HandReading, LandmarkClassifier};
use crate::constants::{
    CAMERA_FPS, CAMERA_HEIGHT, CAMERA_WIDTH, PAN_SCALE_X, PAN_SCALE_Y,
};
use crate::landmarks::Detections;
use crate::state::{Mode, PanOffset};
use glam::Vec2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GestureError {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("hand detector unavailable: {0}")]
    DetectorUnavailable(String),
    #[error("hand detection failed: {0}")]
    Detection(String),
}

/// Options handed to the hand detector when it is initialized.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorOptions {
    pub max_num_hands: u32,
    pub model_complexity: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            max_num_hands: 1,
            model_complexity: 1,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    pub fps: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: CAMERA_WIDTH,
            height: CAMERA_HEIGHT,
            fps: CAMERA_FPS,
        }
    }
}

/// Camera stream collaborator. `stop` must be safe to call more than once and
/// on a source that never started.
pub trait FrameSource {
    type Frame;

    fn start(&mut self, config: &CameraConfig) -> Result<(), GestureError>;
    fn stop(&mut self);
    /// The next frame, if the camera has produced one since the last call.
    fn next_frame(&mut self) -> Option<Self::Frame>;
}

/// Hand-landmark detector collaborator. `close` must be idempotent.
pub trait HandDetector<F> {
    fn initialize(&mut self, options: &DetectorOptions) -> Result<(), GestureError>;
    fn detect(&mut self, frame: &F) -> Result<Detections, GestureError>;
    fn close(&mut self);
}

/// What the application state receives from one classified frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureUpdate {
    pub mode: Mode,
    pub pan: PanOffset,
}

impl GestureUpdate {
    pub fn from_reading(reading: HandReading) -> Self {
        Self {
            mode: mode_for_hand(reading.is_open),
            pan: pan_offset_for(reading.position),
        }
    }
}

/// Open hand scatters the tree, closed fist assembles it.
#[inline]
pub fn mode_for_hand(is_open: bool) -> Mode {
    if is_open {
        Mode::Chaos
    } else {
        Mode::Formed
    }
}

/// Map a normalized hand centroid to a camera-space pan. Image y grows
/// downward, world y grows upward.
#[inline]
pub fn pan_offset_for(position: Vec2) -> PanOffset {
    PanOffset {
        x: (position.x - 0.5) * PAN_SCALE_X,
        y: (0.5 - position.y) * PAN_SCALE_Y,
    }
}

pub type UpdateCallback = Box<dyn FnMut(GestureUpdate)>;

pub struct GestureBridge<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    source: S,
    detector: D,
    classifier: LandmarkClassifier,
    on_update: UpdateCallback,
    frames_analyzed: u64,
}

impl<S, D> GestureBridge<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    /// Initialize the detector, then start the camera. If either step fails,
    /// whatever was already acquired is released before returning the error.
    pub fn acquire(
        mut source: S,
        mut detector: D,
        camera: &CameraConfig,
        options: &DetectorOptions,
        on_update: UpdateCallback,
    ) -> Result<Self, GestureError> {
        if let Err(e) = detector.initialize(options) {
            detector.close();
            return Err(e);
        }
        if let Err(e) = source.start(camera) {
            source.stop();
            detector.close();
            return Err(e);
        }
        log::info!(
            "[gesture] camera {}x{} @ {:.0} fps, detector max_hands={} complexity={}",
            camera.width,
            camera.height,
            camera.fps,
            options.max_num_hands,
            options.model_complexity
        );
        Ok(Self {
            source,
            detector,
            classifier: LandmarkClassifier::default(),
            on_update,
            frames_analyzed: 0,
        })
    }

    pub fn with_classifier(mut self, classifier: LandmarkClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Analyze at most one pending camera frame. Returns `true` when an update
    /// was forwarded; frames without a usable hand forward nothing.
    pub fn pump(&mut self) -> bool {
        let Some(frame) = self.source.next_frame() else {
            return false;
        };
        self.frames_analyzed += 1;
        let detections = match self.detector.detect(&frame) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("[gesture] dropping frame: {e}");
                return false;
            }
        };
        match self.classifier.classify_detections(&detections) {
            Some(reading) => {
                (self.on_update)(GestureUpdate::from_reading(reading));
                true
            }
            None => false,
        }
    }

    pub fn frames_analyzed(&self) -> u64 {
        self.frames_analyzed
    }
}

impl<S, D> Drop for GestureBridge<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    fn drop(&mut self) {
        self.source.stop();
        self.detector.close();
        log::info!(
            "[gesture] released camera and detector after {} frames",
            self.frames_analyzed
        );
    }
}

/// Gesture control that degrades to a no-op when acquisition fails.
pub enum GestureControl<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    Active(GestureBridge<S, D>),
    Disabled,
}

impl<S, D> GestureControl<S, D>
where
    S: FrameSource,
    D: HandDetector<S::Frame>,
{
    pub fn connect(
        source: S,
        detector: D,
        camera: &CameraConfig,
        options: &DetectorOptions,
        on_update: UpdateCallback,
    ) -> Self {
        match GestureBridge::acquire(source, detector, camera, options, on_update) {
            Ok(bridge) => GestureControl::Active(bridge),
            Err(e) => {
                log::error!("[gesture] gesture control disabled: {e}");
                GestureControl::Disabled
            }
        }
    }

    pub fn pump(&mut self) -> bool {
        match self {
            GestureControl::Active(bridge) => bridge.pump(),
            GestureControl::Disabled => false,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, GestureControl::Active(_))
    }
}
