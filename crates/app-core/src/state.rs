//! Shared scene state: the current [`Mode`] and the hand-driven [`PanOffset`].
//!
//! Both the render tick and the camera-frame callback run on one logical
//! thread, so the container is an `Rc<RefCell<_>>` handle. Writes go through
//! [`SharedState::apply`] only (the gesture bridge callback); everything else
//! reads a [`AppState`] snapshot once per frame. Last write wins.

use crate::gesture::GestureUpdate;
use glam::{Vec2, Vec3};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Which shape the scene is heading toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Cohesive cone.
    #[default]
    Formed,
    /// Dispersed sphere.
    Chaos,
}

impl Mode {
    /// Progress value the fields smooth toward in this mode.
    #[inline]
    pub fn target_progress(self) -> f32 {
        match self {
            Mode::Formed => 0.0,
            Mode::Chaos => 1.0,
        }
    }

    /// The camera drifts around the tree only while it is assembled.
    #[inline]
    pub fn auto_rotates(self) -> bool {
        self == Mode::Formed
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Formed => "FORMED",
            Mode::Chaos => "CHAOS",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Camera-space offset applied to the whole tree group.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanOffset {
    pub x: f32,
    pub y: f32,
}

impl PanOffset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Group translation in world space (pan never moves along z).
    #[inline]
    pub fn translation(self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }
}

/// Value snapshot of the shared state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AppState {
    pub mode: Mode,
    pub pan: PanOffset,
    /// Bumped whenever `mode` or `pan` actually changes.
    pub revision: u64,
}

#[derive(Clone, Default)]
pub struct SharedState {
    inner: Rc<RefCell<AppState>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a gesture update. Returns `true` if anything changed.
    pub fn apply(&self, update: GestureUpdate) -> bool {
        let mut s = self.inner.borrow_mut();
        let changed = s.mode != update.mode || s.pan != update.pan;
        if changed {
            if s.mode != update.mode {
                log::info!("[state] mode {} -> {}", s.mode, update.mode);
            }
            s.mode = update.mode;
            s.pan = update.pan;
            s.revision = s.revision.wrapping_add(1);
        }
        changed
    }

    #[inline]
    pub fn snapshot(&self) -> AppState {
        *self.inner.borrow()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.inner.borrow().mode
    }

    #[inline]
    pub fn pan(&self) -> PanOffset {
        self.inner.borrow().pan
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }
}
