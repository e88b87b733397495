use instant::Instant;

/// Timing for one displayed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick (0 on the first).
    pub dt: f32,
    /// Seconds since the clock was created.
    pub elapsed: f32,
}

pub struct FrameClock {
    start: Instant,
    last: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: None,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = self
            .last
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        FrameTime {
            dt,
            elapsed: (now - self.start).as_secs_f32(),
        }
    }
}
