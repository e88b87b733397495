/// Exponentially smoothed scalar in \[0, 1\] driving a field's interpolation.
///
/// Starts at 0 and only ever moves toward its target by a fraction
/// `min(1, dt * rate)` of the remaining distance, so it cannot overshoot.
#[derive(Clone, Copy, Debug)]
pub struct Progress {
    value: f32,
    rate: f32,
}

impl Progress {
    pub fn new(rate: f32) -> Self {
        Self { value: 0.0, rate }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Advance one tick toward `target` and return the new value.
    pub fn step(&mut self, target: f32, dt: f32) -> f32 {
        let alpha = (dt * self.rate).clamp(0.0, 1.0);
        self.value += (target - self.value) * alpha;
        self.value = self.value.clamp(0.0, 1.0);
        self.value
    }
}
