/// Linear alpha tween advanced by `tick`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    alpha: f32,
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    running: bool,
}

impl Fade {
    pub fn hidden() -> Self {
        Self {
            alpha: 0.0,
            from: 0.0,
            to: 0.0,
            duration: 0.0,
            elapsed: 0.0,
            running: false,
        }
    }

    /// Start fading toward `to`. Without `from` the fade continues from the
    /// current alpha. Replaces any fade in progress.
    pub fn start(&mut self, from: Option<f32>, to: f32, duration: f32) {
        if let Some(from) = from {
            self.alpha = from;
        }
        self.from = self.alpha;
        self.to = to;
        self.duration = duration.max(0.0);
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Advance and return the new alpha while a fade is running
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        if !self.running {
            return None;
        }

        self.elapsed += dt;
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        };
        self.alpha = self.from + (self.to - self.from) * t;
        if t >= 1.0 {
            self.alpha = self.to;
            self.running = false;
        }
        Some(self.alpha)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Alpha the fade ends at (the current alpha when idle)
    pub fn target(&self) -> f32 {
        if self.running { self.to } else { self.alpha }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for Fade {
    fn default() -> Self {
        Self::hidden()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_out() {
        let mut fade = Fade::hidden();
        assert_eq!(fade.tick(0.1), None);

        fade.start(Some(0.0), 1.0, 0.5);
        assert_eq!(fade.tick(0.25), Some(0.5));
        assert_eq!(fade.tick(0.5), Some(1.0));
        assert!(!fade.is_running());

        fade.start(None, 0.0, 1.0);
        assert_eq!(fade.tick(0.5), Some(0.5));
        assert_eq!(fade.target(), 0.0);

        // Retarget mid-fade from the current alpha
        fade.start(None, 1.0, 0.5);
        assert_eq!(fade.tick(0.25), Some(0.75));
    }

    #[test]
    fn test_zero_duration() {
        let mut fade = Fade::hidden();
        fade.start(None, 1.0, 0.0);
        assert_eq!(fade.tick(0.0), Some(1.0));
        assert!(!fade.is_running());
    }
}
