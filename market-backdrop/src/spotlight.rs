//! Pointer-tracked spotlight
//!
//! Radius eases toward a target every frame. The target depends on pointer
//! speed while tracking and drops to zero when the pointer enters the
//! exclusion band, leaves the window, or sits idle past the timeout.

use tokio::time::{Duration, Instant};

use crate::config::SpotlightConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotlightPhase {
    /// Target radius is zero: pointer outside, in the exclusion band, or wheeled away
    Hidden,
    /// Pointer moving; target follows speed
    Tracking,
    /// Idle timeout elapsed; collapsing until the next move
    IdleDecay,
}

#[derive(Debug, Clone)]
pub struct Spotlight {
    config: SpotlightConfig,
    phase: SpotlightPhase,
    radius: f64,
    target: f64,
    pointer: Option<(f64, f64)>,
    center: (f64, f64),
    last_move: Option<Instant>,
    idle_deadline: Option<Instant>,
}

impl Spotlight {
    pub fn new(config: SpotlightConfig) -> Self {
        Self {
            config,
            phase: SpotlightPhase::Hidden,
            radius: 0.0,
            target: 0.0,
            pointer: None,
            center: (0.0, 0.0),
            last_move: None,
            idle_deadline: None,
        }
    }

    pub fn phase(&self) -> SpotlightPhase {
        self.phase
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Eased centre in pixel space
    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn config(&self) -> &SpotlightConfig {
        &self.config
    }

    /// Target radius for a pointer moving at `speed` px/s
    pub fn target_for_speed(&self, speed: f64) -> f64 {
        let c = &self.config;
        (c.base_radius + speed * c.speed_gain).clamp(c.min_radius, c.max_radius)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now: Instant) {
        if y < self.config.exclusion_band {
            self.hide();
            return;
        }

        let speed = match (self.pointer, self.last_move) {
            (Some((px, py)), Some(last)) => {
                let dt_ms = (now.saturating_duration_since(last).as_secs_f64() * 1000.0).max(1.0);
                (x - px).hypot(y - py) / dt_ms * 1000.0
            }
            _ => 0.0,
        };

        // Reappearing from nothing starts at the pointer instead of sliding in
        if self.phase == SpotlightPhase::Hidden && self.radius < 1.0 {
            self.center = (x, y);
        }

        self.pointer = Some((x, y));
        self.target = self.target_for_speed(speed);
        self.phase = SpotlightPhase::Tracking;
        self.last_move = Some(now);
        self.idle_deadline = Some(now + self.config.idle_timeout());
    }

    pub fn pointer_leave(&mut self) {
        self.hide();
    }

    /// Scrolling without recent pointer motion hides the spotlight
    pub fn wheel(&mut self, now: Instant) {
        let stale = self
            .last_move
            .map(|last| now.saturating_duration_since(last) > self.config.wheel_hide())
            .unwrap_or(true);
        if stale {
            self.hide();
        }
    }

    /// Advance one frame: fire the idle deadline, then ease radius and centre
    pub fn tick(&mut self, now: Instant) {
        if self.phase == SpotlightPhase::Tracking
            && self.idle_deadline.is_some_and(|deadline| now >= deadline)
        {
            self.phase = SpotlightPhase::IdleDecay;
            self.target = 0.0;
            self.idle_deadline = None;
        }

        self.radius += (self.target - self.radius) * self.config.easing;

        if let Some((px, py)) = self.pointer {
            let k = self.config.center_easing;
            self.center.0 += (px - self.center.0) * k;
            self.center.1 += (py - self.center.1) * k;
        }
    }

    /// Time until the idle deadline fires, if armed
    pub fn idle_remaining(&self, now: Instant) -> Option<Duration> {
        self.idle_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    fn hide(&mut self) {
        self.phase = SpotlightPhase::Hidden;
        self.target = 0.0;
        self.idle_deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use proptest::prelude::*;

    fn terminal() -> Spotlight {
        Spotlight::new(Preset::Terminal.spotlight())
    }

    #[test]
    fn test_move_outside_band_tracks() {
        let mut s = terminal();
        let t0 = Instant::now();
        s.pointer_move(400.0, 300.0, t0);
        assert_eq!(s.phase(), SpotlightPhase::Tracking);
        assert_eq!(s.target(), 360.0);
        assert_eq!(s.center(), (400.0, 300.0));
    }

    #[test]
    fn test_move_inside_band_hides() {
        let mut s = terminal();
        let t0 = Instant::now();
        s.pointer_move(400.0, 300.0, t0);
        s.pointer_move(400.0, 59.0, t0 + Duration::from_millis(16));
        assert_eq!(s.phase(), SpotlightPhase::Hidden);
        assert_eq!(s.target(), 0.0);
        assert_eq!(s.idle_remaining(t0), None);
    }

    #[test]
    fn test_radius_converges_geometrically() {
        let mut s = terminal();
        let t0 = Instant::now();
        s.pointer_move(400.0, 300.0, t0);
        let k = s.config().easing;
        for n in 1..=40 {
            s.tick(t0 + Duration::from_millis(16 * n));
            let expected = 360.0 * (1.0 - (1.0 - k).powi(n as i32));
            assert!((s.radius() - expected).abs() < 1e-9, "frame {}: {} vs {}", n, s.radius(), expected);
        }
    }

    #[test]
    fn test_idle_timeout_decays_to_zero() {
        let mut s = terminal();
        let t0 = Instant::now();
        s.pointer_move(400.0, 300.0, t0);
        for n in 1..=180 {
            s.tick(t0 + Duration::from_millis(16 * n));
        }
        assert_eq!(s.phase(), SpotlightPhase::Tracking);
        let peak = s.radius();
        assert!(peak > 359.0);

        s.tick(t0 + Duration::from_millis(3_000));
        assert_eq!(s.phase(), SpotlightPhase::IdleDecay);
        assert_eq!(s.target(), 0.0);
        assert!(s.radius() < peak);

        for n in 1..=300 {
            s.tick(t0 + Duration::from_millis(3_000 + 16 * n));
        }
        assert!(s.radius() < 1e-6);
    }

    #[test]
    fn test_move_resets_idle_deadline() {
        let mut s = terminal();
        let t0 = Instant::now();
        s.pointer_move(400.0, 300.0, t0);
        s.pointer_move(410.0, 300.0, t0 + Duration::from_millis(2_500));
        s.tick(t0 + Duration::from_millis(3_500));
        assert_eq!(s.phase(), SpotlightPhase::Tracking);
        assert_eq!(s.idle_remaining(t0 + Duration::from_millis(3_500)), Some(Duration::from_millis(2_000)));
    }

    #[test]
    fn test_speed_scales_hover_target() {
        let mut s = Spotlight::new(Preset::Hover.spotlight());
        let t0 = Instant::now();
        s.pointer_move(100.0, 100.0, t0);
        assert_eq!(s.target(), 220.0);
        // 300 px in 100 ms = 3000 px/s → 220 + 180 = 400, clamped to 380
        s.pointer_move(400.0, 100.0, t0 + Duration::from_millis(100));
        assert_eq!(s.target(), 380.0);
        // 10 px in 1 s = 10 px/s → 220.6
        s.pointer_move(410.0, 100.0, t0 + Duration::from_millis(1_100));
        assert!((s.target() - 220.6).abs() < 1e-9);
    }

    #[test]
    fn test_center_eases_toward_pointer() {
        let mut s = Spotlight::new(Preset::Hover.spotlight());
        let t0 = Instant::now();
        s.pointer_move(100.0, 300.0, t0);
        s.tick(t0);
        s.pointer_move(200.0, 300.0, t0 + Duration::from_millis(16));
        s.tick(t0 + Duration::from_millis(16));
        assert!((s.center().0 - 118.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_hides_only_when_pointer_quiet() {
        let mut s = terminal();
        let t0 = Instant::now();
        s.pointer_move(400.0, 300.0, t0);
        s.wheel(t0 + Duration::from_millis(200));
        assert_eq!(s.phase(), SpotlightPhase::Tracking);
        s.wheel(t0 + Duration::from_millis(401));
        assert_eq!(s.phase(), SpotlightPhase::Hidden);
    }

    #[test]
    fn test_leave_hides() {
        let mut s = terminal();
        let t0 = Instant::now();
        s.pointer_move(400.0, 300.0, t0);
        s.pointer_leave();
        assert_eq!(s.phase(), SpotlightPhase::Hidden);
        assert_eq!(s.target(), 0.0);
    }

    proptest! {
        #[test]
        fn proptest_tracking_target_within_bounds(
            dx in -2000.0f64..2000.0,
            dy in 0.0f64..2000.0,
            dt in 0u64..500,
        ) {
            let mut s = Spotlight::new(Preset::Hover.spotlight());
            let t0 = Instant::now();
            s.pointer_move(500.0, 500.0, t0);
            s.pointer_move(500.0 + dx, 500.0 + dy, t0 + Duration::from_millis(dt));
            let c = *s.config();
            prop_assert!(s.target() >= c.min_radius && s.target() <= c.max_radius);
        }

        #[test]
        fn proptest_radius_never_overshoots(frames in 1usize..400) {
            let mut s = Spotlight::new(Preset::Compact.spotlight());
            let t0 = Instant::now();
            s.pointer_move(500.0, 500.0, t0);
            for n in 0..frames {
                s.tick(t0 + Duration::from_millis(n as u64));
                prop_assert!(s.radius() <= s.target() + 1e-9);
            }
        }
    }
}
