//! A single simulated point and its per-frame update steps.
//!
//! Each step is a separate method so the order used by
//! [`ParticleField::update`](crate::ParticleField::update) is explicit and
//! each step can be tested on its own.

use glam::Vec2;
use rand::Rng;

use crate::config::FieldConfig;

/// Direction of the opacity oscillation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    /// Opacity increases each frame.
    In,
    /// Opacity decreases each frame.
    Out,
}

impl Fade {
    /// `+1.0` for [`Fade::In`], `-1.0` for [`Fade::Out`].
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Fade::In => 1.0,
            Fade::Out => -1.0,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Fade::In => Fade::Out,
            Fade::Out => Fade::In,
        }
    }
}

/// One point of the field.
///
/// `size` is fixed at creation; everything else is rewritten every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in surface pixels.
    pub position: Vec2,
    /// Velocity in pixels per frame.
    pub velocity: Vec2,
    /// Current alpha, oscillating between the configured bounds.
    pub opacity: f32,
    /// Which way `opacity` is moving.
    pub fade: Fade,
    size: f32,
}

impl Particle {
    /// Create a particle with explicit state.
    pub fn new(position: Vec2, velocity: Vec2, size: f32, opacity: f32, fade: Fade) -> Self {
        Self {
            position,
            velocity,
            opacity,
            fade,
            size,
        }
    }

    /// Draw a fresh particle somewhere on a surface of `bounds` pixels.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2, config: &FieldConfig) -> Self {
        let position = Vec2::new(rng.gen_range(0.0..=bounds.x), rng.gen_range(0.0..=bounds.y));
        let speed = config.max_speed.abs();
        let velocity = Vec2::new(uniform(rng, -speed, speed), uniform(rng, -speed, speed));
        let size = uniform(rng, config.min_size, config.max_size);
        let opacity = uniform(rng, config.spawn_opacity_min, config.spawn_opacity_max);
        let fade = if rng.gen_bool(0.5) { Fade::In } else { Fade::Out };

        Self::new(position, velocity, size, opacity, fade)
    }

    /// Radius in pixels.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Run every update step for one frame, in order.
    pub fn step(&mut self, pointer: Vec2, bounds: Vec2, config: &FieldConfig) {
        self.integrate();
        self.attract(pointer, config.attraction_radius, config.attraction_strength);
        self.apply_friction(config.friction);
        self.reflect(bounds);
        self.oscillate(config.fade_step, config.min_opacity, config.max_opacity);
    }

    /// Euler step: one frame of motion.
    #[inline]
    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }

    /// Pull towards `pointer` when it is closer than `radius`.
    ///
    /// The impulse falls off linearly from `strength` at the pointer to zero at
    /// `radius`. A pointer exactly on the particle has no direction and adds
    /// nothing.
    pub fn attract(&mut self, pointer: Vec2, radius: f32, strength: f32) {
        let delta = pointer - self.position;
        let distance = delta.length();
        if distance > 0.0 && distance < radius {
            let force = (radius - distance) / radius * strength;
            self.velocity += delta / distance * force;
        }
    }

    #[inline]
    pub fn apply_friction(&mut self, friction: f32) {
        self.velocity *= friction;
    }

    /// Reflect off the walls of `[0, bounds.x] x [0, bounds.y]`.
    ///
    /// Each axis is handled on its own: the velocity component is negated and
    /// the position clamped back onto the wall.
    pub fn reflect(&mut self, bounds: Vec2) {
        if self.position.x < 0.0 || self.position.x > bounds.x {
            self.velocity.x = -self.velocity.x;
            self.position.x = self.position.x.clamp(0.0, bounds.x);
        }
        if self.position.y < 0.0 || self.position.y > bounds.y {
            self.velocity.y = -self.velocity.y;
            self.position.y = self.position.y.clamp(0.0, bounds.y);
        }
    }

    /// Move opacity one step and turn around at either bound.
    ///
    /// The bound check uses the value just written, so the frame that reaches
    /// a bound is also the frame that reverses.
    pub fn oscillate(&mut self, step: f32, min: f32, max: f32) {
        self.opacity += step * self.fade.sign();
        if self.opacity >= max || self.opacity <= min {
            self.fade = self.fade.reversed();
        }
    }
}

/// Uniform in `[lo, hi)`, or `lo` when the range is empty or too wide to sample.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo && (hi - lo).is_finite() {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 2.0, 0.5, Fade::In)
    }

    #[test]
    fn test_spawn_ranges() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = Vec2::new(640.0, 480.0);

        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, bounds, &config);
            assert!((0.0..=640.0).contains(&p.position.x));
            assert!((0.0..=480.0).contains(&p.position.y));
            assert!(p.velocity.x.abs() <= 0.25 && p.velocity.y.abs() <= 0.25);
            assert!(p.size() >= 1.0 && p.size() < 4.0);
            assert!(p.opacity >= 0.2 && p.opacity < 0.7);
        }
    }

    #[test]
    fn test_spawn_uses_both_fade_directions() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let fades: Vec<Fade> = (0..64)
            .map(|_| Particle::spawn(&mut rng, Vec2::splat(100.0), &config).fade)
            .collect();

        assert!(fades.contains(&Fade::In));
        assert!(fades.contains(&Fade::Out));
    }

    #[test]
    fn test_spawn_survives_unsampleable_ranges() {
        let config = FieldConfig {
            max_speed: 3e38,
            spawn_opacity_min: -3e38,
            max_size: f32::INFINITY,
            ..FieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let p = Particle::spawn(&mut rng, Vec2::new(100.0, 100.0), &config);

        assert_eq!(p.velocity, Vec2::new(-3e38, -3e38));
        assert!(p.opacity.is_finite() && p.opacity < 0.7);
        assert_eq!(p.size(), 1.0);
    }

    #[test]
    fn test_spawn_with_empty_size_range() {
        let config = FieldConfig {
            min_size: 2.0,
            max_size: 2.0,
            ..FieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let p = Particle::spawn(&mut rng, Vec2::splat(10.0), &config);
        assert_eq!(p.size(), 2.0);
    }

    #[test]
    fn test_attraction_points_at_pointer() {
        let mut p = still(100.0, 100.0);
        p.attract(Vec2::new(130.0, 100.0), 150.0, 0.01);

        let expected = (150.0 - 30.0) / 150.0 * 0.01;
        assert!((p.velocity.x - expected).abs() < 1e-6);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn test_attraction_outside_radius_is_ignored() {
        let mut p = still(0.0, 0.0);
        p.attract(Vec2::new(150.0, 0.0), 150.0, 0.01);
        assert_eq!(p.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_attraction_at_zero_distance_is_skipped() {
        let mut p = still(42.0, 24.0);
        p.attract(Vec2::new(42.0, 24.0), 150.0, 0.01);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert!(p.velocity.is_finite());
    }

    #[test]
    fn test_friction_decays_velocity() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(1.0, -2.0), 1.0, 0.5, Fade::In);
        p.apply_friction(0.99);
        assert!((p.velocity.x - 0.99).abs() < 1e-6);
        assert!((p.velocity.y + 1.98).abs() < 1e-6);
    }

    #[test]
    fn test_reflect_flips_and_clamps_each_axis() {
        let mut p = Particle::new(Vec2::new(-3.0, 50.0), Vec2::new(-1.0, 0.5), 1.0, 0.5, Fade::In);
        p.reflect(Vec2::new(100.0, 100.0));
        assert_eq!(p.position, Vec2::new(0.0, 50.0));
        assert_eq!(p.velocity, Vec2::new(1.0, 0.5));

        let mut p = Particle::new(Vec2::new(50.0, 130.0), Vec2::new(0.2, 1.0), 1.0, 0.5, Fade::In);
        p.reflect(Vec2::new(100.0, 100.0));
        assert_eq!(p.position, Vec2::new(50.0, 100.0));
        assert_eq!(p.velocity, Vec2::new(0.2, -1.0));
    }

    #[test]
    fn test_reflect_leaves_wall_contact_alone() {
        let mut p = Particle::new(Vec2::new(0.0, 100.0), Vec2::new(-1.0, 1.0), 1.0, 0.5, Fade::In);
        p.reflect(Vec2::new(100.0, 100.0));
        assert_eq!(p.velocity, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_oscillate_below_bound_keeps_direction() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 0.69, Fade::In);
        p.oscillate(0.005, 0.1, 0.7);
        assert!((p.opacity - 0.695).abs() < 1e-6);
        assert_eq!(p.fade, Fade::In);
    }

    #[test]
    fn test_oscillate_reverses_on_the_frame_it_crosses() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 0.698, Fade::In);
        p.oscillate(0.005, 0.1, 0.7);
        assert!((p.opacity - 0.703).abs() < 1e-6);
        assert_eq!(p.fade, Fade::Out);

        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 0.104, Fade::Out);
        p.oscillate(0.005, 0.1, 0.7);
        assert_eq!(p.fade, Fade::In);
    }

    #[test]
    fn test_fade_helpers() {
        assert_eq!(Fade::In.sign(), 1.0);
        assert_eq!(Fade::Out.sign(), -1.0);
        assert_eq!(Fade::In.reversed(), Fade::Out);
        assert_eq!(Fade::Out.reversed().reversed(), Fade::Out);
    }
}
