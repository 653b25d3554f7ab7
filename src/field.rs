//! The particle field: a fixed set of particles on a resizable surface.
//!
//! # Frame structure
//!
//! [`ParticleField::advance_frame`] runs the simulation step for every
//! particle and then draws the frame:
//!
//! 1. integrate position
//! 2. pointer attraction
//! 3. friction
//! 4. wall reflection
//! 5. opacity oscillation
//!
//! followed by clear, particles (disc + glow) and proximity links.
//!
//! The update and draw halves are also available separately as
//! [`update`](ParticleField::update) and [`draw`](ParticleField::draw).

use glam::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::config::FieldConfig;
use crate::error::ConfigError;
use crate::connections::Connections;
use crate::events::FieldEvent;
use crate::particle::Particle;

/// Number of particles for a surface: `floor(width * height / area_per_particle)`.
///
/// Returns 0 for a zero-area surface or a non-positive area per particle.
pub fn particle_count_for(width: u32, height: u32, area_per_particle: f32) -> usize {
    if area_per_particle.is_nan() || area_per_particle <= 0.0 {
        return 0;
    }
    let area = width as f64 * height as f64;
    (area / area_per_particle as f64).floor() as usize
}

/// What one drawn frame contained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub connections: usize,
}

/// An ambient particle field.
///
/// The particle count is fixed when the field is created. Resizing changes the
/// walls but never adds, removes or moves particles; any that end up outside
/// are reflected back in by subsequent frames.
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: u32,
    height: u32,
    particles: Vec<Particle>,
    pointer: Vec2,
    config: FieldConfig,
}

impl ParticleField {
    /// Create a field with the default tuning.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, FieldConfig::default())
    }

    /// Validate `config`, then create the field.
    pub fn try_with_config(
        width: u32,
        height: u32,
        config: FieldConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(width, height, config))
    }

    /// Create a field and spawn its particles.
    ///
    /// `config` is used as given. Spawning never panics, but the bounds and
    /// opacity guarantees only hold for a config that passes
    /// [`FieldConfig::validate`]; use [`try_with_config`](Self::try_with_config)
    /// for configs from outside the program.
    pub fn with_config(width: u32, height: u32, config: FieldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let count = particle_count_for(width, height, config.area_per_particle);
        let bounds = Vec2::new(width as f32, height as f32);
        let particles = (0..count)
            .map(|_| Particle::spawn(&mut rng, bounds, &config))
            .collect();

        info!(width, height, count, "particle field created");

        Self::from_particles(width, height, config, particles)
    }

    /// Create a field from explicit particles.
    pub fn from_particles(
        width: u32,
        height: u32,
        config: FieldConfig,
        particles: Vec<Particle>,
    ) -> Self {
        Self {
            width,
            height,
            particles,
            pointer: Vec2::ZERO,
            config,
        }
    }

    /// Change the walls. Particles are left where they are.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            debug!(width, height, "particle field resized");
        }
        self.width = width;
        self.height = height;
    }

    /// Record the pointer position used by the next frame's attraction step.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
    }

    /// Apply a host event.
    pub fn apply(&mut self, event: FieldEvent) {
        match event {
            FieldEvent::Resize { width, height } => self.resize(width, height),
            FieldEvent::PointerMove { x, y } => self.set_pointer(x, y),
        }
    }

    /// Simulate one frame and draw it.
    pub fn advance_frame<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> FrameStats {
        self.update();
        self.draw(canvas)
    }

    /// Run the simulation step for every particle, in collection order.
    pub fn update(&mut self) {
        let bounds = self.bounds();
        let pointer = self.pointer;
        for particle in &mut self.particles {
            particle.step(pointer, bounds, &self.config);
        }
    }

    /// Draw the current state. Does not touch simulation state.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) -> FrameStats {
        let [r, g, b] = self.config.color;

        canvas.clear();

        for particle in &self.particles {
            canvas.fill_disc(
                particle.position,
                particle.size(),
                Vec4::new(r, g, b, particle.opacity),
            );
            canvas.fill_glow(
                particle.position,
                particle.size() * self.config.glow_scale,
                Vec4::new(r, g, b, particle.opacity * self.config.glow_intensity),
            );
        }

        let mut connections = 0;
        for link in self.connections() {
            canvas.stroke_line(
                self.particles[link.from].position,
                self.particles[link.to].position,
                self.config.link_width,
                Vec4::new(r, g, b, link.alpha),
            );
            connections += 1;
        }

        FrameStats {
            particles: self.particles.len(),
            connections,
        }
    }

    /// Pairs of particles close enough to be linked this frame.
    pub fn connections(&self) -> Connections<'_> {
        Connections::new(
            &self.particles,
            self.config.link_distance,
            self.config.link_opacity,
        )
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Surface size in pixels as `(width, height)`.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn bounds(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, NullCanvas, RecordingCanvas};
    use crate::particle::Fade;

    fn seeded(width: u32, height: u32) -> ParticleField {
        ParticleField::with_config(width, height, FieldConfig::default().with_seed(9))
    }

    #[test]
    fn test_particle_count_for() {
        assert_eq!(particle_count_for(1920, 1080, 15_000.0), 138);
        assert_eq!(particle_count_for(100, 100, 15_000.0), 0);
        assert_eq!(particle_count_for(0, 1080, 15_000.0), 0);
        assert_eq!(particle_count_for(1920, 1080, 0.0), 0);
    }

    #[test]
    fn test_try_with_config() {
        let field = ParticleField::try_with_config(800, 600, FieldConfig::default().with_seed(1))
            .expect("default config is valid");
        assert_eq!(field.len(), 32);

        let fast = FieldConfig::from_json_str(r#"{ "max_speed": 3e38, "seed": 1 }"#).unwrap();
        assert!(matches!(
            ParticleField::try_with_config(800, 600, fast),
            Err(ConfigError::Invalid { field: "max_speed", .. })
        ));
    }

    #[test]
    fn test_unvalidated_config_does_not_panic() {
        let fast = FieldConfig::from_json_str(r#"{ "max_speed": 3e38, "seed": 1 }"#).unwrap();
        let mut field = ParticleField::with_config(800, 600, fast);
        field.advance_frame(&mut NullCanvas);
        assert_eq!(field.len(), 32);
    }

    #[test]
    fn test_particle_count_for_nan_area() {
        assert_eq!(particle_count_for(1920, 1080, f32::NAN), 0);
    }

    #[test]
    fn test_pointer_defaults_to_origin() {
        let field = seeded(800, 600);
        assert_eq!(field.pointer(), Vec2::ZERO);
    }

    #[test]
    fn test_same_seed_same_particles() {
        let a = seeded(800, 600);
        let b = seeded(800, 600);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_apply_events() {
        let mut field = seeded(800, 600);
        field.apply(FieldEvent::PointerMove { x: 5.0, y: 6.0 });
        field.apply(FieldEvent::Resize { width: 300, height: 200 });

        assert_eq!(field.pointer(), Vec2::new(5.0, 6.0));
        assert_eq!(field.size(), (300, 200));
        assert_eq!(field.len(), 32);
    }

    #[test]
    fn test_draw_order() {
        let particles = vec![
            Particle::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0, 0.5, Fade::In),
            Particle::new(Vec2::new(40.0, 10.0), Vec2::ZERO, 3.0, 0.4, Fade::Out),
        ];
        let field = ParticleField::from_particles(100, 100, FieldConfig::default(), particles);
        let mut canvas = RecordingCanvas::new();
        let stats = field.draw(&mut canvas);

        assert_eq!(stats, FrameStats { particles: 2, connections: 1 });

        let commands = canvas.commands();
        assert_eq!(commands.len(), 6);
        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(matches!(commands[1], DrawCommand::Disc { radius, .. } if radius == 2.0));
        assert!(matches!(commands[2], DrawCommand::Glow { radius, .. } if radius == 6.0));
        assert!(matches!(commands[3], DrawCommand::Disc { radius, .. } if radius == 3.0));
        assert!(matches!(commands[4], DrawCommand::Glow { radius, .. } if radius == 9.0));
        assert!(matches!(commands[5], DrawCommand::Line { width, .. } if width == 0.5));
    }

    #[test]
    fn test_glow_alpha_is_fraction_of_opacity() {
        let particles = vec![Particle::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0, 0.5, Fade::In)];
        let field = ParticleField::from_particles(100, 100, FieldConfig::default(), particles);
        let mut canvas = RecordingCanvas::new();
        field.draw(&mut canvas);

        match canvas.commands()[2] {
            DrawCommand::Glow { color, .. } => assert!((color.w - 0.15).abs() < 1e-6),
            other => panic!("expected glow, got {:?}", other),
        }
    }

    #[test]
    fn test_draw_does_not_mutate() {
        let field = seeded(800, 600);
        let before = field.particles().to_vec();
        field.draw(&mut NullCanvas);
        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn test_update_matches_individual_steps() {
        let config = FieldConfig::default();
        let start = Particle::new(Vec2::new(50.0, 50.0), Vec2::new(0.2, -0.1), 2.0, 0.4, Fade::In);
        let mut field = ParticleField::from_particles(200, 200, config.clone(), vec![start]);
        field.set_pointer(80.0, 90.0);
        field.update();

        let mut expected = start;
        expected.step(Vec2::new(80.0, 90.0), Vec2::new(200.0, 200.0), &config);
        assert_eq!(field.particles()[0], expected);
    }
}
