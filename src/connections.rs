//! Proximity links between particles.
//!
//! Every unordered pair is tested once per frame. There is no spatial index:
//! the particle count is capped by surface area, which keeps the pair count
//! small enough for an exhaustive pass.

use crate::particle::Particle;

/// A link between two particles closer than the link distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the first particle. Always less than `to`.
    pub from: usize,
    /// Index of the second particle.
    pub to: usize,
    /// Distance between the two particles in pixels.
    pub distance: f32,
    /// Stroke alpha for the link.
    pub alpha: f32,
}

/// Stroke alpha for a link of length `distance`.
///
/// Fades linearly from `max_alpha` at zero length to nothing at `max_distance`.
#[inline]
pub fn link_alpha(distance: f32, max_distance: f32, max_alpha: f32) -> f32 {
    (1.0 - distance / max_distance) * max_alpha
}

/// Iterator over every linked pair `(i, j)` with `i < j`, in index order.
pub struct Connections<'a> {
    particles: &'a [Particle],
    max_distance: f32,
    max_alpha: f32,
    i: usize,
    j: usize,
}

impl<'a> Connections<'a> {
    pub fn new(particles: &'a [Particle], max_distance: f32, max_alpha: f32) -> Self {
        Self {
            particles,
            max_distance,
            max_alpha,
            i: 0,
            j: 1,
        }
    }
}

impl Iterator for Connections<'_> {
    type Item = Connection;

    fn next(&mut self) -> Option<Connection> {
        let n = self.particles.len();
        while self.i < n {
            while self.j < n {
                let (i, j) = (self.i, self.j);
                self.j += 1;

                let distance = self.particles[i].position.distance(self.particles[j].position);
                if distance < self.max_distance {
                    return Some(Connection {
                        from: i,
                        to: j,
                        distance,
                        alpha: link_alpha(distance, self.max_distance, self.max_alpha),
                    });
                }
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Fade;
    use glam::Vec2;

    fn at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 1.0, 0.5, Fade::In)
    }

    #[test]
    fn test_link_alpha_endpoints() {
        assert!((link_alpha(0.0, 120.0, 0.15) - 0.15).abs() < 1e-6);
        assert!((link_alpha(60.0, 120.0, 0.15) - 0.075).abs() < 1e-6);
        assert!(link_alpha(120.0, 120.0, 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_pairs_at_or_beyond_distance_are_not_linked() {
        let particles = [at(0.0, 0.0), at(120.0, 0.0), at(0.0, 200.0)];
        assert_eq!(Connections::new(&particles, 120.0, 0.15).count(), 0);
    }

    #[test]
    fn test_coincident_particles_link_at_full_alpha() {
        let particles = [at(10.0, 10.0), at(10.0, 10.0)];
        let links: Vec<_> = Connections::new(&particles, 120.0, 0.15).collect();

        assert_eq!(links.len(), 1);
        assert_eq!((links[0].from, links[0].to), (0, 1));
        assert_eq!(links[0].distance, 0.0);
        assert!((links[0].alpha - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_pairs_are_unordered_and_in_index_order() {
        // Four particles all within range of each other.
        let particles = [at(0.0, 0.0), at(10.0, 0.0), at(0.0, 10.0), at(10.0, 10.0)];
        let pairs: Vec<_> = Connections::new(&particles, 120.0, 0.15)
            .map(|c| (c.from, c.to))
            .collect();

        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(Connections::new(&[], 120.0, 0.15).count(), 0);
        assert_eq!(Connections::new(&[at(1.0, 1.0)], 120.0, 0.15).count(), 0);
    }
}
