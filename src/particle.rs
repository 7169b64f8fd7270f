use glam::Vec2;
use rand::Rng;

use crate::preset::FieldPreset;

/// Translucent color: opaque RGB channels plus a separate alpha in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tint {
    pub rgb: [u8; 3],
    pub alpha: f32,
}

impl Tint {
    pub const fn new(rgb: [u8; 3], alpha: f32) -> Self {
        Self { rgb, alpha }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Surface units per frame.
    pub velocity: Vec2,
    pub radius: f32,
    pub tint: Tint,
}

impl Particle {
    /// Draws a particle uniformly inside `bounds` using the preset's ranges.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2, preset: &FieldPreset) -> Self {
        let speed = preset.max_speed;
        Self {
            position: Vec2::new(rng.gen_range(0.0..=bounds.x), rng.gen_range(0.0..=bounds.y)),
            velocity: Vec2::new(rng.gen_range(-speed..=speed), rng.gen_range(-speed..=speed)),
            radius: rng.gen_range(preset.radius.min..=preset.radius.max),
            tint: Tint::new(preset.color, rng.gen_range(preset.alpha.min..=preset.alpha.max)),
        }
    }

    /// Moves by one frame of velocity, then flips any velocity component whose
    /// axis left `[0, bounds]`. The position itself is not clamped, so a
    /// particle may sit outside the surface for a single frame.
    pub fn advance(&mut self, bounds: Vec2) {
        self.position += self.velocity;

        if self.position.x < 0.0 || self.position.x > bounds.x {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > bounds.y {
            self.velocity.y = -self.velocity.y;
        }
    }

    pub fn apply_displacement(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn still(position: Vec2, velocity: Vec2) -> Particle {
        Particle {
            position,
            velocity,
            radius: 1.0,
            tint: Tint::new([255, 255, 255], 0.5),
        }
    }

    #[test]
    fn spawn_respects_preset_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        let preset = FieldPreset::reactive();
        let bounds = Vec2::new(640.0, 480.0);

        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, bounds, &preset);
            assert!((0.0..=bounds.x).contains(&p.position.x));
            assert!((0.0..=bounds.y).contains(&p.position.y));
            assert!(p.velocity.x.abs() <= preset.max_speed);
            assert!(p.velocity.y.abs() <= preset.max_speed);
            assert!(preset.radius.contains(p.radius));
            assert!(preset.alpha.contains(p.tint.alpha));
            assert_eq!(p.tint.rgb, preset.color);
        }
    }

    #[test]
    fn crossing_right_edge_flips_horizontal_velocity_only() {
        let mut p = still(Vec2::new(99.9, 50.0), Vec2::new(0.15, 0.1));
        p.advance(Vec2::new(100.0, 100.0));

        assert!(p.position.x > 100.0, "overshoot is allowed for one frame");
        assert_eq!(p.velocity, Vec2::new(-0.15, 0.1));

        p.advance(Vec2::new(100.0, 100.0));
        assert!(p.position.x < 100.0);
        assert_eq!(p.velocity.x, -0.15);
    }

    #[test]
    fn crossing_top_edge_flips_vertical_velocity() {
        let mut p = still(Vec2::new(10.0, 0.02), Vec2::new(0.0, -0.05));
        p.advance(Vec2::new(100.0, 100.0));
        assert_eq!(p.velocity.y, 0.05);
    }

    #[test]
    fn positions_stay_within_one_step_of_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let preset = FieldPreset {
            max_speed: 3.0,
            ..FieldPreset::ambient()
        };
        let bounds = Vec2::new(120.0, 80.0);
        let mut particles: Vec<_> = (0..64)
            .map(|_| Particle::spawn(&mut rng, bounds, &preset))
            .collect();

        for _ in 0..5000 {
            for p in &mut particles {
                p.advance(bounds);
                let slack = p.velocity.abs() + Vec2::splat(1e-3);
                assert!(p.position.x >= -slack.x && p.position.x <= bounds.x + slack.x);
                assert!(p.position.y >= -slack.y && p.position.y <= bounds.y + slack.y);
            }
        }
    }
}
