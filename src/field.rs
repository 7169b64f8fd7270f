use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};

use crate::links::collect_links;
use crate::particle::{Particle, Tint};
use crate::pointer::PointerState;
use crate::preset::FieldPreset;
use crate::surface::Surface;

/// One animated particle field bound to a surface of a given size.
pub struct ParticleField {
    preset: FieldPreset,
    bounds: Vec2,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(preset: FieldPreset, seed: u64) -> Self {
        Self {
            preset,
            bounds: Vec2::ZERO,
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn preset(&self) -> &FieldPreset {
        &self.preset
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Resizes the surface to `viewport_width` x `container_height` and
    /// replaces the whole particle collection.
    ///
    /// A zero-sized (or nonsensical) surface leaves the field empty.
    pub fn resize(&mut self, viewport_width: f32, container_height: f32) {
        self.particles.clear();

        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(viewport_width) && valid(container_height)) {
            self.bounds = Vec2::ZERO;
            return;
        }

        self.bounds = Vec2::new(viewport_width, container_height);
        let count = self.preset.particle_count(viewport_width);
        let (rng, bounds, preset) = (&mut self.rng, self.bounds, &self.preset);
        self.particles
            .extend((0..count).map(|_| Particle::spawn(rng, bounds, preset)));

        tracing::debug!(
            field = %self.preset.name,
            width = viewport_width,
            height = container_height,
            count,
            "rebuilt particle field"
        );
    }

    /// Advances every particle by one frame.
    pub fn step(&mut self, pointer: Option<&PointerState>) {
        let push = self
            .preset
            .pointer
            .zip(pointer)
            .filter(|(_, state)| state.position().is_some());

        for particle in &mut self.particles {
            particle.advance(self.bounds);
            if let Some((config, state)) = push {
                particle.apply_displacement(state.displacement_for(particle.position, config.strength));
            }
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for particle in &self.particles {
            surface.fill_disc(particle.position, particle.radius, particle.tint);
        }

        let Some(config) = &self.preset.links else {
            return;
        };
        let base = Tint::new(self.preset.color, 0.0);
        for link in collect_links(&self.particles, config) {
            surface.stroke_line(
                link.from,
                link.to,
                config.width,
                base.with_alpha(link.opacity * config.dimming),
            );
        }
    }

    /// Clear, update, draw: one complete frame.
    pub fn render_frame<S: Surface + ?Sized>(&mut self, pointer: Option<&PointerState>, surface: &mut S) {
        surface.clear(self.bounds);
        self.step(pointer);
        self.draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Canvas, DrawCommand};

    #[test]
    fn resize_rebuilds_collection_from_width() {
        let mut field = ParticleField::new(FieldPreset::reactive(), 1);
        field.resize(450.0, 300.0);
        assert_eq!(field.particles().len(), 50);
        let before = field.particles().to_vec();

        field.resize(2000.0, 300.0);
        assert_eq!(field.particles().len(), 100);
        assert_eq!(field.bounds(), Vec2::new(2000.0, 300.0));
        assert_ne!(&field.particles()[..50], &before[..]);

        field.resize(450.0, 300.0);
        assert_eq!(field.particles().len(), 50);
    }

    #[test]
    fn zero_sized_container_renders_nothing() {
        let mut field = ParticleField::new(FieldPreset::reactive(), 1);
        field.resize(1200.0, 0.0);
        assert!(field.particles().is_empty());

        let mut canvas = Canvas::new();
        field.render_frame(None, &mut canvas);
        assert_eq!(canvas.frames(), 1);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn ambient_field_never_draws_lines() {
        let mut field = ParticleField::new(FieldPreset::ambient(), 9);
        field.resize(3000.0, 20.0);
        assert_eq!(field.particles().len(), 60);

        let mut canvas = Canvas::new();
        for _ in 0..10 {
            field.render_frame(None, &mut canvas);
        }
        assert_eq!(canvas.disc_count(), 60);
        assert_eq!(canvas.line_count(), 0);
    }

    #[test]
    fn reactive_field_links_crowded_particles() {
        // 100 particles on a 900x20 strip are guaranteed to have close pairs.
        let mut field = ParticleField::new(FieldPreset::reactive(), 4);
        field.resize(900.0, 20.0);

        let mut canvas = Canvas::new();
        field.render_frame(None, &mut canvas);
        assert_eq!(canvas.disc_count(), 100);
        assert!(canvas.line_count() > 0);
        for command in canvas.commands() {
            if let DrawCommand::Line { tint, .. } = command {
                assert!(tint.alpha > 0.0 && tint.alpha <= 0.25);
            }
        }
    }

    #[test]
    fn pointer_only_moves_reactive_particles_nearby() {
        let mut field = ParticleField::new(FieldPreset::reactive(), 2);
        field.resize(900.0, 600.0);
        field.particles[0].position = Vec2::new(300.0, 300.0);
        field.particles[0].velocity = Vec2::ZERO;
        field.particles[1].position = Vec2::new(800.0, 50.0);
        field.particles[1].velocity = Vec2::ZERO;

        let mut pointer = PointerState::new(120.0);
        pointer.set(Vec2::new(360.0, 300.0));
        field.step(Some(&pointer));

        assert!(field.particles()[0].position.x < 300.0);
        assert_eq!(field.particles()[1].position, Vec2::new(800.0, 50.0));
    }

    #[test]
    fn ambient_field_ignores_pointer() {
        let mut field = ParticleField::new(FieldPreset::ambient(), 2);
        field.resize(1000.0, 600.0);
        field.particles[0].position = Vec2::new(300.0, 300.0);
        field.particles[0].velocity = Vec2::ZERO;

        let mut pointer = PointerState::new(120.0);
        pointer.set(Vec2::new(301.0, 300.0));
        field.step(Some(&pointer));

        assert_eq!(field.particles()[0].position, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn same_seed_same_field() {
        let mut a = ParticleField::new(FieldPreset::reactive(), 77);
        let mut b = ParticleField::new(FieldPreset::reactive(), 77);
        a.resize(640.0, 480.0);
        b.resize(640.0, 480.0);
        assert_eq!(a.particles(), b.particles());
    }
}
