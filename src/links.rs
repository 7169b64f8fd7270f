use glam::Vec2;
use rayon::prelude::*;

use crate::particle::Particle;
use crate::preset::LinkConfig;

/// Below this many particles the pair pass stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    /// Fade factor in `[0, 1]` before dimming.
    pub opacity: f32,
}

/// Linear fade from 1 at distance zero to 0 at the threshold.
pub fn link_opacity(distance_sq: f32, threshold_sq: f32) -> f32 {
    (1.0 - distance_sq / threshold_sq).max(0.0)
}

fn links_from(particles: &[Particle], a: usize, threshold_sq: f32) -> impl Iterator<Item = Link> + '_ {
    let origin = particles[a].position;
    particles[a + 1..].iter().filter_map(move |other| {
        let distance_sq = origin.distance_squared(other.position);
        (distance_sq < threshold_sq).then(|| Link {
            from: origin,
            to: other.position,
            opacity: link_opacity(distance_sq, threshold_sq),
        })
    })
}

/// Every unordered pair closer than the threshold, in index order.
pub fn collect_links(particles: &[Particle], config: &LinkConfig) -> Vec<Link> {
    let threshold_sq = config.threshold_sq;
    if particles.len() < PARALLEL_THRESHOLD {
        return (0..particles.len())
            .flat_map(|a| links_from(particles, a, threshold_sq))
            .collect();
    }

    (0..particles.len())
        .into_par_iter()
        .flat_map_iter(|a| links_from(particles, a, threshold_sq))
        .collect()
}
