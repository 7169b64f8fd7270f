use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// Inclusive range that random attributes are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

/// Pointer repulsion settings for the reactive field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    pub radius: f32,
    pub strength: f32,
}

/// Connecting-line settings for the reactive field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Squared distance below which two particles are linked.
    pub threshold_sq: f32,
    /// Applied on top of the linear fade.
    pub dimming: f32,
    pub width: f32,
}

/// A named configuration for one particle field.
///
/// The two built-in presets differ in density, speed, palette and in whether
/// the pointer and connecting lines are used at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldPreset {
    pub name: String,
    pub divisor: f32,
    pub cap: usize,
    /// Each velocity component is drawn from `[-max_speed, max_speed]`.
    pub max_speed: f32,
    pub radius: Span,
    pub alpha: Span,
    pub color: [u8; 3],
    #[serde(default)]
    pub pointer: Option<PointerConfig>,
    #[serde(default)]
    pub links: Option<LinkConfig>,
}

impl FieldPreset {
    /// Sparse, pointer-reactive field with connecting lines.
    pub fn reactive() -> Self {
        Self {
            name: "network".to_owned(),
            divisor: 9.0,
            cap: 100,
            max_speed: 0.15,
            radius: Span::new(1.5, 3.5),
            alpha: Span::new(0.2, 0.5),
            color: [139, 168, 134],
            pointer: Some(PointerConfig {
                radius: 120.0,
                strength: 1.5,
            }),
            links: Some(LinkConfig {
                threshold_sq: 12000.0,
                dimming: 0.25,
                width: 1.0,
            }),
        }
    }

    /// Denser, slower field that ignores the pointer and draws no lines.
    pub fn ambient() -> Self {
        Self {
            name: "globules".to_owned(),
            divisor: 20.0,
            cap: 60,
            max_speed: 0.05,
            radius: Span::new(0.5, 2.5),
            alpha: Span::new(0.05, 0.2),
            color: [255, 255, 255],
            pointer: None,
            links: None,
        }
    }

    pub fn particle_count(&self, viewport_width: f32) -> usize {
        if !viewport_width.is_finite() || viewport_width <= 0.0 {
            return 0;
        }
        ((viewport_width / self.divisor).floor() as usize).min(self.cap)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(FieldError::InvalidPreset {
                name: self.name.clone(),
                reason: reason.to_owned(),
            })
        };

        if !(self.divisor.is_finite() && self.divisor > 0.0) {
            return invalid("divisor must be a positive number");
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return invalid("max_speed must be a non-negative number");
        }
        if !self.radius.is_valid() {
            return invalid("radius span must satisfy 0 <= min <= max");
        }
        if !self.alpha.is_valid() || self.alpha.max > 1.0 {
            return invalid("alpha span must lie within [0, 1]");
        }
        if let Some(pointer) = &self.pointer {
            if !(pointer.radius.is_finite() && pointer.radius > 0.0) {
                return invalid("pointer radius must be positive");
            }
            if !pointer.strength.is_finite() {
                return invalid("pointer strength must be finite");
            }
        }
        if let Some(links) = &self.links {
            if !(links.threshold_sq.is_finite() && links.threshold_sq > 0.0) {
                return invalid("link threshold must be positive");
            }
            if !(0.0..=1.0).contains(&links.dimming) {
                return invalid("link dimming must lie within [0, 1]");
            }
        }
        Ok(())
    }
}
