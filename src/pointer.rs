use glam::Vec2;

/// Last known pointer position over the surface, if any.
///
/// Written by pointer listeners and read once per frame by the reactive field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    position: Option<Vec2>,
    radius: f32,
}

impl PointerState {
    pub fn new(radius: f32) -> Self {
        Self {
            position: None,
            radius,
        }
    }

    pub fn set(&mut self, position: Vec2) {
        self.position = Some(position);
    }

    pub fn clear(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Offset that pushes a particle at `position` away from the pointer.
    ///
    /// Scales linearly from `strength` at the pointer to zero at the influence
    /// radius. A particle sitting exactly on the pointer is pushed along +x.
    pub fn displacement_for(&self, position: Vec2, strength: f32) -> Vec2 {
        let Some(pointer) = self.position else {
            return Vec2::ZERO;
        };

        let delta = pointer - position;
        let distance = delta.length();
        if distance >= self.radius {
            return Vec2::ZERO;
        }

        let away = if distance > f32::EPSILON {
            -delta / distance
        } else {
            Vec2::X
        };
        let force = (self.radius - distance) / self.radius;
        away * force * strength
    }
}
