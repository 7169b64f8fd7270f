use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;

use crate::particle::Tint;

/// A 2D drawing target in surface-local coordinates.
pub trait Surface {
    /// Starts a new frame of the given size, discarding whatever was drawn.
    fn clear(&mut self, size: Vec2);
    fn fill_disc(&mut self, center: Vec2, radius: f32, tint: Tint);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, tint: Tint);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Disc {
        center: Vec2,
        radius: f32,
        tint: Tint,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        tint: Tint,
    },
}

/// Display list holding the most recent frame.
///
/// A field renders into a `Canvas`; whatever presents the result replays it
/// onto a real surface.
#[derive(Clone, Debug, Default)]
pub struct Canvas {
    size: Vec2,
    commands: Vec<DrawCommand>,
    frames: u64,
}

pub type SharedCanvas = Arc<Mutex<Canvas>>;

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedCanvas {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames started on this canvas.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn disc_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.commands.len() - self.disc_count()
    }

    pub fn replay<S: Surface + ?Sized>(&self, target: &mut S) {
        for command in &self.commands {
            match *command {
                DrawCommand::Disc {
                    center,
                    radius,
                    tint,
                } => target.fill_disc(center, radius, tint),
                DrawCommand::Line {
                    from,
                    to,
                    width,
                    tint,
                } => target.stroke_line(from, to, width, tint),
            }
        }
    }
}

impl Surface for Canvas {
    fn clear(&mut self, size: Vec2) {
        self.size = size;
        self.commands.clear();
        self.frames += 1;
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, tint: Tint) {
        self.commands.push(DrawCommand::Disc {
            center,
            radius,
            tint,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, tint: Tint) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            tint,
        });
    }
}
