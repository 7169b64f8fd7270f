//! Decorative particle fields for a hero banner.
//!
//! Two presets ship with the crate: a sparse, pointer-reactive field whose
//! nearby particles are joined by fading lines, and a denser ambient field of
//! slow, unconnected dots. Fields render into a [`Canvas`] display list and are
//! driven by a [`Host`] that supplies viewport size, pointer events and the
//! per-repaint tick.
//!
//! ```
//! use hero_particles::{Canvas, FieldPreset, Host, Viewport, mount};
//!
//! let host = Host::new(Viewport { width: 1280.0, container_height: 720.0 });
//! let canvas = Canvas::shared();
//! let field = mount(&host, FieldPreset::reactive(), Some(canvas.clone()), 1);
//!
//! host.tick();
//! assert_eq!(canvas.lock().disc_count(), 100);
//! field.unmount();
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod host;
pub mod lifecycle;
pub mod links;
pub mod particle;
pub mod pointer;
pub mod preset;
pub mod surface;

pub use config::SceneConfig;
pub use error::{FieldError, Result};
pub use field::ParticleField;
pub use glam::Vec2;
pub use host::{EventBus, FrameScheduler, Host, HostEvent, Subscription, Viewport};
pub use lifecycle::{MountedField, mount};
pub use particle::{Particle, Tint};
pub use pointer::PointerState;
pub use preset::{FieldPreset, LinkConfig, PointerConfig, Span};
pub use surface::{Canvas, DrawCommand, SharedCanvas, Surface};
