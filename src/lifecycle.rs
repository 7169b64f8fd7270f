//! Mount/unmount of a particle field onto a [`Host`].
//!
//! Mounting builds the field from the current viewport, registers the event
//! listeners the preset needs and starts a self-rescheduling frame loop.
//! Everything acquired is released by [`MountedField::unmount`] or by dropping
//! the [`MountedField`].

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

use crate::field::ParticleField;
use crate::host::{EventKind, FrameHandle, FrameScheduler, Host, HostEvent, Subscription};
use crate::pointer::PointerState;
use crate::preset::FieldPreset;
use crate::surface::SharedCanvas;

struct FrameLoop {
    running: AtomicBool,
    field: Mutex<ParticleField>,
    pointer: Option<Arc<Mutex<PointerState>>>,
    canvas: SharedCanvas,
    frames: FrameScheduler,
    last_handle: Mutex<Option<FrameHandle>>,
}

impl FrameLoop {
    fn schedule(self: &Arc<Self>) {
        let next = Arc::clone(self);
        let handle = self.frames.request(move || next.run_frame());
        *self.last_handle.lock() = Some(handle);
    }

    fn render(&self) {
        let pointer = self.pointer.as_ref().map(|state| *state.lock());
        let mut field = self.field.lock();
        field.render_frame(pointer.as_ref(), &mut *self.canvas.lock());
        tracing::trace!(field = %field.preset().name, particles = field.particles().len(), "frame");
    }

    fn run_frame(self: Arc<Self>) {
        if !self.running.load(Ordering::Acquire) {
            return;
        }
        self.render();
        self.schedule();
    }
}

/// A field that is live on a host. Dropping it unmounts.
pub struct MountedField {
    name: String,
    state: Option<Arc<FrameLoop>>,
    subscriptions: Vec<Subscription>,
}

/// Starts rendering `preset` onto `canvas`, sized from the host's viewport.
/// The first frame is drawn immediately; later frames follow each tick.
///
/// Without a canvas, or with a preset that fails validation, the returned
/// field is inert: nothing is registered, scheduled or drawn.
pub fn mount(host: &Host, preset: FieldPreset, canvas: Option<SharedCanvas>, seed: u64) -> MountedField {
    let name = preset.name.clone();
    if let Err(err) = preset.validate() {
        tracing::warn!(field = %name, error = %err, "rejected preset; field will not render");
        return MountedField::inert(name);
    }
    let Some(canvas) = canvas else {
        tracing::warn!(field = %name, "no drawing surface available; field will not render");
        return MountedField::inert(name);
    };

    let viewport = host.viewport();
    let pointer = preset
        .pointer
        .map(|config| Arc::new(Mutex::new(PointerState::new(config.radius))));
    let mut field = ParticleField::new(preset, seed);
    field.resize(viewport.width, viewport.container_height);

    let state = Arc::new(FrameLoop {
        running: AtomicBool::new(true),
        field: Mutex::new(field),
        pointer: pointer.clone(),
        canvas,
        frames: host.frames().clone(),
        last_handle: Mutex::new(None),
    });

    let mut subscriptions = Vec::with_capacity(3);
    let on_resize = Arc::clone(&state);
    subscriptions.push(host.events().subscribe(EventKind::Resize, move |event| {
        if let HostEvent::Resized(viewport) = event {
            on_resize
                .field
                .lock()
                .resize(viewport.width, viewport.container_height);
        }
    }));

    if let Some(pointer) = pointer {
        let on_move = Arc::clone(&pointer);
        subscriptions.push(host.events().subscribe(EventKind::PointerMove, move |event| {
            if let HostEvent::PointerMoved(position) = event {
                on_move.lock().set(*position);
            }
        }));
        subscriptions.push(host.events().subscribe(EventKind::PointerLeave, move |_| {
            pointer.lock().clear();
        }));
    }

    state.render();
    state.schedule();
    tracing::debug!(field = %name, listeners = subscriptions.len(), "mounted");

    MountedField {
        name,
        state: Some(state),
        subscriptions,
    }
}

impl MountedField {
    fn inert(name: String) -> Self {
        Self {
            name,
            state: None,
            subscriptions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.running.load(Ordering::Acquire))
    }

    pub fn particle_count(&self) -> usize {
        self.state
            .as_ref()
            .map_or(0, |state| state.field.lock().particles().len())
    }

    /// Runs `f` against the live field, if there is one.
    pub fn with_field<R>(&self, f: impl FnOnce(&ParticleField) -> R) -> Option<R> {
        self.state.as_ref().map(|state| f(&state.field.lock()))
    }

    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.subscriptions.clear();

        let Some(state) = self.state.take() else {
            return;
        };
        state.running.store(false, Ordering::Release);
        if let Some(handle) = state.last_handle.lock().take() {
            state.frames.cancel(handle);
        }
        tracing::debug!(field = %self.name, "unmounted");
    }
}

impl Drop for MountedField {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Viewport;
    use crate::preset::Span;
    use crate::surface::Canvas;

    fn host(width: f32, height: f32) -> Host {
        Host::new(Viewport {
            width,
            container_height: height,
        })
    }

    #[test]
    fn mount_draws_first_frame_then_one_per_tick() {
        let host = host(450.0, 400.0);
        let canvas = Canvas::shared();
        let mounted = mount(&host, FieldPreset::reactive(), Some(canvas.clone()), 5);

        assert!(mounted.is_running());
        assert_eq!(mounted.particle_count(), 50);
        assert_eq!(canvas.lock().frames(), 1);
        assert_eq!(canvas.lock().disc_count(), 50);

        assert_eq!(host.tick(), 1);
        assert_eq!(canvas.lock().frames(), 2);
        assert_eq!(canvas.lock().disc_count(), 50);
    }

    #[test]
    fn invalid_preset_is_inert() {
        let host = host(900.0, 400.0);
        let canvas = Canvas::shared();
        let inverted = FieldPreset {
            radius: Span::new(3.0, 1.0),
            ..FieldPreset::reactive()
        };
        let mounted = mount(&host, inverted, Some(canvas.clone()), 1);

        assert!(!mounted.is_running());
        assert_eq!(mounted.particle_count(), 0);
        assert_eq!(host.events().listener_count(), 0);
        assert_eq!(host.frames().pending(), 0);
        assert_eq!(canvas.lock().frames(), 0);

        let nan_speed = FieldPreset {
            max_speed: f32::NAN,
            ..FieldPreset::ambient()
        };
        let mounted = mount(&host, nan_speed, Some(canvas.clone()), 1);
        assert!(!mounted.is_running());
        assert_eq!(host.tick(), 0);
    }

    #[test]
    fn ambient_field_registers_resize_only() {
        let host = host(1000.0, 400.0);
        let _mounted = mount(&host, FieldPreset::ambient(), Some(Canvas::shared()), 5);
        assert_eq!(host.events().listener_count(), 1);
    }

    #[test]
    fn missing_canvas_is_inert() {
        let host = host(1000.0, 400.0);
        let mounted = mount(&host, FieldPreset::reactive(), None, 5);

        assert!(!mounted.is_running());
        assert_eq!(host.events().listener_count(), 0);
        assert_eq!(host.frames().pending(), 0);
        host.resize(2000.0, 400.0);
        assert_eq!(host.tick(), 0);
        mounted.unmount();
    }

    #[test]
    fn drop_releases_everything() {
        let host = host(900.0, 400.0);
        let mounted = mount(&host, FieldPreset::reactive(), Some(Canvas::shared()), 5);
        assert_eq!(host.events().listener_count(), 3);
        assert_eq!(host.frames().pending(), 1);

        drop(mounted);
        assert_eq!(host.events().listener_count(), 0);
        assert_eq!(host.frames().pending(), 0);
    }
}
