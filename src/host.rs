//! The environment a field is mounted into.
//!
//! [`Host`] stands in for the page: it knows the viewport, dispatches resize
//! and pointer events to subscribed listeners, and runs queued frame callbacks
//! once per display refresh via [`Host::tick`].

use std::sync::{
    Arc, Weak,
    atomic::{AtomicU64, Ordering::Relaxed},
};

use glam::Vec2;
use parking_lot::Mutex;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    /// Height of the element containing the drawing surface.
    pub container_height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    Resized(Viewport),
    PointerMoved(Vec2),
    PointerLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    PointerMove,
    PointerLeave,
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::Resized(_) => EventKind::Resize,
            HostEvent::PointerMoved(_) => EventKind::PointerMove,
            HostEvent::PointerLeft => EventKind::PointerLeave,
        }
    }
}

type Listener = Arc<Mutex<dyn FnMut(&HostEvent) + Send>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, EventKind, Listener)>,
}

/// Listener registry. Registration hands back a [`Subscription`] that removes
/// the listener when dropped.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<Listeners>>,
}

impl EventBus {
    pub fn subscribe(
        &self,
        kind: EventKind,
        listener: impl FnMut(&HostEvent) + Send + 'static,
    ) -> Subscription {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let listener: Listener = Arc::new(Mutex::new(listener));
        inner.entries.push((id, kind, listener));
        Subscription {
            bus: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Calls every listener registered for the event's kind.
    pub fn emit(&self, event: &HostEvent) {
        // Snapshot first so listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .inner
            .lock()
            .entries
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind())
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            (&mut *listener.lock())(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().entries.len()
    }
}

/// Keeps a listener registered for as long as it lives.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    bus: Weak<Mutex<Listeners>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.lock().entries.retain(|(id, _, _)| *id != self.id);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

type FrameCallback = Box<dyn FnOnce() + Send>;

/// Queue of callbacks to run before the next repaint.
///
/// Callbacks requested while a tick is running land in the next tick, so a
/// self-rescheduling callback runs exactly once per tick.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    next_id: Arc<AtomicU64>,
    pending: Arc<Mutex<Vec<(FrameHandle, FrameCallback)>>>,
}

impl FrameScheduler {
    pub fn request(&self, callback: impl FnOnce() + Send + 'static) -> FrameHandle {
        let handle = FrameHandle(self.next_id.fetch_add(1, Relaxed));
        self.pending.lock().push((handle, Box::new(callback)));
        handle
    }

    /// Returns whether the callback was still pending.
    pub fn cancel(&self, handle: FrameHandle) -> bool {
        let mut pending = self.pending.lock();
        let before = pending.len();
        pending.retain(|(h, _)| *h != handle);
        pending.len() != before
    }

    /// Runs every callback queued before this call. Returns how many ran.
    pub fn tick(&self) -> usize {
        let batch = std::mem::take(&mut *self.pending.lock());
        let ran = batch.len();
        for (_, callback) in batch {
            callback();
        }
        ran
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}

pub struct Host {
    viewport: Mutex<Viewport>,
    events: EventBus,
    frames: FrameScheduler,
}

impl Host {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Mutex::new(viewport),
            events: EventBus::default(),
            frames: FrameScheduler::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport.lock()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    pub fn resize(&self, width: f32, container_height: f32) {
        let viewport = Viewport {
            width,
            container_height,
        };
        *self.viewport.lock() = viewport;
        self.events.emit(&HostEvent::Resized(viewport));
    }

    pub fn pointer_moved(&self, position: Vec2) {
        self.events.emit(&HostEvent::PointerMoved(position));
    }

    pub fn pointer_left(&self) {
        self.events.emit(&HostEvent::PointerLeft);
    }

    /// One display refresh.
    pub fn tick(&self) -> usize {
        self.frames.tick()
    }
}
