//! Typed notifications from the studio session.
//!
//! Subscribers are plain closures. The session emits, the application
//! subscribes (status line, logging) and nothing holds a reference back.

use std::path::PathBuf;
use std::time::Duration;

use tessera_engine::view::ViewUpdate;

use crate::triangulate::{Method, TransportError};

/// Which of the two viewports an event concerns.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ViewportId {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudioEvent {
    DrawingStarted,
    DrawingCompleted { points: usize },
    PointsUpdated { points: usize },
    TriangulationStarted { method: Method },
    TriangulationCompleted { method: Method, triangles: usize, elapsed: Duration },
    TriangulationFailed { method: Method, error: TransportError },
    ViewUpdated { viewport: ViewportId, update: ViewUpdate },
    FileLoaded { path: PathBuf, points: usize },
    FileError { message: String },
    Reset,
    MeshIntegrity { message: String },
}

impl StudioEvent {
    /// One-line message for the status line, if the event is user-facing.
    pub fn status(&self) -> Option<String> {
        Some(match self {
            StudioEvent::DrawingStarted => "drawing: click near the first point or press Enter to close".into(),
            StudioEvent::DrawingCompleted { points } => {
                format!("polygon closed with {points} points: T service, N native")
            }
            StudioEvent::TriangulationStarted { method } => format!("triangulating ({method})..."),
            StudioEvent::TriangulationCompleted { method, triangles, elapsed } => format!(
                "{method}: {triangles} triangles in {} ms",
                elapsed.as_millis()
            ),
            StudioEvent::TriangulationFailed { method, error } => format!("{method} failed: {error}"),
            StudioEvent::FileLoaded { path, points } => {
                let name = path.file_name().unwrap_or(path.as_os_str());
                format!("loaded {points} points from {}", name.to_string_lossy())
            }
            StudioEvent::FileError { message } => format!("import failed: {message}"),
            StudioEvent::Reset => "reset".into(),
            StudioEvent::MeshIntegrity { message } => format!("mesh problem: {message}"),
            StudioEvent::PointsUpdated { .. } | StudioEvent::ViewUpdated { .. } => return None,
        })
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Subscription(u64);

/// Single-threaded observer list.
///
/// Subscribers run synchronously, in subscription order, on every emit.
pub struct EventBus<E> {
    next_id: u64,
    subscribers: Vec<(Subscription, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, f: impl FnMut(&E) + 'static) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Returns `false` if `subscription` was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(id, _)| *id != subscription);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, f) in &mut self.subscribers {
            f(event);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribers_see_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let a = Rc::clone(&seen);
        bus.subscribe(move |e: &StudioEvent| a.borrow_mut().push(("a", e.clone())));
        let b = Rc::clone(&seen);
        bus.subscribe(move |e: &StudioEvent| b.borrow_mut().push(("b", e.clone())));

        bus.emit(&StudioEvent::Reset);
        assert_eq!(
            *seen.borrow(),
            vec![("a", StudioEvent::Reset), ("b", StudioEvent::Reset)]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery_once() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();

        let c = Rc::clone(&count);
        let sub = bus.subscribe(move |_: &StudioEvent| *c.borrow_mut() += 1);
        bus.emit(&StudioEvent::DrawingStarted);

        assert!(bus.unsubscribe(sub));
        assert!(!bus.unsubscribe(sub));
        assert!(bus.is_empty());

        bus.emit(&StudioEvent::DrawingStarted);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn handles_are_not_reused() {
        let mut bus: EventBus<()> = EventBus::new();
        let first = bus.subscribe(|_| {});
        bus.unsubscribe(first);
        let second = bus.subscribe(|_| {});
        assert_ne!(first, second);
        assert!(!bus.unsubscribe(first));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn status_messages() {
        let done = StudioEvent::TriangulationCompleted {
            method: Method::Native,
            triangles: 4,
            elapsed: Duration::from_millis(12),
        };
        assert_eq!(done.status().as_deref(), Some("native: 4 triangles in 12 ms"));

        let failed = StudioEvent::TriangulationFailed {
            method: Method::Service,
            error: TransportError::Unavailable(Method::Service),
        };
        assert_eq!(
            failed.status().as_deref(),
            Some("service failed: service triangulation is not available")
        );

        let loaded = StudioEvent::FileLoaded { path: PathBuf::from("/tmp/shapes/star.json"), points: 10 };
        assert_eq!(loaded.status().as_deref(), Some("loaded 10 points from star.json"));

        assert_eq!(StudioEvent::PointsUpdated { points: 3 }.status(), None);
    }
}
