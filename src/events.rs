//! Host events for the particle field.
//!
//! Resize and pointer updates may arrive at any time relative to frames. They
//! are sent as [`FieldEvent`] messages and drained once per frame, before the
//! simulation step, by whoever owns the [`ParticleField`]:
//!
//! ```ignore
//! let (sender, queue) = events::channel();
//!
//! // From an event callback:
//! sender.pointer_move(120.0, 48.0);
//!
//! // At the top of each frame:
//! queue.drain_into(&mut field);
//! field.advance_frame(&mut canvas);
//! ```
//!
//! Events are applied in arrival order, so the last resize and the last
//! pointer position win.

use std::sync::mpsc::{self, Receiver, Sender};

use winit::event::WindowEvent;

use crate::field::ParticleField;

/// A state update forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldEvent {
    /// The surface changed size (physical pixels).
    Resize { width: u32, height: u32 },
    /// The pointer moved (surface pixels).
    PointerMove { x: f32, y: f32 },
}

impl FieldEvent {
    /// Translate a winit window event, if it is one the field cares about.
    ///
    /// Zero-area resizes (a minimised window) are dropped so the field keeps
    /// its last real bounds.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::Resized(size) if size.width == 0 || size.height == 0 => None,
            WindowEvent::Resized(size) => Some(FieldEvent::Resize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CursorMoved { position, .. } => Some(FieldEvent::PointerMove {
                x: position.x as f32,
                y: position.y as f32,
            }),
            _ => None,
        }
    }
}

/// Sending half. Cheap to clone; hand one to each event source.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<FieldEvent>,
}

impl EventSender {
    /// Queue an event. Returns `false` if the field's queue is gone.
    pub fn send(&self, event: FieldEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn resize(&self, width: u32, height: u32) -> bool {
        self.send(FieldEvent::Resize { width, height })
    }

    pub fn pointer_move(&self, x: f32, y: f32) -> bool {
        self.send(FieldEvent::PointerMove { x, y })
    }
}

/// Receiving half, owned by the frame driver.
#[derive(Debug)]
pub struct EventQueue {
    rx: Receiver<FieldEvent>,
}

impl EventQueue {
    /// Apply every pending event to `field`. Returns how many were applied.
    pub fn drain_into(&self, field: &mut ParticleField) -> usize {
        let mut applied = 0;
        for event in self.rx.try_iter() {
            field.apply(event);
            applied += 1;
        }
        applied
    }
}

/// Create a connected sender/queue pair.
pub fn channel() -> (EventSender, EventQueue) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventQueue { rx })
}
