//! # Ambient Field
//!
//! An ambient, pointer-reactive particle field: a few hundred drifting
//! points that glow, pulse, lean towards the pointer and link up with faint
//! lines when they pass close to each other.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ambient_field::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Simulation::new()
//!         .with_window_size(1280, 720)
//!         .with_config(FieldConfig::default().with_link_distance(100.0))
//!         .run()
//! }
//! ```
//!
//! ## Driving a field yourself
//!
//! The simulation does not need a window. Any [`Canvas`] can receive the
//! draw calls:
//!
//! ```ignore
//! let mut field = ParticleField::new(1920, 1080); // 138 particles
//! let mut canvas = RecordingCanvas::new();
//!
//! field.set_pointer(400.0, 300.0);
//! let stats = field.advance_frame(&mut canvas);
//! println!("{} links this frame", stats.connections);
//! ```
//!
//! ## Core Concepts
//!
//! ### Particle count
//!
//! The count is `floor(width * height / 15000)` at creation and never
//! changes. Linking is an exhaustive O(n²) pass, so this bound is what keeps
//! a frame cheap.
//!
//! ### Frame order
//!
//! Each frame integrates position, applies pointer attraction and friction,
//! reflects off the walls and steps the opacity pulse, then draws. See
//! [`ParticleField`] for details.
//!
//! ### Events
//!
//! Resize and pointer updates are messages ([`FieldEvent`]) queued through
//! [`events::channel`] and applied at the top of the next frame.

pub mod canvas;
pub mod config;
pub mod connections;
pub mod error;
pub mod events;
mod field;
pub mod gpu;
pub mod particle;
pub mod raster;
mod simulation;
pub mod time;

pub use canvas::{Canvas, DrawCommand, NullCanvas, RecordingCanvas};
pub use config::FieldConfig;
pub use connections::{link_alpha, Connection, Connections};
pub use error::{ConfigError, GpuError, SimulationError};
pub use events::{EventQueue, EventSender, FieldEvent};
pub use field::{particle_count_for, FrameStats, ParticleField};
pub use glam::{Vec2, Vec4};
pub use particle::{Fade, Particle};
pub use raster::RasterCanvas;
pub use simulation::Simulation;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use ambient_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{Canvas, NullCanvas, RecordingCanvas};
    pub use crate::config::FieldConfig;
    pub use crate::error::SimulationError;
    pub use crate::events::{self, FieldEvent};
    pub use crate::field::{FrameStats, ParticleField};
    pub use crate::particle::{Fade, Particle};
    pub use crate::raster::RasterCanvas;
    pub use crate::simulation::Simulation;
    pub use crate::{Vec2, Vec4};
}
