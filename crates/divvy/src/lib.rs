//! Constant-sum multi-part slider laid out as a pie chart.

pub mod drag;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod handle;
pub mod mapper;

pub use drag::DragController;
pub use engine::{Change, Engine};
pub use error::Error;
pub use geometry::{Bounds, Geometry, Point};
pub use handle::{Handle, HandleId, HandleKind, HandleMetrics};
pub use mapper::{CircularMapper, TICKS_PER_CIRCLE};
