pub mod model;
pub mod view;

pub use model::State;
pub use view::draw;

pub const MIN_SIZE: i32 = 100;
pub const DEFAULT_SIZE: i32 = 300;
pub const LINE_WIDTH: f64 = 1.0;
pub const PRESSED_SHADE: f64 = 0.8; // darkening of held handles
pub const WHEEL_NOTCH: f64 = 120.0; // eighths of a degree per scroll step
pub const FALLBACK_SECTOR_COLOR: (f64, f64, f64) = (0.66, 0.66, 0.66);
