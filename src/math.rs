//! Mathematical structs and functions.

use cgmath::Point2;
pub use geo::*;
pub use util::*;

mod geo;
mod util;

/// A point in raw `(lat, lng)` degree space, used for planar approximations.
pub type Point2d = Point2<f64>;
