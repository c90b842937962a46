//! Primitive types shared by the `reinfo-map` crates: geographic and screen points, screen
//! rectangles and the ordered property bags attached to rendered features.

pub mod geo;
pub mod properties;
pub mod screen;

pub use geo::GeoPoint2d;
pub use properties::{Properties, PropertyValue};
pub use screen::{ScreenPoint, ScreenRect};
