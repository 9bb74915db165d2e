//! Common types shared across the overlay pipeline crates.

pub mod error;
pub mod extent;
pub mod observation;
pub mod raster;
pub mod value_range;

pub use error::{OverlayError, OverlayResult};
pub use extent::Extent;
pub use observation::Observation;
pub use raster::RasterLayer;
pub use value_range::ValueRange;
