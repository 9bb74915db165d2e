//! KML overlay manifest: model, builder, and serializer.
//!
//! The manifest is built as a plain data structure first, then a single
//! writer walks it to produce the document. Consumers may rely on
//! declaration order for layering, so overlay order is preserved
//! verbatim.

pub mod manifest;
pub mod writer;

pub use manifest::{GroundOverlay, ManifestBuilder, OverlayManifest, ScreenOverlay};
pub use writer::{to_kml, write_kml};
