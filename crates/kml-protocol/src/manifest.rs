//! Overlay manifest model and builder.

use serde::{Deserialize, Serialize};

use overlay_common::{Extent, OverlayError, OverlayResult, RasterLayer};

/// A raster anchored to a geographic bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundOverlay {
    pub name: String,
    pub href: String,
    /// Geographic footprint: north=max_lat, south=min_lat, east=max_lon,
    /// west=min_lon, rotation 0.
    pub extent: Extent,
    pub visible: bool,
}

/// A raster anchored to a fixed position in screen-fraction coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenOverlay {
    pub name: String,
    pub href: String,
    /// Anchor point on the overlay image, fractional units.
    pub overlay_xy: (f64, f64),
    /// Anchor point on the screen, fractional units.
    pub screen_xy: (f64, f64),
    /// Rotation anchor, fractional units.
    pub rotation_xy: (f64, f64),
    /// Rendered size as screen fractions; 0 means "preserve aspect".
    pub size: (f64, f64),
    pub visible: bool,
}

/// The composed overlay document, written once and never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayManifest {
    pub title: String,
    pub ground_overlays: Vec<GroundOverlay>,
    pub screen_overlay: ScreenOverlay,
}

/// Assembles raster layer references, their shared geographic footprint,
/// and the screen-anchored legend into an [`OverlayManifest`].
///
/// Validation happens in [`ManifestBuilder::build`]: a degenerate extent
/// is a `Config` error and a referenced raster that was never written is
/// a `MissingAsset` error.
#[derive(Debug)]
pub struct ManifestBuilder {
    title: String,
    extent: Extent,
    base_url: String,
    overlays: Vec<(String, RasterLayer, bool)>,
    legend: Option<(String, RasterLayer)>,
}

impl ManifestBuilder {
    /// `base_url` is prefixed to every raster file name when building
    /// hrefs; pass an empty string for paths relative to the manifest.
    pub fn new(title: impl Into<String>, extent: Extent, base_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extent,
            base_url: base_url.into(),
            overlays: Vec::new(),
            legend: None,
        }
    }

    /// Append a ground overlay. Declaration order is preserved in the
    /// serialized document.
    pub fn ground_overlay(
        mut self,
        name: impl Into<String>,
        layer: &RasterLayer,
        visible: bool,
    ) -> Self {
        self.overlays.push((name.into(), layer.clone(), visible));
        self
    }

    /// Set the screen-anchored legend overlay. Exactly one is required.
    pub fn legend(mut self, name: impl Into<String>, layer: &RasterLayer) -> Self {
        self.legend = Some((name.into(), layer.clone()));
        self
    }

    pub fn build(self) -> OverlayResult<OverlayManifest> {
        if self.extent.is_degenerate() {
            return Err(OverlayError::Config(format!(
                "degenerate extent: {:?}",
                self.extent
            )));
        }

        let (legend_name, legend_layer) = self
            .legend
            .ok_or_else(|| OverlayError::Config("manifest has no legend overlay".to_string()))?;

        let mut ground_overlays = Vec::with_capacity(self.overlays.len());
        for (name, layer, visible) in self.overlays {
            ground_overlays.push(GroundOverlay {
                name,
                href: href_for(&self.base_url, &layer)?,
                extent: self.extent,
                visible,
            });
        }

        let screen_overlay = ScreenOverlay {
            name: legend_name,
            href: href_for(&self.base_url, &legend_layer)?,
            overlay_xy: (0.0, 0.0),
            screen_xy: (0.0, 0.0),
            rotation_xy: (0.0, 0.0),
            size: (0.75, 0.0),
            visible: true,
        };

        Ok(OverlayManifest {
            title: self.title,
            ground_overlays,
            screen_overlay,
        })
    }
}

/// Build an href for a produced raster, verifying the file actually
/// exists on disk first.
fn href_for(base_url: &str, layer: &RasterLayer) -> OverlayResult<String> {
    if !layer.path.exists() {
        return Err(OverlayError::MissingAsset(layer.path.clone()));
    }
    let file_name = layer
        .file_name()
        .ok_or_else(|| OverlayError::MissingAsset(layer.path.clone()))?;
    Ok(format!("{}{}", base_url, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn raster(path: &Path, transparent: bool) -> RasterLayer {
        RasterLayer {
            path: path.to_path_buf(),
            width_px: 40,
            height_px: 20,
            dpi: 100,
            transparent,
        }
    }

    fn touch(path: &Path) {
        std::fs::write(path, b"png").unwrap();
    }

    #[test]
    fn test_build_preserves_order_and_extent() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let legend = dir.path().join("legend.png");
        for p in [&a, &b, &legend] {
            touch(p);
        }

        let extent = Extent::new(99.9995, 100.1005, 12.9995, 13.0505);
        let manifest = ManifestBuilder::new("A3", extent, "http://example/")
            .ground_overlay("Temperature", &raster(&a, true), true)
            .ground_overlay("Temperature figures", &raster(&b, true), false)
            .legend("ColorBar", &raster(&legend, false))
            .build()
            .unwrap();

        assert_eq!(manifest.ground_overlays.len(), 2);
        assert_eq!(manifest.ground_overlays[0].name, "Temperature");
        assert_eq!(manifest.ground_overlays[1].name, "Temperature figures");
        assert!(!manifest.ground_overlays[1].visible);
        assert_eq!(manifest.ground_overlays[0].href, "http://example/a.png");
        assert_eq!(manifest.ground_overlays[0].extent, extent);

        assert_eq!(manifest.screen_overlay.size, (0.75, 0.0));
        assert!(manifest.screen_overlay.visible);
    }

    #[test]
    fn test_missing_asset_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let legend = dir.path().join("legend.png");
        touch(&legend);
        let ghost = dir.path().join("never-written.png");

        let extent = Extent::new(0.0, 1.0, 0.0, 1.0);
        let err = ManifestBuilder::new("t", extent, "")
            .ground_overlay("ghost", &raster(&ghost, true), true)
            .legend("ColorBar", &raster(&legend, false))
            .build()
            .unwrap_err();
        assert!(matches!(err, OverlayError::MissingAsset(p) if p == ghost));
    }

    #[test]
    fn test_degenerate_extent_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let legend = dir.path().join("legend.png");
        touch(&legend);

        let err = ManifestBuilder::new("t", Extent::new(1.0, 1.0, 0.0, 1.0), "")
            .legend("ColorBar", &raster(&legend, false))
            .build()
            .unwrap_err();
        assert!(matches!(err, OverlayError::Config(_)));
    }

    #[test]
    fn test_missing_legend_rejected() {
        let err = ManifestBuilder::new("t", Extent::new(0.0, 1.0, 0.0, 1.0), "")
            .build()
            .unwrap_err();
        assert!(matches!(err, OverlayError::Config(_)));
    }
}
