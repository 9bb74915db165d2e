//! Serialization of an [`OverlayManifest`] to a KML document.
//!
//! One writer walks the manifest model; no per-overlay-type duplication.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use overlay_common::{Extent, OverlayError, OverlayResult};

use crate::manifest::{GroundOverlay, OverlayManifest, ScreenOverlay};

const KML_NAMESPACE: &str = "http://earth.google.com/kml/2.2";

/// Serialize the manifest to KML document bytes.
pub fn to_kml(manifest: &OverlayManifest) -> OverlayResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(encoding_err)?;

    let mut kml = BytesStart::new("kml");
    kml.push_attribute(("xmlns", KML_NAMESPACE));
    writer.write_event(Event::Start(kml)).map_err(encoding_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("Folder")))
        .map_err(encoding_err)?;

    text_element(&mut writer, "name", &manifest.title)?;

    for overlay in &manifest.ground_overlays {
        write_ground_overlay(&mut writer, overlay)?;
    }
    write_screen_overlay(&mut writer, &manifest.screen_overlay)?;

    writer
        .write_event(Event::End(BytesEnd::new("Folder")))
        .map_err(encoding_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("kml")))
        .map_err(encoding_err)?;

    Ok(writer.into_inner())
}

/// Serialize and write the manifest to `path`, overwriting any existing
/// file. The document is fully encoded before the file is created.
pub fn write_kml(manifest: &OverlayManifest, path: &Path) -> OverlayResult<()> {
    let encoded = to_kml(manifest)?;
    let mut file = File::create(path)?;
    file.write_all(&encoded)?;
    file.flush()?;
    Ok(())
}

fn write_ground_overlay<W: std::io::Write>(
    writer: &mut Writer<W>,
    overlay: &GroundOverlay,
) -> OverlayResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new("GroundOverlay")))
        .map_err(encoding_err)?;

    text_element(writer, "name", &overlay.name)?;
    text_element(writer, "visibility", visibility_flag(overlay.visible))?;
    write_icon(writer, &overlay.href)?;
    write_lat_lon_box(writer, &overlay.extent)?;

    writer
        .write_event(Event::End(BytesEnd::new("GroundOverlay")))
        .map_err(encoding_err)
}

fn write_screen_overlay<W: std::io::Write>(
    writer: &mut Writer<W>,
    overlay: &ScreenOverlay,
) -> OverlayResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new("ScreenOverlay")))
        .map_err(encoding_err)?;

    text_element(writer, "name", &overlay.name)?;
    text_element(writer, "visibility", visibility_flag(overlay.visible))?;
    write_icon(writer, &overlay.href)?;

    fraction_element(writer, "overlayXY", overlay.overlay_xy)?;
    fraction_element(writer, "screenXY", overlay.screen_xy)?;
    fraction_element(writer, "rotationXY", overlay.rotation_xy)?;
    fraction_element(writer, "size", overlay.size)?;

    writer
        .write_event(Event::End(BytesEnd::new("ScreenOverlay")))
        .map_err(encoding_err)
}

fn write_icon<W: std::io::Write>(writer: &mut Writer<W>, href: &str) -> OverlayResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new("Icon")))
        .map_err(encoding_err)?;
    text_element(writer, "href", href)?;
    writer
        .write_event(Event::End(BytesEnd::new("Icon")))
        .map_err(encoding_err)
}

/// North/south/east/west are written verbatim from the extent; no
/// coordinate reordering happens here.
fn write_lat_lon_box<W: std::io::Write>(
    writer: &mut Writer<W>,
    extent: &Extent,
) -> OverlayResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new("LatLonBox")))
        .map_err(encoding_err)?;

    text_element(writer, "north", &extent.max_lat.to_string())?;
    text_element(writer, "south", &extent.min_lat.to_string())?;
    text_element(writer, "east", &extent.max_lon.to_string())?;
    text_element(writer, "west", &extent.min_lon.to_string())?;
    text_element(writer, "rotation", "0.0")?;

    writer
        .write_event(Event::End(BytesEnd::new("LatLonBox")))
        .map_err(encoding_err)
}

fn text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> OverlayResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(encoding_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(encoding_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(encoding_err)
}

/// Self-closing element with x/y in fractional units, the KML shape for
/// screen-overlay anchor points.
fn fraction_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    (x, y): (f64, f64),
) -> OverlayResult<()> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("x", x.to_string().as_str()));
    element.push_attribute(("y", y.to_string().as_str()));
    element.push_attribute(("xunits", "fraction"));
    element.push_attribute(("yunits", "fraction"));
    writer
        .write_event(Event::Empty(element))
        .map_err(encoding_err)
}

fn visibility_flag(visible: bool) -> &'static str {
    if visible {
        "1"
    } else {
        "0"
    }
}

fn encoding_err<E: std::fmt::Display>(err: E) -> OverlayError {
    OverlayError::Encoding(format!("KML serialization failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{GroundOverlay, ScreenOverlay};

    fn sample_manifest() -> OverlayManifest {
        let extent = Extent::new(99.9995, 100.1005, 12.9995, 13.0505);
        OverlayManifest {
            title: "A3".to_string(),
            ground_overlays: vec![
                GroundOverlay {
                    name: "Temperature (29.8-31.4 deg)".to_string(),
                    href: "heat.Temperature.png".to_string(),
                    extent,
                    visible: true,
                },
                GroundOverlay {
                    name: "Temperature figures".to_string(),
                    href: "heat.figures.png".to_string(),
                    extent,
                    visible: false,
                },
            ],
            screen_overlay: ScreenOverlay {
                name: "ColorBar".to_string(),
                href: "heat.colorbar.png".to_string(),
                overlay_xy: (0.0, 0.0),
                screen_xy: (0.0, 0.0),
                rotation_xy: (0.0, 0.0),
                size: (0.75, 0.0),
                visible: true,
            },
        }
    }

    #[test]
    fn test_document_shape() {
        let kml = String::from_utf8(to_kml(&sample_manifest()).unwrap()).unwrap();

        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(kml.contains(r#"<kml xmlns="http://earth.google.com/kml/2.2">"#));
        assert!(kml.contains("<name>A3</name>"));
        assert!(kml.contains(
            r#"<size x="0.75" y="0" xunits="fraction" yunits="fraction"/>"#
        ));
    }

    #[test]
    fn test_overlay_order_preserved() {
        let kml = String::from_utf8(to_kml(&sample_manifest()).unwrap()).unwrap();

        let primary = kml.find("Temperature (29.8-31.4 deg)").unwrap();
        let figures = kml.find("Temperature figures").unwrap();
        let legend = kml.find("ColorBar").unwrap();
        assert!(primary < figures);
        assert!(figures < legend);
    }

    #[test]
    fn test_lat_lon_box_edges_verbatim() {
        let kml = String::from_utf8(to_kml(&sample_manifest()).unwrap()).unwrap();

        assert!(kml.contains("<north>13.0505</north>"));
        assert!(kml.contains("<south>12.9995</south>"));
        assert!(kml.contains("<east>100.1005</east>"));
        assert!(kml.contains("<west>99.9995</west>"));
        assert!(kml.contains("<rotation>0.0</rotation>"));
    }

    #[test]
    fn test_visibility_flags() {
        let kml = String::from_utf8(to_kml(&sample_manifest()).unwrap()).unwrap();

        // Primary layer visible, label layer toggled off, legend visible.
        let visibilities: Vec<&str> = kml
            .match_indices("<visibility>")
            .map(|(i, _)| &kml[i + 12..i + 13])
            .collect();
        assert_eq!(visibilities, ["1", "0", "1"]);
    }

    #[test]
    fn test_title_is_escaped() {
        let mut manifest = sample_manifest();
        manifest.title = "A<3 & friends".to_string();
        let kml = String::from_utf8(to_kml(&manifest).unwrap()).unwrap();
        assert!(kml.contains("<name>A&lt;3 &amp; friends</name>"));
    }

    #[test]
    fn test_write_kml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heat.kml");

        let manifest = sample_manifest();
        write_kml(&manifest, &path).unwrap();
        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk, to_kml(&manifest).unwrap());
    }
}
