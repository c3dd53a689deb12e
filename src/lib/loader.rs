use super::geo::Cartesian3;
use super::items::{Feature, FeatureCollection, PolygonGraphics, Properties};
use super::style::{Color, OutlineStyle, DEFAULT_FILL, DEFAULT_OUTLINE};
use geojson::feature::Id;
use geojson::{GeoJson, Position, Value};
use log::debug;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Style given to every polygon of a loaded file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub fill: Color,
    pub outline: OutlineStyle,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            fill: DEFAULT_FILL,
            outline: DEFAULT_OUTLINE,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read geometry file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
}

fn to_positions(ring: &[Position]) -> Vec<Cartesian3> {
    ring.iter()
        .filter_map(|position| {
            let lon = *position.get(0)?;
            let lat = *position.get(1)?;
            let height = position.get(2).copied().unwrap_or(0.);
            Some(Cartesian3::from_degrees(lon, lat, height))
        })
        .collect()
}

/// Outer rings of the polygons in `value`, collections included. Holes are
/// not rendered.
fn outer_rings(value: &Value) -> Vec<&[Position]> {
    match value {
        Value::Polygon(rings) => rings.first().map(Vec::as_slice).into_iter().collect(),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .filter_map(|rings| rings.first().map(Vec::as_slice))
            .collect(),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .flat_map(|geometry| outer_rings(&geometry.value))
            .collect(),
        _ => vec![],
    }
}

fn feature_id(id: Option<&Id>, idx: usize) -> String {
    match id {
        Some(Id::String(id)) => id.clone(),
        Some(Id::Number(id)) => id.to_string(),
        None => format!("feature-{}", idx),
    }
}

fn convert(idx: usize, feature: geojson::Feature, options: &LoadOptions) -> Vec<Feature> {
    let id = feature_id(feature.id.as_ref(), idx);
    let properties: Properties = feature.properties.unwrap_or_default();
    let name = ["title", "name"]
        .iter()
        .find_map(|key| properties.get(*key)?.as_str())
        .map(String::from);

    let template = Feature {
        id,
        name,
        show: true,
        polygon: None,
        properties: properties.into(),
    };
    let rings = match &feature.geometry {
        Some(geometry) => outer_rings(&geometry.value),
        None => vec![],
    };
    if rings.is_empty() {
        return vec![template];
    }

    rings
        .into_iter()
        .enumerate()
        .map(|(part, ring)| {
            let mut polygon = PolygonGraphics::new(to_positions(ring));
            polygon.fill = options.fill;
            polygon.outline = options.outline;
            polygon.outline_enabled = true;

            let mut feature = template.clone().with_polygon(polygon);
            if part > 0 {
                feature.id = format!("{}#{}", template.id, part);
            }
            feature
        })
        .collect()
}

/// Build a feature collection named `name` from GeoJSON text.
///
/// A `FeatureCollection`, a single `Feature` and a bare geometry are all
/// accepted. Each part of a `MultiPolygon` becomes its own feature.
pub fn parse_geojson(
    name: &str,
    text: &str,
    options: &LoadOptions,
) -> Result<FeatureCollection, LoadError> {
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![geojson::Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };

    let mut collection = FeatureCollection::new(name);
    for (idx, feature) in features.into_iter().enumerate() {
        collection.features.extend(convert(idx, feature, options));
    }
    debug!(
        "loaded {} features into layer {}",
        collection.features.len(),
        name
    );
    Ok(collection)
}

/// Load a GeoJSON file, the layer is named after the file stem.
pub fn load_geojson(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<FeatureCollection, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_geojson(&name, &text, options)
}
