use super::geo::{close_ring, to_location};
use super::items::{Feature, FeatureCollection};
use super::protocol::{Geometry, RequestFeature};
use itertools::Itertools;

/// A visible polygon in longitude/latitude degrees, ready to be sent.
///
/// The ring always holds at least three distinct vertices plus the closing
/// copy of the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub id: String,
    pub ring: Vec<(f64, f64)>,
}

impl From<PolygonFeature> for RequestFeature {
    fn from(feature: PolygonFeature) -> Self {
        RequestFeature {
            id: feature.id,
            geometry: Geometry::Polygon {
                coordinates: vec![feature.ring],
            },
        }
    }
}

/// Distinct vertices of a closed ring, the closing copy not counted.
fn distinct_vertices(ring: &[(f64, f64)]) -> usize {
    let open = &ring[..ring.len().saturating_sub(1)];
    // adding 0.0 folds -0.0 into 0.0
    open.iter()
        .unique_by(|&&(lon, lat)| ((lon + 0.0).to_bits(), (lat + 0.0).to_bits()))
        .count()
}

fn extract_polygon(feature: &Feature, time: f64) -> Option<PolygonFeature> {
    let polygon = feature.polygon.as_ref()?;
    let positions = polygon.hierarchy.value(time)?;
    if positions.len() < 3 {
        return None;
    }

    let mut ring: Vec<(f64, f64)> = positions
        .iter()
        .filter_map(to_location)
        .map(Into::into)
        .collect();
    close_ring(&mut ring);
    if distinct_vertices(&ring) < 3 {
        return None;
    }

    Some(PolygonFeature {
        id: feature.id.clone(),
        ring,
    })
}

/// Collect every shown polygon of `collections` as evaluated at `time`.
///
/// Features without a polygon, hidden features (or features of a hidden
/// collection) and rings with fewer than three vertices are skipped.
pub fn extract_visible_polygons<'a>(
    collections: impl IntoIterator<Item = &'a FeatureCollection>,
    time: f64,
) -> Vec<PolygonFeature> {
    collections
        .into_iter()
        .flat_map(|collection| collection.showing())
        .filter_map(|feature| extract_polygon(feature, time))
        .collect()
}
