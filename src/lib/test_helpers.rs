use super::geo::Cartesian3;
use super::items::{Feature, FeatureCollection, PolygonGraphics, Properties};
use serde_json::Value;

pub fn positions(coordinates: &[(f64, f64)]) -> Vec<Cartesian3> {
    coordinates
        .iter()
        .map(|&(lon, lat)| Cartesian3::from_degrees(lon, lat, 0.))
        .collect()
}

pub fn polygon_feature(id: &str, coordinates: &[(f64, f64)]) -> Feature {
    let polygon = PolygonGraphics::new(positions(coordinates));
    Feature::new(id).with_polygon(polygon)
}

#[allow(dead_code)]
pub fn properties(entries: &[(&str, Value)]) -> Properties {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

/// A collection of unit squares laid out along the equator, one per id.
#[allow(dead_code)]
pub fn squares(name: &str, ids: &[&str]) -> FeatureCollection {
    let mut collection = FeatureCollection::new(name);
    for (idx, id) in ids.iter().enumerate() {
        let west = idx as f64 * 2.;
        let ring = [(west, 0.), (west + 1., 0.), (west + 1., 1.), (west, 1.)];
        collection.push(polygon_feature(id, &ring));
    }
    collection
}
