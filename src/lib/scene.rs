use super::geo::to_location;
use super::items::{Feature, FeatureCollection, FeatureKey};
use super::selection::{Scene, ScreenPosition};
use geo::prelude::*;
use geo_types::{LineString, Point, Polygon};

/// A flat map view: screen positions are longitude/latitude degrees.
///
/// Layers are drawn in order, so later layers (and later features within a
/// layer) are on top.
#[derive(Debug, Clone, Default)]
pub struct MapScene {
    pub layers: Vec<FeatureCollection>,
    pub time: f64,
}

fn covers(feature: &Feature, point: &Point<f64>, time: f64) -> bool {
    let positions = match feature
        .polygon
        .as_ref()
        .and_then(|polygon| polygon.hierarchy.value(time))
    {
        Some(positions) => positions,
        None => return false,
    };
    let ring: Vec<(f64, f64)> = positions
        .iter()
        .filter_map(to_location)
        .map(Into::into)
        .collect();
    if ring.len() < 3 {
        return false;
    }
    Polygon::new(LineString::from(ring), vec![]).contains(point)
}

impl MapScene {
    pub fn new(layers: Vec<FeatureCollection>) -> Self {
        MapScene { layers, time: 0. }
    }

    pub fn add_layer(&mut self, layer: FeatureCollection) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }
}

impl Scene for MapScene {
    fn pick(&self, position: ScreenPosition) -> Option<FeatureKey> {
        let point = Point::new(position.x, position.y);
        self.layers
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, layer)| layer.show)
            .find_map(|(idx, layer)| {
                let feature = layer
                    .features
                    .iter()
                    .rev()
                    .filter(|feature| feature.show)
                    .find(|feature| covers(feature, &point, self.time))?;
                Some(FeatureKey::new(idx, feature.id.clone()))
            })
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn feature(&self, key: &FeatureKey) -> Option<&Feature> {
        self.layers.get(key.layer)?.get(&key.id)
    }

    fn feature_mut(&mut self, key: &FeatureKey) -> Option<&mut Feature> {
        self.layers.get_mut(key.layer)?.get_mut(&key.id)
    }
}
