use super::geo::Cartesian3;
use super::style::{Color, OutlineStyle, DEFAULT_FILL, DEFAULT_OUTLINE};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub type Properties = Map<String, Value>;

/// A value that may change over scene time.
#[derive(Debug, Clone, PartialEq)]
pub enum Property<T> {
    Constant(T),
    /// Samples sorted by time; each holds until the next one starts.
    Sampled(Vec<(f64, T)>),
}

impl<T> Property<T> {
    /// The value at `time`, `None` before the first sample.
    pub fn value(&self, time: f64) -> Option<&T> {
        match self {
            Property::Constant(value) => Some(value),
            Property::Sampled(samples) => samples
                .iter()
                .take_while(|(start, _)| *start <= time)
                .last()
                .map(|(_, value)| value),
        }
    }
}

impl<T> From<T> for Property<T> {
    fn from(value: T) -> Self {
        Property::Constant(value)
    }
}

/// The polygon capability of a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonGraphics {
    pub hierarchy: Property<Vec<Cartesian3>>,
    pub fill: Color,
    pub outline: OutlineStyle,
    pub outline_enabled: bool,
}

impl PolygonGraphics {
    pub fn new(hierarchy: impl Into<Property<Vec<Cartesian3>>>) -> Self {
        PolygonGraphics {
            hierarchy: hierarchy.into(),
            fill: DEFAULT_FILL,
            outline: DEFAULT_OUTLINE,
            outline_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub name: Option<String>,
    pub show: bool,
    pub polygon: Option<PolygonGraphics>,
    pub properties: Property<Properties>,
}

impl Feature {
    pub fn new(id: impl ToString) -> Self {
        Feature {
            id: id.to_string(),
            name: None,
            show: true,
            polygon: None,
            properties: Properties::new().into(),
        }
    }

    pub fn with_polygon(mut self, polygon: PolygonGraphics) -> Self {
        self.polygon = Some(polygon);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_properties(mut self, properties: impl Into<Property<Properties>>) -> Self {
        self.properties = properties.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub name: String,
    pub show: bool,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(name: impl Into<String>) -> Self {
        FeatureCollection {
            name: name.into(),
            show: true,
            features: vec![],
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Feature> {
        self.features.iter_mut().find(|feature| feature.id == id)
    }

    /// Features that are shown themselves and whose collection is shown.
    pub fn showing(&self) -> impl Iterator<Item = &Feature> {
        let show = self.show;
        self.features.iter().filter(move |feature| show && feature.show)
    }
}

/// Addresses one feature among several collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureKey {
    pub layer: usize,
    pub id: String,
}

impl FeatureKey {
    pub fn new(layer: usize, id: impl Into<String>) -> Self {
        FeatureKey {
            layer,
            id: id.into(),
        }
    }
}

/// Hide every feature whose id appears in `ids`, returns how many were
/// switched from shown to hidden.
pub fn hide_features<S: AsRef<str>>(collections: &mut [FeatureCollection], ids: &[S]) -> usize {
    let ids: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
    let mut hidden = 0;
    for collection in collections.iter_mut() {
        for feature in collection.features.iter_mut() {
            if feature.show && ids.contains(feature.id.as_str()) {
                feature.show = false;
                hidden += 1;
            }
        }
    }
    hidden
}
