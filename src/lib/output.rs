use super::extract::PolygonFeature;
use super::items::Properties;
use super::protocol::Geometry;
use super::redaction::RedactionResult;
use super::selection::{SelectionInfo, SelectionListener};
use serde::Serialize;
use serde_json::to_string;
use std::error::Error;
use std::io::Write;

pub trait Output {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
}

#[derive(Serialize)]
struct JSONHidden<'a> {
    id: &'a str,
}

impl Output for RedactionResult {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        for id in self.ids_to_hide.iter() {
            let json = to_string(&JSONHidden { id })?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JSONPolygon<'a> {
    id: &'a str,
    ring: &'a [(f64, f64)],
}

impl Output for Vec<PolygonFeature> {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        for feature in self.iter() {
            let json_polygon = JSONPolygon {
                id: &feature.id,
                ring: &feature.ring,
            };
            let json = to_string(&json_polygon)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum Entity {
    Feature {
        id: String,
        properties: Properties,
        geometry: Geometry,
    },
    FeatureCollection {
        features: Vec<Entity>,
    },
}

/// Write `features` as a single GeoJSON FeatureCollection line.
pub fn write_geojson(
    features: &[PolygonFeature],
    writer: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    let features = features
        .iter()
        .map(|feature| Entity::Feature {
            id: feature.id.clone(),
            properties: Properties::new(),
            geometry: Geometry::Polygon {
                coordinates: vec![feature.ring.clone()],
            },
        })
        .collect();
    let feature_collection = Entity::FeatureCollection { features };
    let string = to_string(&feature_collection)?;
    writeln!(writer, "{}", string)?;
    Ok(())
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum SelectionEvent {
    Selected { name: String, properties: Properties },
    Cleared,
}

/// Records every selection change, in order.
#[derive(Debug, Default)]
pub struct SelectionLog {
    pub events: Vec<SelectionEvent>,
}

impl SelectionListener for SelectionLog {
    fn on_selected(&mut self, info: SelectionInfo) {
        let SelectionInfo { name, properties } = info;
        self.events
            .push(SelectionEvent::Selected { name, properties });
    }

    fn on_cleared(&mut self) {
        self.events.push(SelectionEvent::Cleared);
    }
}

impl Output for SelectionLog {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        for event in self.events.iter() {
            let json = to_string(event)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }
}
