//! Interactive selection of rendered map polygons and k-threshold redaction
//! requests for the polygons currently on screen.
//!
//! Two independent pieces share the feature collections of a view:
//!
//! - [`SelectionTracker`] keeps at most one polygon highlighted in response
//!   to pointer picks and reports selection changes to a listener.
//! - [`request_redaction`] extracts the visible polygons as closed
//!   longitude/latitude rings, sends them to a redaction service and returns
//!   the ids the service wants hidden.
//!
//! # Example
//!
//! ```
//! use region_redact::{
//!     hide_features, parse_geojson, request_redaction, LoadOptions, LocalTransport,
//!     RedactionOptions,
//! };
//!
//! let text = r#"{"type": "FeatureCollection", "features": [{
//!     "type": "Feature", "id": "strip", "properties": {},
//!     "geometry": {"type": "Polygon", "coordinates": [[
//!         [76.0, 39.40], [76.1, 39.40], [76.1, 39.41], [76.0, 39.41], [76.0, 39.40]
//!     ]]}
//! }]}"#;
//! let mut layers = vec![parse_geojson("regions", text, &LoadOptions::default()).unwrap()];
//!
//! let result =
//!     request_redaction(&LocalTransport, &layers, 0., &RedactionOptions::default()).unwrap();
//! assert_eq!(result.ids_to_hide, vec!["strip"]);
//!
//! hide_features(&mut layers, &result.ids_to_hide);
//! assert!(!layers[0].features[0].show);
//! ```

pub mod compactness;
pub mod extract;
pub mod geo;
pub mod items;
pub mod loader;
pub mod output;
pub mod protocol;
pub mod redaction;
pub mod scene;
pub mod selection;
pub mod style;

#[cfg(test)]
mod test_helpers;

pub use compactness::LocalTransport;
pub use extract::{extract_visible_polygons, PolygonFeature};
pub use items::{hide_features, Feature, FeatureCollection, FeatureKey, PolygonGraphics, Property};
pub use loader::{load_geojson, parse_geojson, LoadError, LoadOptions};
pub use redaction::{
    request_redaction, HttpTransport, RedactionError, RedactionOptions, RedactionResult,
    RedactionSession, Resolution, Transport, DEFAULT_ENDPOINT, DEFAULT_K_THRESHOLD,
};
pub use scene::MapScene;
pub use selection::{Scene, ScreenPosition, SelectionInfo, SelectionListener, SelectionTracker};
