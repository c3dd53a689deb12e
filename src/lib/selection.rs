use super::items::{Feature, FeatureKey, Properties};
use super::style::{OutlineStyle, DEFAULT_OUTLINE, HIGHLIGHT_OUTLINE};
use serde::Serialize;
use serde_json::Value;

/// Name reported for features that carry none.
pub const DEFAULT_LABEL: &str = "Region";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPosition {
    pub x: f64,
    pub y: f64,
}

impl ScreenPosition {
    pub fn new(x: f64, y: f64) -> Self {
        ScreenPosition { x, y }
    }
}

/// What the selection tracker needs from the rendering side.
pub trait Scene {
    /// The topmost feature rendered at `position`.
    fn pick(&self, position: ScreenPosition) -> Option<FeatureKey>;
    fn current_time(&self) -> f64;
    fn feature(&self, key: &FeatureKey) -> Option<&Feature>;
    fn feature_mut(&mut self, key: &FeatureKey) -> Option<&mut Feature>;
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SelectionInfo {
    pub name: String,
    pub properties: Properties,
}

impl SelectionInfo {
    fn resolve(feature: &Feature, time: f64) -> Self {
        let properties = feature
            .properties
            .value(time)
            .cloned()
            .unwrap_or_default();
        let name = match properties.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => feature
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        };
        SelectionInfo { name, properties }
    }
}

pub trait SelectionListener {
    fn on_selected(&mut self, info: SelectionInfo);

    fn on_cleared(&mut self) {}
}

impl<F: FnMut(SelectionInfo)> SelectionListener for F {
    fn on_selected(&mut self, info: SelectionInfo) {
        self(info)
    }
}

/// Tracks the one highlighted polygon of a view.
///
/// Clicking a polygon highlights it and reports it to the listener, clicking
/// it again or clicking anywhere else clears the selection.
pub struct SelectionTracker<L> {
    listener: L,
    selected: Option<FeatureKey>,
}

fn set_outline<S: Scene + ?Sized>(scene: &mut S, key: &FeatureKey, style: OutlineStyle) {
    let polygon = scene
        .feature_mut(key)
        .and_then(|feature| feature.polygon.as_mut());
    if let Some(polygon) = polygon {
        polygon.outline = style;
    }
}

impl<L: SelectionListener> SelectionTracker<L> {
    pub fn new(listener: L) -> Self {
        SelectionTracker {
            listener,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&FeatureKey> {
        self.selected.as_ref()
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    pub fn handle_click<S: Scene + ?Sized>(&mut self, scene: &mut S, position: ScreenPosition) {
        let picked = scene.pick(position);
        self.handle_pick(scene, picked);
    }

    pub fn handle_pick<S: Scene + ?Sized>(&mut self, scene: &mut S, picked: Option<FeatureKey>) {
        let picked = picked.filter(|key| {
            scene
                .feature(key)
                .map_or(false, |feature| feature.polygon.is_some())
        });
        match picked {
            Some(key) if self.selected.as_ref() != Some(&key) => self.select(scene, key),
            _ => self.clear_selection(scene),
        }
    }

    /// Reset the selected feature, if any. The listener is told even when
    /// nothing was selected.
    pub fn clear_selection<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        self.reset_selected(scene);
        self.listener.on_cleared();
    }

    fn reset_selected<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        if let Some(previous) = self.selected.take() {
            set_outline(scene, &previous, DEFAULT_OUTLINE);
        }
    }

    fn select<S: Scene + ?Sized>(&mut self, scene: &mut S, key: FeatureKey) {
        // the old outline has to go before the new one is drawn
        self.reset_selected(scene);
        set_outline(scene, &key, HIGHLIGHT_OUTLINE);

        let time = scene.current_time();
        let info = scene
            .feature(&key)
            .map(|feature| SelectionInfo::resolve(feature, time));
        self.selected = Some(key);
        if let Some(info) = info {
            self.listener.on_selected(info);
        }
    }
}
