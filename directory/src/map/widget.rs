// Boundary to whatever interactive map renders the directory

use std::time::Duration;

use shared_types::Coordinates;
use tracing::info;

use super::marker::MarkerIcon;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerKey {
    Entry(String),
    Candidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseLayer {
    pub name: &'static str,
    pub url_template: &'static str,
    pub max_zoom: u8,
    pub attribution: &'static str,
}

pub const BASE_LAYERS: [BaseLayer; 3] = [
    BaseLayer {
        name: "Map",
        url_template: "https://mt1.google.com/vt/lyrs=m&x={x}&y={y}&z={z}",
        max_zoom: 20,
        attribution: "&copy; Google Maps",
    },
    BaseLayer {
        name: "Satellite",
        url_template: "https://mt1.google.com/vt/lyrs=y&x={x}&y={y}&z={z}",
        max_zoom: 20,
        attribution: "&copy; Google Maps",
    },
    BaseLayer {
        name: "Terrain",
        url_template: "https://mt1.google.com/vt/lyrs=p&x={x}&y={y}&z={z}",
        max_zoom: 20,
        attribution: "&copy; Google Maps",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Grab,
    Crosshair,
}

/// Imperative surface of an interactive map. The first layer passed to
/// `add_base_layers` is the active one; the rest are switchable.
pub trait MapWidget {
    fn add_base_layers(&mut self, layers: &[BaseLayer]);
    fn add_zoom_control(&mut self, position: ControlPosition);
    fn set_view(&mut self, center: Coordinates, zoom: f64, animate: bool);
    fn fly_to(&mut self, center: Coordinates, zoom: f64, duration: Duration);
    fn add_marker(&mut self, key: &MarkerKey, position: Coordinates, icon: &MarkerIcon);
    fn update_marker(&mut self, key: &MarkerKey, position: Coordinates, icon: &MarkerIcon);
    fn remove_marker(&mut self, key: &MarkerKey);
    fn set_cursor(&mut self, cursor: CursorStyle);
}

/// Headless widget that reports every call through `tracing`.
#[derive(Debug, Default)]
pub struct TracingMapWidget {
    markers: usize,
}

impl TracingMapWidget {
    pub fn marker_count(&self) -> usize {
        self.markers
    }
}

impl MapWidget for TracingMapWidget {
    fn add_base_layers(&mut self, layers: &[BaseLayer]) {
        let names: Vec<&str> = layers.iter().map(|l| l.name).collect();
        info!(?names, "map: base layers");
    }

    fn add_zoom_control(&mut self, position: ControlPosition) {
        info!(?position, "map: zoom control");
    }

    fn set_view(&mut self, center: Coordinates, zoom: f64, animate: bool) {
        info!(lat = center.lat, lng = center.lng, zoom, animate, "map: set view");
    }

    fn fly_to(&mut self, center: Coordinates, zoom: f64, duration: Duration) {
        info!(lat = center.lat, lng = center.lng, zoom, ?duration, "map: fly to");
    }

    fn add_marker(&mut self, key: &MarkerKey, position: Coordinates, icon: &MarkerIcon) {
        self.markers += 1;
        info!(?key, lat = position.lat, lng = position.lng, z = icon.z_index, "map: add marker");
    }

    fn update_marker(&mut self, key: &MarkerKey, position: Coordinates, icon: &MarkerIcon) {
        info!(?key, lat = position.lat, lng = position.lng, z = icon.z_index, "map: update marker");
    }

    fn remove_marker(&mut self, key: &MarkerKey) {
        self.markers = self.markers.saturating_sub(1);
        info!(?key, "map: remove marker");
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        info!(?cursor, "map: cursor");
    }
}
