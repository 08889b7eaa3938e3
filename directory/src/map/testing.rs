use std::time::Duration;

use shared_types::Coordinates;

use super::{
    marker::MarkerIcon,
    widget::{BaseLayer, ControlPosition, CursorStyle, MapWidget, MarkerKey},
};

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCall {
    BaseLayers(Vec<&'static str>),
    ZoomControl(ControlPosition),
    SetView { center: Coordinates, zoom: f64, animate: bool },
    FlyTo { center: Coordinates, zoom: f64 },
    AddMarker(MarkerKey, Coordinates),
    UpdateMarker(MarkerKey, Coordinates),
    RemoveMarker(MarkerKey),
    Cursor(CursorStyle),
}

impl WidgetCall {
    pub fn is_candidate(&self) -> bool {
        matches!(
            self,
            Self::AddMarker(MarkerKey::Candidate, _)
                | Self::UpdateMarker(MarkerKey::Candidate, _)
                | Self::RemoveMarker(MarkerKey::Candidate)
        )
    }
}

/// Widget double that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingWidget {
    pub calls: Vec<WidgetCall>,
}

impl RecordingWidget {
    pub fn markers_at(&self, position: Coordinates) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, WidgetCall::AddMarker(MarkerKey::Entry(_), p) if *p == position))
            .count()
    }

    pub fn flew_to(&self, center: Coordinates) -> bool {
        self.calls
            .iter()
            .any(|c| matches!(c, WidgetCall::FlyTo { center: at, .. } if *at == center))
    }
}

impl MapWidget for RecordingWidget {
    fn add_base_layers(&mut self, layers: &[BaseLayer]) {
        self.calls
            .push(WidgetCall::BaseLayers(layers.iter().map(|l| l.name).collect()));
    }

    fn add_zoom_control(&mut self, position: ControlPosition) {
        self.calls.push(WidgetCall::ZoomControl(position));
    }

    fn set_view(&mut self, center: Coordinates, zoom: f64, animate: bool) {
        self.calls.push(WidgetCall::SetView { center, zoom, animate });
    }

    fn fly_to(&mut self, center: Coordinates, zoom: f64, _duration: Duration) {
        self.calls.push(WidgetCall::FlyTo { center, zoom });
    }

    fn add_marker(&mut self, key: &MarkerKey, position: Coordinates, _icon: &MarkerIcon) {
        self.calls.push(WidgetCall::AddMarker(key.clone(), position));
    }

    fn update_marker(&mut self, key: &MarkerKey, position: Coordinates, _icon: &MarkerIcon) {
        self.calls.push(WidgetCall::UpdateMarker(key.clone(), position));
    }

    fn remove_marker(&mut self, key: &MarkerKey) {
        self.calls.push(WidgetCall::RemoveMarker(key.clone()));
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.calls.push(WidgetCall::Cursor(cursor));
    }
}
