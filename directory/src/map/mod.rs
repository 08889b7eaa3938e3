//! Map marker reconciliation and the adapter that drives a [`MapWidget`].

use std::{collections::HashMap, time::Duration};

use shared_types::{Coordinates, Entry};
use tracing::debug;

use crate::selection::SelectionState;

pub mod marker;
pub mod reconcile;
pub mod util;
pub mod widget;

#[cfg(test)]
pub(crate) mod testing;

pub use marker::{MarkerIcon, MarkerStyle};
pub use reconcile::{focus, reconcile, reconcile_candidate, CameraMove, CandidateOp, MarkerOp, MarkerState};
pub use widget::{BaseLayer, ControlPosition, CursorStyle, MapWidget, MarkerKey, TracingMapWidget, BASE_LAYERS};

pub const DEFAULT_CENTER: Coordinates = Coordinates { lat: 20.0, lng: 0.0 };
pub const DEFAULT_ZOOM: f64 = 2.0;
pub const PICK_ZOOM: f64 = 17.0;
pub const LOCATE_ZOOM: f64 = 17.0;
pub const LOCATE_FLIGHT: Duration = Duration::from_secs(1);

/// What one sync did to the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub camera_moved: bool,
}

/// Live marker bookkeeping for one widget.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    live: HashMap<String, MarkerState>,
    candidate: Option<Coordinates>,
    focused: Option<(String, Coordinates)>,
}

impl MarkerLayer {
    pub fn live(&self) -> &HashMap<String, MarkerState> {
        &self.live
    }

    pub fn candidate(&self) -> Option<Coordinates> {
        self.candidate
    }

    pub fn sync<W: MapWidget + ?Sized>(
        &mut self,
        widget: &mut W,
        entries: &[Entry],
        selected_id: Option<&str>,
        picked: Option<Coordinates>,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        let ops = reconcile(&self.live, entries, selected_id);
        for op in &ops {
            match op {
                MarkerOp::Create { id, state } => {
                    widget.add_marker(&MarkerKey::Entry(id.clone()), state.position, &state.style.icon());
                    report.created += 1;
                }
                MarkerOp::Update { id, state } => {
                    widget.update_marker(&MarkerKey::Entry(id.clone()), state.position, &state.style.icon());
                    report.updated += 1;
                }
                MarkerOp::Remove { id } => {
                    widget.remove_marker(&MarkerKey::Entry(id.clone()));
                    report.removed += 1;
                }
            }
        }
        reconcile::apply(&mut self.live, &ops);

        match reconcile_candidate(self.candidate, picked) {
            Some(CandidateOp::Create(point)) => {
                widget.add_marker(&MarkerKey::Candidate, point, &MarkerStyle::Candidate.icon());
                widget.set_view(point, PICK_ZOOM, true);
                report.camera_moved = true;
            }
            Some(CandidateOp::Move(point)) => {
                widget.update_marker(&MarkerKey::Candidate, point, &MarkerStyle::Candidate.icon());
                widget.set_view(point, PICK_ZOOM, true);
                report.camera_moved = true;
            }
            Some(CandidateOp::Remove) => widget.remove_marker(&MarkerKey::Candidate),
            None => {}
        }
        self.candidate = picked;

        // Only fly when the focus target changes, not on every sync
        match (selected_id, focus(entries, selected_id)) {
            (Some(id), Some(CameraMove::FlyTo { center, zoom, duration })) => {
                let target = (id.to_string(), center);
                if self.focused.as_ref() != Some(&target) {
                    widget.fly_to(center, zoom, duration);
                    report.camera_moved = true;
                    self.focused = Some(target);
                }
            }
            _ => self.focused = None,
        }

        debug!(?report, "markers synced");
        report
    }
}

/// A widget together with its marker layer and picking-mode click gate.
pub struct MapView<W> {
    widget: W,
    layer: MarkerLayer,
    picking: bool,
}

impl<W: MapWidget> MapView<W> {
    /// Installs base layers, zoom control and the opening view.
    pub fn initialize(mut widget: W, entries: &[Entry]) -> Self {
        widget.add_base_layers(&BASE_LAYERS);
        widget.add_zoom_control(ControlPosition::BottomRight);
        let center = initial_center(entries);
        widget.set_view(center, DEFAULT_ZOOM, false);
        widget.set_cursor(CursorStyle::Grab);

        Self {
            widget,
            layer: MarkerLayer::default(),
            picking: false,
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn layer(&self) -> &MarkerLayer {
        &self.layer
    }

    pub fn set_picking(&mut self, picking: bool) {
        if self.picking != picking {
            self.picking = picking;
            self.widget.set_cursor(if picking {
                CursorStyle::Crosshair
            } else {
                CursorStyle::Grab
            });
        }
    }

    /// Forwards a click to the picking pipeline only while picking.
    pub fn click(&self, coords: Coordinates) -> Option<Coordinates> {
        self.picking.then(|| coords.normalized())
    }

    pub fn fly_to(&mut self, center: Coordinates, zoom: f64, duration: Duration) {
        self.widget.fly_to(center, zoom, duration);
    }

    pub fn sync(&mut self, entries: &[Entry], selection: &SelectionState) -> SyncReport {
        self.set_picking(selection.is_picking());
        self.layer.sync(
            &mut self.widget,
            entries,
            selection.selected_entry_id.as_deref(),
            selection.picked_coordinates,
        )
    }
}

fn initial_center(entries: &[Entry]) -> Coordinates {
    let points: Vec<Coordinates> = entries.iter().filter_map(Entry::coordinates).collect();
    util::get_geographic_center(&points).unwrap_or(DEFAULT_CENTER)
}
