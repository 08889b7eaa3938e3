//! Picking-mode state machine and the add-entry form it feeds.

use place_resolver::ResolutionError;
use shared_types::{Coordinates, Entry, Place};
use tracing::{debug, info, warn};

pub const PICK_FAILED: &str = "Failed to identify location details.";
pub const SUBMIT_FAILED: &str = "We couldn't verify this location. Please try a more specific address.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Waiting for the first map click.
    Picking,
    /// A candidate point was captured; further clicks refine it.
    Reviewing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selected_entry_id: Option<String>,
    pub mode: InteractionMode,
    pub picked_coordinates: Option<Coordinates>,
}

impl SelectionState {
    pub fn is_picking(&self) -> bool {
        self.mode != InteractionMode::Idle
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryForm {
    pub open: bool,
    pub name: String,
    pub address: String,
    /// Last place resolved for the address field.
    pub place: Option<Place>,
    pub resolving_pick: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

impl EntryForm {
    pub fn is_loading(&self) -> bool {
        self.resolving_pick || self.submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.name.trim().is_empty() && !self.address.trim().is_empty()
    }
}

/// A coordinate lookup tagged with the pick that issued it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRequest {
    pub token: u64,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitPlan {
    NoOp,
    Reuse(Place),
    Resolve(String),
}

/// Text shown in the address field while a picked point is being resolved.
pub fn pick_placeholder(coords: Coordinates) -> String {
    format!("{:.4}, {:.4}...", coords.lat, coords.lng)
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    form: EntryForm,
    latest_pick: u64,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn open_form(&mut self) {
        self.form.open = true;
    }

    /// Closing the form also leaves picking mode.
    pub fn close_form(&mut self) {
        self.form.open = false;
        self.cancel_picking();
    }

    /// Ignored while a submission is in flight; the form is locked until it reports.
    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.form.submitting {
            debug!("form locked, ignoring name edit");
            return;
        }
        self.form.name = name.into();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        if self.form.submitting {
            debug!("form locked, ignoring address edit");
            return;
        }
        self.form.address = address.into();
    }

    pub fn start_picking(&mut self) {
        if self.state.mode == InteractionMode::Idle {
            info!("picking mode started");
            self.state.mode = InteractionMode::Picking;
        }
        self.form.open = true;
    }

    pub fn cancel_picking(&mut self) {
        if self.state.is_picking() {
            info!("picking mode cancelled");
        }
        // An abandoned lookup never replaces its placeholder, so drop it here
        if self.form.resolving_pick {
            if let Some(coords) = self.state.picked_coordinates {
                if self.form.address == pick_placeholder(coords) {
                    self.form.address.clear();
                }
            }
        }
        self.state.mode = InteractionMode::Idle;
        self.state.picked_coordinates = None;
        self.form.resolving_pick = false;
        // Any lookup still in flight is now stale
        self.latest_pick += 1;
    }

    pub fn toggle_picking(&mut self) {
        if self.state.is_picking() {
            self.cancel_picking();
        } else {
            self.start_picking();
        }
    }

    /// Selecting the same entry twice clears the selection. Any list
    /// interaction leaves picking mode.
    pub fn toggle_selection(&mut self, id: &str) {
        if self.state.selected_entry_id.as_deref() == Some(id) {
            self.state.selected_entry_id = None;
        } else {
            self.state.selected_entry_id = Some(id.to_string());
        }
        if self.state.is_picking() {
            self.cancel_picking();
        }
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.state.selected_entry_id = Some(id.into());
    }

    /// Records a map click while picking and hands back the lookup to run.
    pub fn capture_pick(&mut self, coords: Coordinates) -> Option<PickRequest> {
        if !self.state.is_picking() {
            return None;
        }

        self.latest_pick += 1;
        self.state.mode = InteractionMode::Reviewing;
        self.state.picked_coordinates = Some(coords);
        self.form.open = true;
        self.form.address = pick_placeholder(coords);
        self.form.resolving_pick = true;
        self.form.error = None;

        debug!(token = self.latest_pick, lat = coords.lat, lng = coords.lng, "captured pick");
        Some(PickRequest {
            token: self.latest_pick,
            coordinates: coords,
        })
    }

    /// Applies a finished lookup unless a newer pick superseded it.
    /// Returns whether the result was applied.
    pub fn apply_pick(&mut self, token: u64, result: Result<Place, ResolutionError>) -> bool {
        if token != self.latest_pick {
            warn!(token, latest = self.latest_pick, "dropping stale pick result");
            return false;
        }

        self.form.resolving_pick = false;
        match result {
            Ok(place) => {
                self.form.address = place.formatted_address.clone();
                self.form.place = Some(place);
                self.form.error = None;
            }
            Err(err) => {
                warn!(error = %err, "pick lookup failed");
                self.form.error = Some(PICK_FAILED.to_string());
            }
        }
        true
    }

    pub fn prepare_submit(&mut self) -> SubmitPlan {
        if self.form.is_loading() {
            debug!("submission already in flight");
            return SubmitPlan::NoOp;
        }
        let address = self.form.address.trim();
        if self.form.name.trim().is_empty() || address.is_empty() {
            return SubmitPlan::NoOp;
        }

        let plan = match &self.form.place {
            Some(place) if place.formatted_address == self.form.address => {
                SubmitPlan::Reuse(place.clone())
            }
            _ => SubmitPlan::Resolve(address.to_string()),
        };

        self.form.submitting = true;
        self.form.error = None;
        plan
    }

    /// Builds the new entry on success and resets the form; keeps the form
    /// populated with an error otherwise.
    pub fn finish_submit(&mut self, result: Result<Place, ResolutionError>) -> Option<Entry> {
        self.form.submitting = false;

        match result {
            Ok(place) => {
                let entry = Entry::new(self.form.name.trim(), place);
                self.form = EntryForm::default();
                self.cancel_picking();
                Some(entry)
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                self.form.error = Some(SUBMIT_FAILED.to_string());
                None
            }
        }
    }
}
