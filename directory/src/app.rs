//! Top-level owner of directory state. UI events come in on a channel; service
//! lookups run as spawned tasks and report back, so the loop never blocks on them.

use std::sync::Arc;

use place_resolver::{PlaceResolver, ResolutionError};
use shared_types::{Coordinates, Entry, Place};
use tokio::{sync::mpsc, task::JoinSet};
use tracing::{debug, error, info, warn};

use crate::{
    error::DirectoryError,
    geolocation::{GeolocationError, Geolocator, LOCATE_FAILED},
    map::{MapView, MapWidget, SyncReport, LOCATE_FLIGHT, LOCATE_ZOOM},
    selection::{PickRequest, SelectionController, SubmitPlan},
    store::EntryStore,
};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    OpenForm,
    CloseForm,
    SetName(String),
    SetAddress(String),
    StartPicking,
    CancelPicking,
    TogglePicking,
    MapClicked(Coordinates),
    SelectEntry(String),
    Search(String),
    Submit,
    LocateMe,
    DismissNotice,
}

enum Completion {
    Pick {
        token: u64,
        result: Result<Place, ResolutionError>,
    },
    Submit(Result<Place, ResolutionError>),
    Located(Result<Coordinates, GeolocationError>),
}

pub struct DirectoryApp<W> {
    store: EntryStore,
    selection: SelectionController,
    map: MapView<W>,
    resolver: PlaceResolver,
    geolocator: Arc<dyn Geolocator>,
    search: String,
    notice: Option<String>,
}

impl<W: MapWidget> DirectoryApp<W> {
    pub fn new(
        store: EntryStore,
        resolver: PlaceResolver,
        geolocator: impl Geolocator + 'static,
        widget: W,
    ) -> Self {
        let map = MapView::initialize(widget, store.all());
        let mut app = Self {
            store,
            selection: SelectionController::new(),
            map,
            resolver,
            geolocator: Arc::new(geolocator),
            search: String::new(),
            notice: None,
        };
        app.refresh();
        app
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn map(&self) -> &MapView<W> {
        &self.map
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search
    }

    /// Entries the list shows under the current search.
    pub fn visible_entries(&self) -> Vec<&Entry> {
        self.store.search(&self.search)
    }

    fn refresh(&mut self) -> SyncReport {
        self.map.sync(self.store.all(), self.selection.state())
    }

    pub fn handle(&mut self, event: UiEvent) -> Option<PickRequest> {
        match event {
            UiEvent::OpenForm => self.selection.open_form(),
            UiEvent::CloseForm => self.selection.close_form(),
            UiEvent::SetName(name) => self.selection.set_name(name),
            UiEvent::SetAddress(address) => self.selection.set_address(address),
            UiEvent::StartPicking => self.selection.start_picking(),
            UiEvent::CancelPicking => self.selection.cancel_picking(),
            UiEvent::TogglePicking => self.selection.toggle_picking(),
            UiEvent::MapClicked(coords) => return self.handle_map_click(coords),
            UiEvent::SelectEntry(id) => self.selection.toggle_selection(&id),
            UiEvent::Search(query) => self.search = query,
            UiEvent::DismissNotice => self.notice = None,
            UiEvent::Submit | UiEvent::LocateMe => {
                debug!(?event, "async event passed to handle, ignoring");
                return None;
            }
        }
        self.refresh();
        None
    }

    pub fn handle_map_click(&mut self, coords: Coordinates) -> Option<PickRequest> {
        let coords = self.map.click(coords)?;
        let request = self.selection.capture_pick(coords)?;
        self.refresh();
        Some(request)
    }

    pub fn apply_pick(&mut self, token: u64, result: Result<Place, ResolutionError>) -> bool {
        let applied = self.selection.apply_pick(token, result);
        self.refresh();
        applied
    }

    /// Captures a click and resolves it inline.
    pub async fn pick_and_resolve(&mut self, coords: Coordinates) -> bool {
        let Some(request) = self.handle_map_click(coords) else {
            return false;
        };
        let result = self.resolver.resolve_by_coordinates(request.coordinates).await;
        self.apply_pick(request.token, result)
    }

    pub fn begin_submit(&mut self) -> SubmitPlan {
        self.selection.prepare_submit()
    }

    /// Adds the submitted entry and selects it. Returns the new id, or `None`
    /// when the lookup failed and the form kept its error.
    pub fn complete_submit(
        &mut self,
        result: Result<Place, ResolutionError>,
    ) -> Result<Option<String>, DirectoryError> {
        let Some(entry) = self.selection.finish_submit(result) else {
            self.refresh();
            return Ok(None);
        };

        let id = entry.id.clone();
        info!(%id, name = %entry.name, "member joined");
        self.store.add(entry)?;
        self.selection.select(id.clone());
        self.refresh();
        Ok(Some(id))
    }

    pub async fn submit(&mut self) -> Result<Option<String>, DirectoryError> {
        match self.begin_submit() {
            SubmitPlan::NoOp => Ok(None),
            SubmitPlan::Reuse(place) => self.complete_submit(Ok(place)),
            SubmitPlan::Resolve(address) => {
                let result = self.resolver.resolve_by_address(&address).await;
                self.complete_submit(result)
            }
        }
    }

    /// Recenters on the device and, while picking, treats it as a click.
    pub fn apply_location(
        &mut self,
        result: Result<Coordinates, GeolocationError>,
    ) -> Option<PickRequest> {
        match result {
            Ok(coords) => {
                self.map.fly_to(coords, LOCATE_ZOOM, LOCATE_FLIGHT);
                let request = self.selection.capture_pick(coords);
                self.refresh();
                request
            }
            Err(err) => {
                warn!(error = %err, "geolocation failed");
                self.notice = Some(LOCATE_FAILED.to_string());
                None
            }
        }
    }

    pub async fn locate_me(&mut self) -> bool {
        let result = self.geolocator.current_position().await;
        match self.apply_location(result) {
            Some(request) => {
                let result = self.resolver.resolve_by_coordinates(request.coordinates).await;
                self.apply_pick(request.token, result)
            }
            None => false,
        }
    }

    /// Runs until `events` closes and every outstanding lookup has reported.
    /// `render` is called after each state change.
    pub async fn run<F>(mut self, mut events: mpsc::UnboundedReceiver<UiEvent>, mut render: F) -> Self
    where
        F: FnMut(&Self),
    {
        let mut tasks = JoinSet::new();
        let mut closed = false;
        render(&self);

        loop {
            if closed && tasks.is_empty() {
                break;
            }

            tokio::select! {
                event = events.recv(), if !closed => match event {
                    Some(event) => self.dispatch(event, &mut tasks),
                    None => closed = true,
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => match joined {
                    Ok(done) => self.complete(done, &mut tasks),
                    Err(e) => error!(error = %e, "lookup task failed"),
                }
            }

            render(&self);
        }

        self
    }

    fn dispatch(&mut self, event: UiEvent, tasks: &mut JoinSet<Completion>) {
        match event {
            UiEvent::Submit => match self.begin_submit() {
                SubmitPlan::NoOp => {}
                SubmitPlan::Reuse(place) => self.report_submit(Ok(place)),
                SubmitPlan::Resolve(address) => {
                    let resolver = self.resolver.clone();
                    tasks.spawn(async move {
                        Completion::Submit(resolver.resolve_by_address(&address).await)
                    });
                }
            },
            UiEvent::LocateMe => {
                let geolocator = self.geolocator.clone();
                tasks.spawn(async move { Completion::Located(geolocator.current_position().await) });
            }
            other => {
                if let Some(request) = self.handle(other) {
                    self.spawn_pick(request, tasks);
                }
            }
        }
    }

    fn complete(&mut self, done: Completion, tasks: &mut JoinSet<Completion>) {
        match done {
            Completion::Pick { token, result } => {
                self.apply_pick(token, result);
            }
            Completion::Submit(result) => self.report_submit(result),
            Completion::Located(result) => {
                if let Some(request) = self.apply_location(result) {
                    self.spawn_pick(request, tasks);
                }
            }
        }
    }

    fn report_submit(&mut self, result: Result<Place, ResolutionError>) {
        if let Err(err) = self.complete_submit(result) {
            error!(error = %err, "could not add entry");
        }
    }

    fn spawn_pick(&self, request: PickRequest, tasks: &mut JoinSet<Completion>) {
        let resolver = self.resolver.clone();
        tasks.spawn(async move {
            Completion::Pick {
                token: request.token,
                result: resolver.resolve_by_coordinates(request.coordinates).await,
            }
        });
    }
}
