pub mod app;
pub mod error;
pub mod geolocation;
pub mod map;
pub mod selection;
pub mod store;

pub use app::{DirectoryApp, UiEvent};
pub use error::DirectoryError;
pub use geolocation::{FixedGeolocator, GeolocationError, Geolocator};
pub use selection::{InteractionMode, SelectionController, SelectionState};
pub use store::EntryStore;
