pub mod config;
pub mod error;
pub mod parser;
pub mod resolver;
pub mod services;

pub use config::ResolverConfig;
pub use error::{ConfigError, ResolutionError};
pub use parser::{parse_place, ParsedPlace};
pub use resolver::PlaceResolver;
pub use services::{GenerateRequest, GroundedResponse, GroundingClient, GroundingSource, SourceKind};
pub use shared_types::{Coordinates, Entry, Place};
