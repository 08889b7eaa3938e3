use std::env;

use anyhow::{anyhow, Context};
use place_resolver::{Coordinates, PlaceResolver, ResolverConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

enum ResolveAction {
    Address,
    Coordinates,
}

impl ResolveAction {
    fn new(action: &str) -> anyhow::Result<Self> {
        match action {
            "RESOLVE_ADDRESS" => Ok(Self::Address),
            "RESOLVE_COORDINATES" => Ok(Self::Coordinates),
            other => Err(anyhow!("Invalid action {other:?}")),
        }
    }
}

fn coordinate_var(key: &str) -> anyhow::Result<f64> {
    env::var(key)
        .with_context(|| format!("{key} to be set"))?
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a valid number"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,place_resolver=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let action = env::var("ACTION").context("ACTION to be set")?;
    let config = ResolverConfig::from_env()?;
    let resolver = PlaceResolver::from_config(&config)?;

    let place = match ResolveAction::new(&action)? {
        ResolveAction::Address => {
            let query = env::var("QUERY").context("QUERY to be set")?;
            resolver.resolve_by_address(&query).await?
        }
        ResolveAction::Coordinates => {
            let coords = Coordinates::new(coordinate_var("LAT")?, coordinate_var("LNG")?);
            if !coords.is_valid() {
                return Err(anyhow!("LAT/LNG out of range: {}, {}", coords.lat, coords.lng));
            }
            resolver.resolve_by_coordinates(coords).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&place)?);
    Ok(())
}
