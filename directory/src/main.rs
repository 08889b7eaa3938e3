use std::env;

use anyhow::Context;
use directory::{
    map::TracingMapWidget, DirectoryApp, EntryStore, FixedGeolocator, UiEvent,
};
use place_resolver::{Coordinates, PlaceResolver, ResolverConfig};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "commands: name <text> | address <text> | pick | cancel | click <lat>,<lng> | \
select <n> | search <text> | submit | locate | dismiss | open | close | quit";

fn parse_command(line: &str, listed: &[String]) -> Result<Option<UiEvent>, String> {
    let line = line.trim();
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let event = match command {
        "" => return Ok(None),
        "name" => UiEvent::SetName(rest.to_string()),
        "address" => UiEvent::SetAddress(rest.to_string()),
        "pick" => UiEvent::TogglePicking,
        "cancel" => UiEvent::CancelPicking,
        "open" => UiEvent::OpenForm,
        "close" => UiEvent::CloseForm,
        "submit" => UiEvent::Submit,
        "locate" => UiEvent::LocateMe,
        "dismiss" => UiEvent::DismissNotice,
        "search" => UiEvent::Search(rest.to_string()),
        "click" => {
            let (lat, lng) = rest.split_once(',').ok_or("expected <lat>,<lng>")?;
            let lat = lat.trim().parse().map_err(|_| "latitude must be a number")?;
            let lng = lng.trim().parse().map_err(|_| "longitude must be a number")?;
            UiEvent::MapClicked(Coordinates::new(lat, lng))
        }
        "select" => {
            let index: usize = rest.parse().map_err(|_| "expected a list number")?;
            let id = index
                .checked_sub(1)
                .and_then(|i| listed.get(i))
                .ok_or("no such list entry")?;
            UiEvent::SelectEntry(id.clone())
        }
        other => return Err(format!("unknown command {other:?}; {HELP}")),
    };
    Ok(Some(event))
}

fn render(app: &DirectoryApp<TracingMapWidget>) {
    let entries = app.visible_entries();
    let selected = app.selection().state().selected_entry_id.as_deref();

    println!("Community Members ({})", app.store().len());
    for (i, entry) in entries.iter().enumerate() {
        let marker = if Some(entry.id.as_str()) == selected { '*' } else { ' ' };
        println!(
            "{} {:>2}. [{}] {} - {}",
            marker,
            i + 1,
            entry.initial().unwrap_or('?'),
            entry.name,
            entry.location.formatted_address
        );
        if Some(entry.id.as_str()) == selected {
            println!("       {}", entry.location.summary);
            if let Some(kind) = &entry.location.place_type {
                println!("       type: {kind}");
            }
            if let Some(link) = &entry.location.map_link_uri {
                println!("       map: {link}");
            }
        }
    }

    let form = app.selection().form();
    if form.open || app.selection().state().is_picking() {
        println!(
            "form: name={:?} address={:?}{}{}",
            form.name,
            form.address,
            if form.is_loading() { " (verifying...)" } else { "" },
            if app.selection().state().is_picking() { " [click map to place pin]" } else { "" },
        );
    }
    if let Some(error) = &form.error {
        println!("error: {error}");
    }
    if let Some(notice) = app.notice() {
        println!("notice: {notice}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,directory=debug,place_resolver=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Tracing initialized");

    let config = ResolverConfig::from_env().context("grounding service configuration")?;
    let resolver = PlaceResolver::from_config(&config)?;

    let seed = env::var("SEED_DIRECTORY")
        .map(|v| v != "false" && v != "0")
        .unwrap_or(true);
    let store = if seed { EntryStore::seeded() } else { EntryStore::new() };

    let geolocator = env::var("DEVICE_LOCATION")
        .map(|raw| FixedGeolocator::parse(&raw))
        .unwrap_or_default();

    let app = DirectoryApp::new(store, resolver, geolocator, TracingMapWidget::default());
    let (tx, rx) = mpsc::unbounded_channel();
    let mut listed: Vec<String> = app.visible_entries().iter().map(|e| e.id.clone()).collect();

    println!("{HELP}");
    let (listed_tx, mut listed_rx) = tokio::sync::watch::channel(listed.clone());

    let input = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim() == "quit" {
                break;
            }
            if listed_rx.has_changed().unwrap_or(false) {
                listed = listed_rx.borrow_and_update().clone();
            }
            match parse_command(&line, &listed) {
                Ok(Some(event)) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(message) => eprintln!("{message}"),
            }
        }
    });

    let app = app
        .run(rx, |app| {
            render(app);
            let ids = app.visible_entries().iter().map(|e| e.id.clone()).collect();
            listed_tx.send_replace(ids);
        })
        .await;

    input.await?;
    tracing::info!(
        members = app.store().len(),
        markers = app.map().widget().marker_count(),
        "directory closed"
    );
    Ok(())
}
