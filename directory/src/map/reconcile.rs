//! Pure diffing of directory entries against the markers a map currently shows.

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use shared_types::{Coordinates, Entry};

use super::marker::MarkerStyle;

pub const FOCUS_ZOOM: f64 = 17.0;
pub const FOCUS_FLIGHT: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerState {
    pub position: Coordinates,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerOp {
    Create { id: String, state: MarkerState },
    Update { id: String, state: MarkerState },
    Remove { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateOp {
    Create(Coordinates),
    Move(Coordinates),
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMove {
    FlyTo {
        center: Coordinates,
        zoom: f64,
        duration: Duration,
    },
    SetView {
        center: Coordinates,
        zoom: f64,
        animate: bool,
    },
}

/// Operations that bring `live` in line with `entries`. Removals come first,
/// then creations and updates in display order. Markers already showing the
/// desired position and style produce nothing.
pub fn reconcile(
    live: &HashMap<String, MarkerState>,
    entries: &[Entry],
    selected_id: Option<&str>,
) -> Vec<MarkerOp> {
    let mut seen = HashSet::new();
    let desired: Vec<(&str, MarkerState)> = entries
        .iter()
        .filter(|entry| seen.insert(entry.id.as_str()))
        .filter_map(|entry| {
            let position = entry.coordinates()?;
            let style = if selected_id == Some(entry.id.as_str()) {
                MarkerStyle::Selected
            } else {
                MarkerStyle::Default
            };
            Some((entry.id.as_str(), MarkerState { position, style }))
        })
        .collect();

    let wanted: HashSet<&str> = desired.iter().map(|(id, _)| *id).collect();
    let mut removals: Vec<&String> = live.keys().filter(|id| !wanted.contains(id.as_str())).collect();
    removals.sort();

    let mut ops: Vec<MarkerOp> = removals
        .into_iter()
        .map(|id| MarkerOp::Remove { id: id.clone() })
        .collect();

    for (id, state) in desired {
        match live.get(id) {
            None => ops.push(MarkerOp::Create {
                id: id.to_string(),
                state,
            }),
            Some(current) if *current != state => ops.push(MarkerOp::Update {
                id: id.to_string(),
                state,
            }),
            Some(_) => {}
        }
    }

    ops
}

/// Where the camera should settle for the current selection, if anywhere.
pub fn focus(entries: &[Entry], selected_id: Option<&str>) -> Option<CameraMove> {
    let selected_id = selected_id?;
    let center = entries.iter().find(|e| e.id == selected_id)?.coordinates()?;
    Some(CameraMove::FlyTo {
        center,
        zoom: FOCUS_ZOOM,
        duration: FOCUS_FLIGHT,
    })
}

pub fn reconcile_candidate(
    live: Option<Coordinates>,
    picked: Option<Coordinates>,
) -> Option<CandidateOp> {
    match (live, picked) {
        (None, Some(point)) => Some(CandidateOp::Create(point)),
        (Some(current), Some(point)) if current != point => Some(CandidateOp::Move(point)),
        (Some(_), None) => Some(CandidateOp::Remove),
        _ => None,
    }
}

/// Applies `ops` to a live marker table, as an adapter would after drawing.
pub fn apply(live: &mut HashMap<String, MarkerState>, ops: &[MarkerOp]) {
    for op in ops {
        match op {
            MarkerOp::Create { id, state } | MarkerOp::Update { id, state } => {
                live.insert(id.clone(), *state);
            }
            MarkerOp::Remove { id } => {
                live.remove(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shared_types::Place;

    use super::*;

    fn entry(id: &str, coords: Option<(f64, f64)>) -> Entry {
        let mut location = Place::custom(format!("{id} street"), "summary");
        location.coordinates = coords.map(|(lat, lng)| Coordinates::new(lat, lng));
        Entry {
            id: id.to_string(),
            name: id.to_uppercase(),
            location,
            joined_at: Utc::now(),
        }
    }

    fn sync(
        live: &mut HashMap<String, MarkerState>,
        entries: &[Entry],
        selected_id: Option<&str>,
    ) -> Vec<MarkerOp> {
        let ops = reconcile(live, entries, selected_id);
        apply(live, &ops);
        ops
    }

    fn selected_count(live: &HashMap<String, MarkerState>) -> usize {
        live.values().filter(|m| m.style == MarkerStyle::Selected).count()
    }

    #[test]
    fn creates_markers_for_located_entries_only() {
        let entries = vec![entry("a", Some((1.0, 1.0))), entry("b", None)];
        let ops = reconcile(&HashMap::new(), &entries, None);

        assert_eq!(
            ops,
            vec![MarkerOp::Create {
                id: "a".to_string(),
                state: MarkerState {
                    position: Coordinates::new(1.0, 1.0),
                    style: MarkerStyle::Default,
                },
            }]
        );
    }

    #[test]
    fn second_pass_is_a_noop() {
        let entries = vec![entry("a", Some((1.0, 1.0))), entry("b", Some((2.0, 2.0)))];
        let mut live = HashMap::new();

        let first = sync(&mut live, &entries, Some("b"));
        assert_eq!(first.len(), 2);

        assert!(reconcile(&live, &entries, Some("b")).is_empty());
    }

    #[test]
    fn selection_change_updates_in_place() {
        let entries = vec![entry("a", Some((1.0, 1.0))), entry("b", Some((2.0, 2.0)))];
        let mut live = HashMap::new();
        sync(&mut live, &entries, Some("a"));

        let ops = reconcile(&live, &entries, Some("b"));
        assert!(ops.iter().all(|op| matches!(op, MarkerOp::Update { .. })));
        assert_eq!(ops.len(), 2);

        apply(&mut live, &ops);
        assert_eq!(selected_count(&live), 1);
        assert_eq!(live["b"].style, MarkerStyle::Selected);
    }

    #[test]
    fn at_most_one_selected_marker() {
        let entries = vec![entry("a", Some((1.0, 1.0))), entry("b", Some((2.0, 2.0)))];
        let mut live = HashMap::new();

        sync(&mut live, &entries, Some("missing"));
        assert_eq!(selected_count(&live), 0);

        sync(&mut live, &entries, Some("a"));
        assert_eq!(selected_count(&live), 1);
    }

    #[test]
    fn vanished_entries_are_removed_first() {
        let mut live = HashMap::new();
        sync(
            &mut live,
            &[entry("a", Some((1.0, 1.0))), entry("b", Some((2.0, 2.0)))],
            None,
        );

        let replacement = vec![entry("c", Some((3.0, 3.0))), entry("b", Some((2.0, 2.0)))];
        let ops = reconcile(&live, &replacement, None);

        assert_eq!(ops[0], MarkerOp::Remove { id: "a".to_string() });
        assert!(matches!(&ops[1], MarkerOp::Create { id, .. } if id == "c"));
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn moved_entry_updates_position() {
        let mut live = HashMap::new();
        sync(&mut live, &[entry("a", Some((1.0, 1.0)))], None);

        let ops = reconcile(&live, &[entry("a", Some((1.5, 1.0)))], None);
        assert!(matches!(&ops[..], [MarkerOp::Update { state, .. }] if state.position.lat == 1.5));
    }

    #[test]
    fn focus_only_for_located_selection() {
        let entries = vec![entry("a", Some((48.8584, 2.2945))), entry("b", None)];

        assert_eq!(
            focus(&entries, Some("a")),
            Some(CameraMove::FlyTo {
                center: Coordinates::new(48.8584, 2.2945),
                zoom: FOCUS_ZOOM,
                duration: FOCUS_FLIGHT,
            })
        );
        assert_eq!(focus(&entries, Some("b")), None);
        assert_eq!(focus(&entries, None), None);
    }

    #[test]
    fn candidate_lifecycle() {
        let p = Coordinates::new(10.0, 20.0);
        let q = Coordinates::new(11.0, 21.0);

        assert_eq!(reconcile_candidate(None, Some(p)), Some(CandidateOp::Create(p)));
        assert_eq!(reconcile_candidate(Some(p), Some(q)), Some(CandidateOp::Move(q)));
        assert_eq!(reconcile_candidate(Some(p), Some(p)), None);
        assert_eq!(reconcile_candidate(Some(p), None), Some(CandidateOp::Remove));
        assert_eq!(reconcile_candidate(None, None), None);
    }
}
