use chrono::Utc;
use shared_types::{Coordinates, Entry, Place};
use tracing::debug;

use crate::error::DirectoryError;

/// Ordered, newest-first collection of directory members.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// The demo members every fresh directory starts with.
    pub fn seeded() -> Self {
        Self::with_entries(seed_entries())
    }

    pub fn add(&mut self, entry: Entry) -> Result<(), DirectoryError> {
        if self.get(&entry.id).is_some() {
            return Err(DirectoryError::DuplicateEntry(entry.id));
        }
        debug!(id = %entry.id, name = %entry.name, "adding entry");
        self.entries.insert(0, entry);
        Ok(())
    }

    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive match on name, address or category, display order kept.
    pub fn search(&self, query: &str) -> Vec<&Entry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }

        self.entries
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle)
                    || e.location.formatted_address.to_lowercase().contains(&needle)
                    || e
                        .location
                        .place_type
                        .as_deref()
                        .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

fn seed_entries() -> Vec<Entry> {
    vec![
        Entry {
            id: "1".to_string(),
            name: "Sarah Chen".to_string(),
            location: Place {
                summary: "The Golden Gate Bridge is a suspension bridge spanning the Golden Gate, the one-mile-wide strait connecting San Francisco Bay and the Pacific Ocean.".to_string(),
                formatted_address: "Golden Gate Bridge, San Francisco, CA".to_string(),
                coordinates: Some(Coordinates::new(37.8199, -122.4783)),
                place_type: Some("Landmark".to_string()),
                map_link_uri: Some("https://maps.google.com/?q=Golden+Gate+Bridge".to_string()),
            },
            joined_at: Utc::now(),
        },
        Entry {
            id: "2".to_string(),
            name: "Marcus Johnson".to_string(),
            location: Place {
                summary: "The Eiffel Tower is a wrought-iron lattice tower on the Champ de Mars in Paris, France. It is named after the engineer Gustave Eiffel.".to_string(),
                formatted_address: "Champ de Mars, 5 Av. Anatole France, 75007 Paris, France".to_string(),
                coordinates: Some(Coordinates::new(48.8584, 2.2945)),
                place_type: Some("Monument".to_string()),
                map_link_uri: Some("https://maps.google.com/?q=Eiffel+Tower".to_string()),
            },
            joined_at: Utc::now(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, address: &str) -> Entry {
        Entry {
            id: id.to_string(),
            name: name.to_string(),
            location: Place::custom(address, "summary"),
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn add_prepends() {
        let mut store = EntryStore::new();
        store.add(entry("a", "Alice", "Paris")).unwrap();
        store.add(entry("b", "Bob", "Rome")).unwrap();

        let names: Vec<_> = store.all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Bob", "Alice"]);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut store = EntryStore::new();
        store.add(entry("a", "Alice", "Paris")).unwrap();

        let err = store.add(entry("a", "Impostor", "Nowhere")).unwrap_err();
        assert_eq!(err, DirectoryError::DuplicateEntry("a".to_string()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].name, "Alice");
    }

    #[test]
    fn seeded_store_has_two_located_members() {
        let store = EntryStore::seeded();
        assert_eq!(store.len(), 2);
        assert!(store.all().iter().all(|e| e.coordinates().is_some()));
        assert!(store.get("2").is_some());
    }

    #[test]
    fn search_matches_name_address_and_category() {
        let store = EntryStore::seeded();

        assert_eq!(store.search("sarah").len(), 1);
        assert_eq!(store.search("PARIS")[0].id, "2");
        assert_eq!(store.search("landmark")[0].id, "1");
        assert!(store.search("tokyo").is_empty());
        assert_eq!(store.search("  ").len(), 2);
    }
}
