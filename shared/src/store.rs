//! Preference and location store
//!
//! Client-local state: user preferences plus the selected, recent and
//! favorite locations. Each record is a JSON document under a fixed key in
//! a [`StoragePort`], written whole on every change. Changes are announced
//! to subscribers after they have been persisted.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{LocationInfo, PreferencesUpdate, UserPreferences};

pub const PREFERENCES_KEY: &str = "wa:prefs";
pub const RECENT_LOCATIONS_KEY: &str = "wa:recentLocations";
pub const FAVORITE_LOCATIONS_KEY: &str = "wa:favoriteLocations";
pub const SELECTED_LOCATION_KEY: &str = "wa:selectedLocation";

/// Every key the store writes
pub const STORE_KEYS: [&str; 4] = [
    PREFERENCES_KEY,
    SELECTED_LOCATION_KEY,
    RECENT_LOCATIONS_KEY,
    FAVORITE_LOCATIONS_KEY,
];

/// Recent locations kept, most recent first
pub const MAX_RECENT_LOCATIONS: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Durable string key-value storage
pub trait StoragePort {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-process storage for native use and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// Change notification delivered to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum StoreEvent {
    PreferencesChanged(UserPreferences),
    SelectedChanged(Option<LocationInfo>),
    RecentsChanged(Vec<LocationInfo>),
    FavoritesChanged(Vec<LocationInfo>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

pub struct PreferenceStore<P: StoragePort> {
    storage: P,
    preferences: UserPreferences,
    selected: Option<LocationInfo>,
    recents: Vec<LocationInfo>,
    favorites: Vec<LocationInfo>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl<P: StoragePort> PreferenceStore<P> {
    /// Read every record once. Missing records start empty; unreadable or
    /// corrupt ones are logged and replaced by defaults.
    pub fn load(storage: P) -> Self {
        let preferences = read_record(&storage, PREFERENCES_KEY).unwrap_or_default();
        let selected = read_record(&storage, SELECTED_LOCATION_KEY);
        let recents: Vec<LocationInfo> =
            read_record(&storage, RECENT_LOCATIONS_KEY).unwrap_or_default();
        let favorites = read_record(&storage, FAVORITE_LOCATIONS_KEY).unwrap_or_default();

        let recents = dedupe_by_place(recents);

        Self {
            storage,
            preferences,
            selected,
            recents,
            favorites,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn preferences(&self) -> UserPreferences {
        self.preferences
    }

    pub fn selected(&self) -> Option<&LocationInfo> {
        self.selected.as_ref()
    }

    pub fn recents(&self) -> &[LocationInfo] {
        &self.recents
    }

    pub fn favorites(&self) -> &[LocationInfo] {
        &self.favorites
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    pub fn into_storage(self) -> P {
        self.storage
    }

    /// Merge a partial update over the current preferences and persist
    /// the whole record
    pub fn update_preferences(
        &mut self,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences, StoreError> {
        let preferences = update.apply(self.preferences);
        self.write(PREFERENCES_KEY, &preferences)?;
        self.preferences = preferences;

        tracing::debug!(?preferences, "Preferences updated");
        self.emit(StoreEvent::PreferencesChanged(preferences));
        Ok(preferences)
    }

    /// Make `location` current and move it to the front of the recents,
    /// dropping any entry for the same place
    pub fn select_location(&mut self, location: LocationInfo) -> Result<(), StoreError> {
        let mut recents: Vec<LocationInfo> = self
            .recents
            .iter()
            .filter(|recent| !recent.is_same_place(&location))
            .cloned()
            .collect();
        recents.insert(0, location.clone());
        recents.truncate(MAX_RECENT_LOCATIONS);

        // Both records land or neither does
        self.write(RECENT_LOCATIONS_KEY, &recents)?;
        if let Err(e) = self.write(SELECTED_LOCATION_KEY, &location) {
            let previous = self.recents.clone();
            if let Err(undo) = self.write(RECENT_LOCATIONS_KEY, &previous) {
                tracing::warn!("Failed to restore recent locations: {}", undo);
            }
            return Err(e);
        }

        tracing::debug!(id = %location.id, "Location selected");
        self.selected = Some(location.clone());
        self.recents = recents.clone();

        self.emit(StoreEvent::SelectedChanged(Some(location)));
        self.emit(StoreEvent::RecentsChanged(recents));
        Ok(())
    }

    /// Remove every favorite at the same place, or add `location` when there
    /// is none. Returns whether the place is now a favorite.
    pub fn toggle_favorite(&mut self, location: &LocationInfo) -> Result<bool, StoreError> {
        let was_favorite = self.is_favorite(location);

        let favorites: Vec<LocationInfo> = if was_favorite {
            self.favorites
                .iter()
                .filter(|fav| !fav.is_same_place(location))
                .cloned()
                .collect()
        } else {
            let mut favorites = self.favorites.clone();
            favorites.push(location.clone());
            favorites
        };

        self.write(FAVORITE_LOCATIONS_KEY, &favorites)?;
        self.favorites = favorites.clone();

        self.emit(StoreEvent::FavoritesChanged(favorites));
        Ok(!was_favorite)
    }

    pub fn is_favorite(&self, location: &LocationInfo) -> bool {
        self.favorites.iter().any(|fav| fav.is_same_place(location))
    }

    /// Forget the selected, recent and favorite locations
    pub fn clear_locations(&mut self) -> Result<(), StoreError> {
        self.storage.remove(SELECTED_LOCATION_KEY)?;
        self.storage.remove(RECENT_LOCATIONS_KEY)?;
        self.storage.remove(FAVORITE_LOCATIONS_KEY)?;

        self.selected = None;
        self.recents.clear();
        self.favorites.clear();

        self.emit(StoreEvent::SelectedChanged(None));
        self.emit(StoreEvent::RecentsChanged(Vec::new()));
        self.emit(StoreEvent::FavoritesChanged(Vec::new()));
        Ok(())
    }

    /// Wipe the whole storage and return to defaults
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.storage.clear()?;

        self.preferences = UserPreferences::default();
        self.selected = None;
        self.recents.clear();
        self.favorites.clear();

        self.emit(StoreEvent::PreferencesChanged(self.preferences));
        self.emit(StoreEvent::SelectedChanged(None));
        self.emit(StoreEvent::RecentsChanged(Vec::new()));
        self.emit(StoreEvent::FavoritesChanged(Vec::new()));
        Ok(())
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.storage.set(key, &json)
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

/// Keep the first entry for each place, capped at [`MAX_RECENT_LOCATIONS`]
fn dedupe_by_place(locations: Vec<LocationInfo>) -> Vec<LocationInfo> {
    let mut kept: Vec<LocationInfo> = Vec::with_capacity(MAX_RECENT_LOCATIONS);
    for location in locations {
        if kept.len() == MAX_RECENT_LOCATIONS {
            break;
        }
        if !kept.iter().any(|existing| existing.is_same_place(&location)) {
            kept.push(location);
        }
    }
    kept
}

fn read_record<T: DeserializeOwned>(storage: &impl StoragePort, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, "Failed to read stored record: {}", e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, "Discarding corrupt stored record: {}", e);
            None
        }
    }
}
