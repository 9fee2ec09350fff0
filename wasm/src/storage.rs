//! Preference/location store backed by `window.localStorage`

use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use shared::{
    LocationInfo, PreferenceStore, PreferencesUpdate, StoragePort, StoreError, SubscriptionId,
    STORE_KEYS,
};

use crate::{from_json, to_json};

fn storage_error(err: JsValue) -> StoreError {
    StoreError::Storage(
        err.as_string()
            .unwrap_or_else(|| "localStorage is unavailable".to_string()),
    )
}

fn js_error(err: StoreError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// [`StoragePort`] over the page's `localStorage`
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn local() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Storage("No window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| StoreError::Storage("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl StoragePort for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(storage_error)
    }

    /// Removes only the dashboard's own keys; other data on the origin is
    /// left alone.
    fn clear(&mut self) -> Result<(), StoreError> {
        for key in STORE_KEYS {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Browser handle to the preference/location store. Records cross the
/// boundary as JSON strings.
#[wasm_bindgen]
pub struct WeatherStore {
    inner: PreferenceStore<BrowserStorage>,
    subscriptions: HashMap<u32, SubscriptionId>,
    next_handle: u32,
}

#[wasm_bindgen]
impl WeatherStore {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WeatherStore, JsValue> {
        let storage = BrowserStorage::local().map_err(js_error)?;
        Ok(Self {
            inner: PreferenceStore::load(storage),
            subscriptions: HashMap::new(),
            next_handle: 0,
        })
    }

    pub fn preferences(&self) -> Result<String, JsValue> {
        to_json(&self.inner.preferences())
    }

    /// Merge a partial preferences record; returns the full record
    pub fn update_preferences(&mut self, update_json: &str) -> Result<String, JsValue> {
        let update: PreferencesUpdate = from_json(update_json, "preferences")?;
        let updated = self.inner.update_preferences(update).map_err(js_error)?;
        to_json(&updated)
    }

    /// Selected location, or `null`
    pub fn selected(&self) -> Result<String, JsValue> {
        to_json(&self.inner.selected())
    }

    pub fn recents(&self) -> Result<String, JsValue> {
        to_json(&self.inner.recents())
    }

    pub fn favorites(&self) -> Result<String, JsValue> {
        to_json(&self.inner.favorites())
    }

    pub fn select_location(&mut self, location_json: &str) -> Result<(), JsValue> {
        let location: LocationInfo = from_json(location_json, "location")?;
        self.inner.select_location(location).map_err(js_error)
    }

    /// Returns the new favorite state
    pub fn toggle_favorite(&mut self, location_json: &str) -> Result<bool, JsValue> {
        let location: LocationInfo = from_json(location_json, "location")?;
        self.inner.toggle_favorite(&location).map_err(js_error)
    }

    pub fn is_favorite(&self, location_json: &str) -> Result<bool, JsValue> {
        let location: LocationInfo = from_json(location_json, "location")?;
        Ok(self.inner.is_favorite(&location))
    }

    pub fn clear_locations(&mut self) -> Result<(), JsValue> {
        self.inner.clear_locations().map_err(js_error)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.inner.reset().map_err(js_error)
    }

    /// Call `callback` with each change as `{type, value}` JSON. Returns a
    /// handle for [`WeatherStore::unsubscribe`].
    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.inner.subscribe(move |event| {
            let payload = match serde_json::to_string(event) {
                Ok(payload) => payload,
                Err(e) => {
                    web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
                    return;
                }
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&payload)) {
                web_sys::console::error_1(&e);
            }
        });

        let handle = self.next_handle;
        self.next_handle += 1;
        self.subscriptions.insert(handle, id);
        handle
    }

    pub fn unsubscribe(&mut self, handle: u32) -> bool {
        match self.subscriptions.remove(&handle) {
            Some(id) => self.inner.unsubscribe(id),
            None => false,
        }
    }
}
