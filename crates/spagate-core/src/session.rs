// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session store.
//!
//! The guard never touches browser storage directly. It is handed a
//! [`SessionStore`], which in turn sits on a [`KeyValueBackend`] that owns the
//! actual persistence (local storage, cookies, a test map).
//!
//! # Design Principles
//!
//! - **Narrow**: read, write and clear only; no listing, no expiry logic
//! - **Context-aware**: an unavailable backend (server rendering) reads
//!   nothing and drops writes
//! - **Self-healing**: a corrupted profile blob is removed on first read

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::profile::UserProfile;

// =============================================================================
// KeyValueBackend
// =============================================================================

/// Raw string persistence behind the session store.
pub trait KeyValueBackend: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`.
    fn remove(&self, key: &str);

    /// Returns `false` outside a browser-like context.
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: KeyValueBackend + ?Sized> KeyValueBackend for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Thread-safe in-memory backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// Backend for contexts without client storage, such as server rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl KeyValueBackend for UnavailableBackend {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) {}

    fn is_available(&self) -> bool {
        false
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Session state injected into the guard.
pub trait SessionStore: Send + Sync {
    /// Returns the stored bearer token.
    fn read_token(&self) -> Option<String>;

    /// Stores the bearer token.
    fn write_token(&self, token: &str) -> StoreResult<()>;

    /// Returns the cached user profile.
    fn read_profile(&self) -> Option<UserProfile>;

    /// Caches the user profile.
    fn write_profile(&self, profile: &UserProfile) -> StoreResult<()>;

    /// Removes the token and the profile.
    fn clear(&self);
}

/// Storage keys used by [`KeyValueSessionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    /// Key holding the bearer token.
    pub token: String,
    /// Key holding the JSON profile.
    pub profile: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            token: "access_token".to_string(),
            profile: "bbh_user_profile".to_string(),
        }
    }
}

/// Session store over a key-value backend.
#[derive(Debug)]
pub struct KeyValueSessionStore<B> {
    backend: B,
    keys: StorageKeys,
}

impl<B: KeyValueBackend> KeyValueSessionStore<B> {
    /// Creates a store with the default keys.
    pub fn new(backend: B) -> Self {
        Self::with_keys(backend, StorageKeys::default())
    }

    /// Creates a store with custom keys.
    pub fn with_keys(backend: B, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the storage keys.
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }
}

impl KeyValueSessionStore<MemoryBackend> {
    /// Creates a store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl<B: KeyValueBackend> SessionStore for KeyValueSessionStore<B> {
    fn read_token(&self) -> Option<String> {
        if !self.backend.is_available() {
            return None;
        }
        self.backend.get(&self.keys.token)
    }

    fn write_token(&self, token: &str) -> StoreResult<()> {
        if !self.backend.is_available() {
            return Ok(());
        }
        self.backend.set(&self.keys.token, token)
    }

    fn read_profile(&self) -> Option<UserProfile> {
        if !self.backend.is_available() {
            return None;
        }
        let raw = self.backend.get(&self.keys.profile)?;

        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(key = %self.keys.profile, error = %e, "Failed to parse stored user profile");
                self.backend.remove(&self.keys.profile);
                None
            }
        }
    }

    fn write_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        if !self.backend.is_available() {
            return Ok(());
        }
        let raw = serde_json::to_string(profile).map_err(|source| StoreError::Serialization {
            key: self.keys.profile.clone(),
            source,
        })?;
        self.backend.set(&self.keys.profile, &raw)
    }

    fn clear(&self) {
        if !self.backend.is_available() {
            return;
        }
        self.backend.remove(&self.keys.token);
        self.backend.remove(&self.keys.profile);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    #[test]
    fn test_token_roundtrip_and_clear() {
        let store = KeyValueSessionStore::in_memory();
        assert!(store.read_token().is_none());

        store.write_token("a.b.c").unwrap();
        store
            .write_profile(&UserProfile::new(1, "a@example.com", Role::Customer))
            .unwrap();
        assert_eq!(store.read_token().as_deref(), Some("a.b.c"));
        assert_eq!(store.backend().len(), 2);

        store.clear();
        assert!(store.read_token().is_none());
        assert!(store.read_profile().is_none());
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_corrupted_profile_is_removed() {
        let store = KeyValueSessionStore::in_memory();
        store.backend().set("bbh_user_profile", "{not json").unwrap();

        assert!(store.read_profile().is_none());
        assert!(store.backend().get("bbh_user_profile").is_none());
    }

    #[test]
    fn test_custom_keys() {
        let keys = StorageKeys {
            token: "token".to_string(),
            profile: "user".to_string(),
        };
        let store = KeyValueSessionStore::with_keys(MemoryBackend::new(), keys);
        store.write_token("t").unwrap();

        assert_eq!(store.backend().get("token").as_deref(), Some("t"));
        assert!(store.backend().get("access_token").is_none());
    }

    #[test]
    fn test_unavailable_backend_is_noop() {
        let store = KeyValueSessionStore::new(UnavailableBackend);
        store.write_token("a.b.c").unwrap();

        assert!(store.read_token().is_none());
        assert!(store.read_profile().is_none());
        store.clear();
    }
}
