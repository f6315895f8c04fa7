//! JSON object bindings.

use std::marker::PhantomData;
use std::sync::Arc;

use lyra_core::Value;
use lyra_store::{StoreError, StoreHandle, StoreResult};

use crate::bound::BoundValue;

/// An object binding layered strictly on the string channel.
///
/// Writes encode `T` as JSON and store it as a string; reads decode the
/// cached string. The engine never sees structured data — the string
/// channel stays the single source of truth.
///
/// A stored string that fails to parse is a hard
/// [`StoreError::Decode`], never silently absent. A cell holding a
/// non-string shape (written by someone else through the scalar
/// surface) reads as absent, matching the typed accessors' mismatch
/// rule.
pub struct JsonBound<T> {
    inner: BoundValue,
    _marker: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for JsonBound<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonBound")
            .field("key", &self.inner.key())
            .finish_non_exhaustive()
    }
}

impl<T> JsonBound<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    /// Bind the object channel of `key` on `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] if the initial read fails.
    pub fn new(handle: &Arc<StoreHandle>, key: impl Into<String>) -> StoreResult<Self> {
        Ok(Self {
            inner: BoundValue::new(handle, key)?,
            _marker: PhantomData,
        })
    }

    /// The bound key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.inner.key()
    }

    /// Decode the cached value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if the stored string is not valid
    /// JSON for `T`.
    pub fn get(&self) -> StoreResult<Option<T>> {
        match self.inner.get() {
            None => Ok(None),
            Some(Value::String(encoded)) => serde_json::from_str(&encoded)
                .map(Some)
                .map_err(|source| StoreError::Decode {
                    key: self.inner.key().to_string(),
                    source,
                }),
            Some(_) => Ok(None),
        }
    }

    /// Encode and write through, or delete when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if serialization fails, or
    /// [`StoreError::Engine`] on engine failure.
    pub fn set(&self, value: Option<&T>) -> StoreResult<()> {
        match value {
            Some(value) => {
                let encoded =
                    serde_json::to_string(value).map_err(|source| StoreError::Encode {
                        key: self.inner.key().to_string(),
                        source,
                    })?;
                self.inner.set(Value::String(encoded))
            }
            None => self.inner.remove(),
        }
    }

    /// Rebind to a different key on the same handle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] if the initial read of the new key
    /// fails.
    pub fn rebind(&mut self, key: impl Into<String>) -> StoreResult<()> {
        self.inner.rebind(key)
    }
}

#[cfg(test)]
mod tests {
    use lyra_core::StoreConfig;
    use lyra_engine::MemoryEngine;

    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Profile {
        a: u32,
        name: String,
    }

    fn test_handle(id: &str) -> Arc<StoreHandle> {
        let config = StoreConfig::new(id);
        let engine = Box::new(MemoryEngine::open(&config));
        StoreHandle::with_engine(config, engine).unwrap()
    }

    #[test]
    fn test_object_round_trip() {
        let handle = test_handle("json.rt");
        let bound: JsonBound<Profile> = JsonBound::new(&handle, "profile").unwrap();

        let profile = Profile {
            a: 1,
            name: "ada".into(),
        };
        bound.set(Some(&profile)).unwrap();
        assert_eq!(bound.get().unwrap(), Some(profile));
    }

    #[test]
    fn test_none_deletes_the_key() {
        let handle = test_handle("json.none");
        let bound: JsonBound<Profile> = JsonBound::new(&handle, "profile").unwrap();

        bound
            .set(Some(&Profile {
                a: 1,
                name: "x".into(),
            }))
            .unwrap();
        bound.set(None).unwrap();

        assert_eq!(bound.get().unwrap(), None);
        assert!(!handle.contains("profile").unwrap());
    }

    #[test]
    fn test_external_write_is_decoded() {
        let handle = test_handle("json.external");
        let bound: JsonBound<Profile> = JsonBound::new(&handle, "profile").unwrap();

        // Another writer stores JSON on the string channel directly.
        handle
            .set_json("profile", &Profile { a: 2, name: "b".into() })
            .unwrap();
        assert_eq!(
            bound.get().unwrap(),
            Some(Profile { a: 2, name: "b".into() })
        );
    }

    #[test]
    fn test_malformed_external_string_is_hard_error() {
        let handle = test_handle("json.bad");
        let bound: JsonBound<Profile> = JsonBound::new(&handle, "profile").unwrap();

        handle.set("profile", "{definitely not json").unwrap();
        let err = bound.get().unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[test]
    fn test_non_string_shape_reads_absent() {
        let handle = test_handle("json.shape");
        let bound: JsonBound<Profile> = JsonBound::new(&handle, "profile").unwrap();

        handle.set("profile", 42.0).unwrap();
        assert_eq!(bound.get().unwrap(), None);
    }
}
