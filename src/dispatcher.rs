// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

//! Ties request validation, address resolution, fetching and format
//! selection together.  The object store is injected so each caller decides
//! where bytes come from.

use crate::error::Result;
use crate::obfuscator::Format;
use crate::request::ObfuscationRequest;
use crate::storage::{ObjectStore, resolve};
use serde_json::Value;
use tracing::{debug, info};

pub struct Dispatcher<S> {
    store: S,
}

impl<S: ObjectStore> Dispatcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate a raw JSON payload, then obfuscate the file it names.
    pub fn obfuscate_payload(&self, payload: &Value) -> Result<Vec<u8>> {
        let request = ObfuscationRequest::from_value(payload)?;
        self.obfuscate(&request)
    }

    /// Fetch the requested object and return it with every PII field masked.
    /// The format is chosen before fetching so an unsupported suffix costs
    /// no I/O.
    pub fn obfuscate(&self, request: &ObfuscationRequest) -> Result<Vec<u8>> {
        let address = resolve(&request.file_to_obfuscate)?;
        let format = Format::from_key(&address.key)?;
        debug!(bucket = %address.bucket, key = %address.key, %format, "dispatching");

        let raw = self.store.fetch(&address.bucket, &address.key)?;
        let masked = format.obfuscate(&raw, &request.pii_fields)?;
        info!(
            key = %address.key,
            fields = request.pii_fields.len(),
            bytes_in = raw.len(),
            bytes_out = masked.len(),
            "obfuscated object"
        );
        Ok(masked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObfuscateError;
    use crate::storage::{MemoryStore, StorageError};
    use serde_json::json;
    use std::cell::Cell;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(
            "test_bucket",
            "new_data/file1.csv",
            "age,email,name\n31,fake@email.com,Fake Namington\n",
        );
        store.insert(
            "test_bucket",
            "new_data/file1.jsonl",
            "{\"age\": 31, \"email\": \"fake@email.com\"}\n",
        );
        store.insert(
            "test_bucket",
            "new_data/file1.json",
            r#"{"outer":[{"age":31,"email":"a@b.com","name":"X"}]}"#,
        );
        store.insert("test_bucket", "notes.txt", "hello");
        store
    }

    fn request(uri: &str, fields: &[&str]) -> ObfuscationRequest {
        ObfuscationRequest::new(uri, fields.iter().map(|f| f.to_string()).collect())
    }

    /// Counts fetches so tests can prove no I/O happened.
    struct CountingStore {
        inner: MemoryStore,
        fetches: Cell<usize>,
    }

    impl ObjectStore for CountingStore {
        fn fetch(&self, bucket: &str, key: &str) -> std::result::Result<Vec<u8>, StorageError> {
            self.fetches.set(self.fetches.get() + 1);
            self.inner.fetch(bucket, key)
        }
    }

    #[test]
    fn masks_csv_objects() {
        let dispatcher = Dispatcher::new(store());
        let out = dispatcher
            .obfuscate(&request("s3://test_bucket/new_data/file1.csv", &["email", "name"]))
            .unwrap();
        assert_eq!(out, b"age,email,name\n31,***,***\n");
    }

    #[test]
    fn masks_jsonl_objects() {
        let dispatcher = Dispatcher::new(store());
        let out = dispatcher
            .obfuscate(&request("s3://test_bucket/new_data/file1.jsonl", &["email"]))
            .unwrap();
        assert_eq!(out, b"{\"age\":31,\"email\":\"***\"}\n");
    }

    #[test]
    fn masks_json_objects() {
        let dispatcher = Dispatcher::new(store());
        let out = dispatcher
            .obfuscate(&request("s3://test_bucket/new_data/file1.json", &["email", "name"]))
            .unwrap();
        assert_eq!(out, br#"{"outer":[{"age":31,"email":"***","name":"***"}]}"#);
    }

    #[test]
    fn payload_is_validated_before_anything_else() {
        let counting = CountingStore {
            inner: store(),
            fetches: Cell::new(0),
        };
        let dispatcher = Dispatcher::new(&counting);
        let err = dispatcher
            .obfuscate_payload(&json!({"file_to_obfuscate": "s3://test_bucket/x.csv"}))
            .unwrap_err();
        assert!(matches!(err, ObfuscateError::InvalidRequest(_)));
        assert_eq!(counting.fetches.get(), 0);
    }

    #[test]
    fn payload_round_trip_masks_file() {
        let dispatcher = Dispatcher::new(store());
        let out = dispatcher
            .obfuscate_payload(&json!({
                "file_to_obfuscate": "s3://test_bucket/new_data/file1.csv",
                "pii_fields": []
            }))
            .unwrap();
        assert_eq!(out, b"age,email,name\n31,fake@email.com,Fake Namington\n");
    }

    #[test]
    fn unsupported_suffix_fails_without_fetching() {
        let counting = CountingStore {
            inner: store(),
            fetches: Cell::new(0),
        };
        let dispatcher = Dispatcher::new(&counting);
        for fields in [&[][..], &["email"][..]] {
            let err = dispatcher
                .obfuscate(&request("s3://test_bucket/notes.txt", fields))
                .unwrap_err();
            assert!(matches!(err, ObfuscateError::UnsupportedFormat(_)));
        }
        assert_eq!(counting.fetches.get(), 0);
    }

    #[test]
    fn address_errors_surface_unchanged() {
        let dispatcher = Dispatcher::new(store());
        let err = dispatcher
            .obfuscate(&request("test_bucket/file1.csv", &[]))
            .unwrap_err();
        assert!(matches!(err, ObfuscateError::InvalidAddress(_)));
        let err = dispatcher.obfuscate(&request("s3://test_bucket", &[])).unwrap_err();
        assert!(matches!(err, ObfuscateError::MalformedAddress(_)));
    }

    #[test]
    fn storage_errors_surface_unchanged() {
        let dispatcher = Dispatcher::new(store());
        let err = dispatcher
            .obfuscate(&request("s3://no_bucket/file1.csv", &[]))
            .unwrap_err();
        assert!(matches!(
            err,
            ObfuscateError::Storage(StorageError::BucketNotFound(ref b)) if b == "no_bucket"
        ));
        let err = dispatcher
            .obfuscate(&request("s3://test_bucket/missing.csv", &[]))
            .unwrap_err();
        assert!(matches!(
            err,
            ObfuscateError::Storage(StorageError::ObjectNotFound { .. })
        ));
    }

    #[test]
    fn unknown_fields_fail_the_whole_request() {
        let dispatcher = Dispatcher::new(store());
        let err = dispatcher
            .obfuscate(&request("s3://test_bucket/new_data/file1.csv", &["phone", "email"]))
            .unwrap_err();
        assert!(matches!(err, ObfuscateError::UnknownField(ref f) if f == &["phone"]));
    }
}
