// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

//! Object stores the dispatcher can fetch from.  The dispatcher only sees the
//! `ObjectStore` trait, so tests can hand it an in-memory store and the CLI a
//! directory-backed one.

#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("The specified bucket does not exist: {0}")]
    BucketNotFound(String),

    #[error("The specified key does not exist: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("failed to read {bucket}/{key}")]
    Io {
        bucket: String,
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Fetch the full contents of one object.
pub trait ObjectStore {
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        (**self).fetch(bucket, key)
    }
}

/// Store backed by a local directory: bucket `b` and key `k` live at
/// `<root>/b/k`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> Option<PathBuf> {
        let dir = self.root.join(bucket);
        is_contained(Path::new(bucket)).then_some(dir)
    }
}

/// Reject keys that would climb out of the bucket directory.
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl ObjectStore for LocalStore {
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let not_found = || StorageError::ObjectNotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };

        let dir = self
            .bucket_dir(bucket)
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
        if !is_contained(Path::new(key)) {
            return Err(not_found());
        }

        let path = dir.join(key);
        debug!(path = %path.display(), "reading object from local store");
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(_) if path.is_dir() => Err(not_found()),
            Err(source) => Err(StorageError::Io {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-memory store keyed by bucket then object key.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    buckets: HashMap<String, HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, creating its bucket on first use.
    pub fn insert(&mut self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body.into());
    }

    /// Create an empty bucket.
    pub fn create_bucket(&mut self, bucket: &str) {
        self.buckets.entry(bucket.to_string()).or_default();
    }
}

#[cfg(test)]
impl ObjectStore for MemoryStore {
    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let objects = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}
