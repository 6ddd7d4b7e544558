// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

pub mod address;
pub mod store;

pub use address::resolve;
#[cfg(test)]
pub use store::MemoryStore;
pub use store::{LocalStore, ObjectStore, StorageError};
