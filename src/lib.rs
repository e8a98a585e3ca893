#![cfg_attr(not(test), no_std)]

//! settings_store - Typed, persisted settings registry for embedded devices
//!
//! This library provides a fixed set of named, typed settings with default
//! values, backed by a pluggable durable store (flash key-value store,
//! filesystem) behind the [`Storage`] trait. Reads go through an in-memory
//! cache; writes are validated, persisted, cached, and notified in that order.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │           Application                  │
//! │  configure() / begin() / get() / set() │
//! └──────────────┬─────────────────────────┘
//!                │
//!                ▼
//! ┌────────────────────────────────────────┐
//! │           Settings engine              │
//! │  - Key registry (sorted, binary search)│
//! │  - In-memory cache                     │
//! │  - Validators + change callbacks       │
//! └──────────────┬─────────────────────────┘
//!                │
//!                ▼
//! ┌────────────────────────────────────────┐
//! │           Storage backend              │
//! │  (flash NVS, filesystem, memory)       │
//! └────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`value`]: Tagged-union [`Value`] and the two-mode [`Str`] string
//! - [`key`]: [`Key`] definitions and the sorted [`KeyRegistry`]
//! - [`result`]: [`Status`] result enumeration for set/unset/migrate
//! - [`storage`]: [`Storage`] backend trait and [`MemoryStorage`]
//! - [`engine`]: The [`Settings`] engine (cache, validation, backup/restore)
//! - [`migration`]: Schema [`Migration`] run against storage before `begin`
//!
//! # Concurrency
//!
//! Single-threaded and synchronous. One engine instance owns its registry,
//! cache, and storage; callers embedding it in a multi-threaded host must
//! serialize access themselves. Callbacks run synchronously inside the call
//! that triggered them and must not re-enter the engine.

pub mod engine;
pub mod key;
pub mod logging;
pub mod migration;
pub mod result;
pub mod storage;
pub mod value;

pub use engine::{ChangeFn, RestoredFn, Settings, ValidatorFn};
pub use key::{Key, KeyRegistry};
pub use migration::Migration;
pub use result::Status;
pub use storage::{MemoryStorage, Storage, StoredType};
pub use value::{Str, Value, ValueKind};

/// Maximum key name length (NVS key-name limit)
pub const MAX_KEY_LEN: usize = 15;

/// Maximum number of registered keys (power of two for the cache map)
pub const MAX_KEYS: usize = 64;

/// Owned string value capacity
pub const STR_CAPACITY: usize = 64;

/// Canonical text for a true boolean value
pub const TRUE_LITERAL: &str = "true";

/// Canonical text for a false boolean value
pub const FALSE_LITERAL: &str = "false";

/// Suffix marking a key that enables a feature (written last in batches)
pub const ENABLE_SUFFIX: &str = "_enable";

/// Suffix marking a secret key (masked on external projection)
pub const PASSWORD_SUFFIX: &str = "_pwd";

/// Mask rendered in place of secret values
pub const PASSWORD_MASK: &str = "********";
