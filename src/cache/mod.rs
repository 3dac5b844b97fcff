/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
//! Local persistent key-value storage. Values are JSON blobs and each write
//! simply overwrites the previous value; there is no expiry.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use crate::error::{SyncError, SyncResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
	Banks,
	Transactions,
	Hidden,
	User,
	/// When the last refresh started
	Last,
	/// Set while the hidden list has local changes the remote has not seen
	Unsynced,
}

impl CacheKey {
	pub fn name(&self) -> &'static str {
		match self {
			CacheKey::Banks => "BANKS",
			CacheKey::Transactions => "TRANSACTIONS",
			CacheKey::Hidden => "HIDDEN",
			CacheKey::User => "USER",
			CacheKey::Last => "LAST",
			CacheKey::Unsynced => "UNSYNCED",
		}
	}
}

impl fmt::Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name())
	}
}

pub trait LocalCache: Send + Sync {
	fn get(&self, key: CacheKey) -> SyncResult<Option<String>>;

	fn set(&self, key: CacheKey, value: &str) -> SyncResult<()>;
}

/// Reads and decodes a cached value. Anything unreadable is logged and
/// treated as absent so a corrupt cache never blocks startup.
pub fn load<T: DeserializeOwned>(cache: &dyn LocalCache, key: CacheKey) -> Option<T> {
	let raw = match cache.get(key) {
		Ok(Some(raw)) => raw,
		Ok(None) => return None,
		Err(e) => {
			log::warn!("[CACHE] could not read {}: {}", key, e);
			return None;
		},
	};

	match serde_json::from_str(&raw) {
		Ok(value) => Some(value),
		Err(e) => {
			log::warn!("[CACHE] discarding unreadable {}: {}", key, e);
			None
		},
	}
}

pub fn store<T: Serialize + ?Sized>(
	cache: &dyn LocalCache,
	key: CacheKey,
	value: &T,
) -> SyncResult<()> {
	let raw = serde_json::to_string(value)
		.map_err(|e| SyncError::Cache(format!("could not encode {}: {}", key, e)))?;
	cache.set(key, &raw)
}

/// Like `store`, for callers that carry on regardless of the outcome.
pub fn store_or_log<T: Serialize + ?Sized>(
	cache: &dyn LocalCache,
	key: CacheKey,
	value: &T,
) {
	if let Err(e) = store(cache, key, value) {
		log::error!("[CACHE] could not write {}: {}", key, e);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::HiddenSet;

	#[test]
	fn test_typed_round_trip() {
		let cache = MemoryCache::new();
		let set: HiddenSet = ["a", "b"].into_iter().collect();

		store(&cache, CacheKey::Hidden, &set).unwrap();
		assert_eq!(cache.get(CacheKey::Hidden).unwrap().unwrap(), r#"["a","b"]"#);

		let back: HiddenSet = load(&cache, CacheKey::Hidden).unwrap();
		assert_eq!(back, set);
	}

	#[test]
	fn test_missing_is_none() {
		let cache = MemoryCache::new();
		assert!(load::<HiddenSet>(&cache, CacheKey::Hidden).is_none());
	}

	#[test]
	fn test_corrupt_is_none() {
		let cache = MemoryCache::new();
		cache.set(CacheKey::Banks, "{not json").unwrap();
		assert!(load::<Vec<String>>(&cache, CacheKey::Banks).is_none());
	}

	#[test]
	fn test_key_names() {
		assert_eq!(CacheKey::Transactions.to_string(), "TRANSACTIONS");
		assert_eq!(CacheKey::Last.name(), "LAST");
		assert_eq!(CacheKey::Unsynced.to_string(), "UNSYNCED");
	}
}
