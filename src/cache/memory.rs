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
use crate::cache::{CacheKey, LocalCache};
use crate::error::SyncResult;
use crate::util::lock;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryCache {
	entries: Mutex<HashMap<CacheKey, String>>,
}

impl MemoryCache {
	pub fn new() -> Self {
		Self::default()
	}
}

impl LocalCache for MemoryCache {
	fn get(&self, key: CacheKey) -> SyncResult<Option<String>> {
		Ok(lock(&self.entries).get(&key).cloned())
	}

	fn set(&self, key: CacheKey, value: &str) -> SyncResult<()> {
		lock(&self.entries).insert(key, value.to_string());
		Ok(())
	}
}
