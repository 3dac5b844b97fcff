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
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One `<KEY>.json` file per key inside a directory. The directory is created
/// on first write.
pub struct FileCache {
	dir: PathBuf,
}

impl FileCache {
	pub fn new(dir: &Path) -> Self {
		Self {
			dir: dir.to_path_buf(),
		}
	}

	fn path(&self, key: CacheKey) -> PathBuf {
		self.dir.join(format!("{}.json", key.name()))
	}
}

impl LocalCache for FileCache {
	fn get(&self, key: CacheKey) -> SyncResult<Option<String>> {
		match fs::read_to_string(self.path(key)) {
			Ok(content) => Ok(Some(content)),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e.into()),
		}
	}

	fn set(&self, key: CacheKey, value: &str) -> SyncResult<()> {
		fs::create_dir_all(&self.dir)?;

		// readers only ever see a complete blob
		let tmp = self.dir.join(format!(".{}.json.tmp", key.name()));
		fs::write(&tmp, value)?;
		fs::rename(&tmp, self.path(key))?;

		log::trace!("[CACHE] wrote {} ({} bytes)", key, value.len());
		Ok(())
	}
}
