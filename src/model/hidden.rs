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
use crate::error::SyncResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ids of the transactions the user swiped out of the primary view.
///
/// Serialized as a plain JSON list of ids, which is also the exact content
/// of the remote document. Ordered so the same set always encodes the same
/// way.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HiddenSet(BTreeSet<String>);

impl HiddenSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.0.contains(id)
	}

	/// Returns true if the id was not already hidden
	pub fn insert(&mut self, id: &str) -> bool {
		self.0.insert(id.to_string())
	}

	/// Returns true if the id was hidden
	pub fn remove(&mut self, id: &str) -> bool {
		self.0.remove(id)
	}

	/// Flips membership of the id and returns whether it is now hidden.
	pub fn toggle(&mut self, id: &str) -> bool {
		if self.remove(id) {
			false
		} else {
			self.insert(id)
		}
	}

	pub fn union(&self, other: &HiddenSet) -> HiddenSet {
		HiddenSet(self.0.union(&other.0).cloned().collect())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Encodes the set as the JSON list stored in the remote document.
	pub fn to_document(&self) -> SyncResult<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Decodes a remote document's content. Duplicate ids collapse.
	pub fn from_document(content: &str) -> SyncResult<Self> {
		let ids: Vec<String> = serde_json::from_str(content)?;
		Ok(ids.into_iter().collect())
	}
}

impl FromIterator<String> for HiddenSet {
	fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
		HiddenSet(iter.into_iter().collect())
	}
}

impl<'a> FromIterator<&'a str> for HiddenSet {
	fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
		HiddenSet(iter.into_iter().map(str::to_string).collect())
	}
}
