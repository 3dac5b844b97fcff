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
mod merge;
pub mod pagination;
pub mod views;

pub use merge::merge_page;
pub use pagination::{
	fetch_all_transactions, Pagination, RefreshCursor, MAX_PAGES, PAGE_SIZE,
};

use crate::cache::{self, CacheKey, LocalCache};
use crate::model::{Account, HiddenSet, Transaction};
use chrono::NaiveDate;
use std::sync::Arc;

/// Owns the merged transaction set and mirrors it into the local cache
/// after every change.
pub struct TransactionStore {
	transactions: Vec<Transaction>,
	cache: Arc<dyn LocalCache>,
}

impl TransactionStore {
	pub fn new(cache: Arc<dyn LocalCache>) -> Self {
		Self {
			transactions: vec![],
			cache,
		}
	}

	/// Starts from whatever the cache holds, without touching the cache.
	/// Derived fields are stale until the next `apply_page`.
	pub fn restore(cache: Arc<dyn LocalCache>) -> Self {
		let transactions: Vec<Transaction> =
			cache::load(cache.as_ref(), CacheKey::Transactions).unwrap_or_default();
		log::debug!("[STORE] restored {} cached transactions", transactions.len());

		Self {
			transactions,
			cache,
		}
	}

	pub fn transactions(&self) -> &[Transaction] {
		&self.transactions
	}

	pub fn len(&self) -> usize {
		self.transactions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transactions.is_empty()
	}

	pub fn get(&self, id: &str) -> Option<&Transaction> {
		self.transactions.iter().find(|t| t.id == id)
	}

	/// Merges a page into the set and persists the result. Passing an empty
	/// page re-derives display fields and re-applies the window.
	pub fn apply_page(
		&mut self,
		incoming: Vec<Transaction>,
		window_start: NaiveDate,
		hidden: &HiddenSet,
		accounts: &[Account],
	) {
		let existing = std::mem::take(&mut self.transactions);
		self.transactions =
			merge_page(existing, incoming, window_start, hidden, accounts);

		cache::store_or_log(
			self.cache.as_ref(),
			CacheKey::Transactions,
			&self.transactions,
		);
	}

	/// Updates the hidden flag of one transaction in place. The flag is not
	/// part of the cached copy, so nothing is persisted. Returns false if the
	/// id is unknown.
	pub fn set_hidden(&mut self, id: &str, hidden: bool) -> bool {
		match self.transactions.iter_mut().find(|t| t.id == id) {
			Some(t) => {
				t.hidden = hidden;
				true
			},
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::MemoryCache;
	use rust_decimal::Decimal;

	fn day(d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
	}

	#[test]
	fn test_apply_page_persists_without_hidden() {
		let cache = Arc::new(MemoryCache::new());
		let mut store = TransactionStore::new(cache.clone());
		let hidden: HiddenSet = ["a"].into_iter().collect();

		store.apply_page(
			vec![Transaction::new("a", day(10), Decimal::ONE)],
			day(1),
			&hidden,
			&[],
		);
		assert!(store.get("a").unwrap().hidden);

		let raw = cache.get(CacheKey::Transactions).unwrap().unwrap();
		assert!(raw.contains("\"_id\":\"a\""));
		assert!(!raw.contains("hidden"));
	}

	#[test]
	fn test_restore() {
		let cache = Arc::new(MemoryCache::new());
		let mut store = TransactionStore::new(cache.clone());
		store.apply_page(
			vec![
				Transaction::new("a", day(10), Decimal::ONE),
				Transaction::new("b", day(11), Decimal::NEGATIVE_ONE),
			],
			day(1),
			&HiddenSet::new(),
			&[],
		);

		let restored = TransactionStore::restore(cache);
		assert_eq!(restored.len(), 2);
		assert_eq!(restored.get("b").unwrap().month, "Nov");
	}

	#[test]
	fn test_set_hidden() {
		let mut store = TransactionStore::new(Arc::new(MemoryCache::new()));
		store.apply_page(
			vec![Transaction::new("a", day(10), Decimal::ONE)],
			day(1),
			&HiddenSet::new(),
			&[],
		);

		assert!(store.set_hidden("a", true));
		assert!(store.get("a").unwrap().hidden);
		assert!(!store.set_hidden("missing", true));
	}
}
