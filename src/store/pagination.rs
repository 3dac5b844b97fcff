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
use crate::api::{FinanceApi, PageQuery};
use crate::model::Transaction;
use crate::util::date::{end_of_month, window_start};
use chrono::NaiveDate;

pub const PAGE_SIZE: u32 = 100;

/// Upper bound on pages in one pass. The window spans at most two months,
/// so an API still reporting more pages past this is misbehaving.
pub const MAX_PAGES: u32 = 500;

/// Position within one full pass over the transaction listing. Reset at
/// the start of every refresh and never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshCursor {
	pub step: u32,
	pub window_start: NaiveDate,
	pub window_end: NaiveDate,
}

impl RefreshCursor {
	pub fn new(today: NaiveDate) -> Self {
		Self {
			step: 0,
			window_start: window_start(today),
			window_end: end_of_month(today).unwrap_or(today),
		}
	}

	pub fn query(&self) -> PageQuery {
		PageQuery {
			step: self.step,
			limit: PAGE_SIZE,
			pending: false,
			gte: self.window_start,
			lte: self.window_end,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
	/// Pages received and handed to the caller
	pub pages: u32,
	/// False if a page failed and the pass stopped early
	pub complete: bool,
}

/// Walks the listing one page at a time until the API reports no more
/// pages. Each page is handed to `on_page` as soon as it arrives, so
/// progress is visible before the pass finishes. A failed page ends the
/// pass; whatever was already handed over stays.
pub async fn fetch_all_transactions<A, F>(
	api: &A,
	user_id: &str,
	cursor: &mut RefreshCursor,
	mut on_page: F,
) -> Pagination
where
	A: FinanceApi + ?Sized,
	F: FnMut(Vec<Transaction>),
{
	let mut pages = 0;

	loop {
		if cursor.step >= MAX_PAGES {
			log::error!(
				"[STORE] giving up after {} pages, the API keeps reporting more",
				MAX_PAGES
			);
			cursor.step = 0;
			return Pagination {
				pages,
				complete: false,
			};
		}

		let query = cursor.query();
		log::debug!(
			"[STORE] fetching page {} ({} to {})",
			query.step,
			query.gte,
			query.lte
		);

		match api.fetch_transactions(user_id, &query).await {
			Ok(page) => {
				pages += 1;
				log::trace!(
					"[STORE] page {} has {} transactions",
					query.step,
					page.transactions.len()
				);
				on_page(page.transactions);

				if page.has_more {
					cursor.step += 1;
				} else {
					cursor.step = 0;
					return Pagination {
						pages,
						complete: true,
					};
				}
			},
			Err(e) => {
				log::error!("[STORE] page {} failed: {}", query.step, e);
				cursor.step = 0;
				return Pagination {
					pages,
					complete: false,
				};
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::memory::MemoryBank;
	use crate::api::Page;
	use crate::error::SyncResult;
	use crate::model::{Account, User};
	use async_trait::async_trait;
	use rust_decimal::Decimal;

	/// An API whose listing never ends
	struct Endless;

	#[async_trait]
	impl FinanceApi for Endless {
		async fn fetch_user(&self, _user_id: &str) -> SyncResult<User> {
			Ok(User::default())
		}

		async fn fetch_accounts(&self, _user_id: &str) -> SyncResult<Vec<Account>> {
			Ok(vec![])
		}

		async fn fetch_transactions(
			&self,
			_user_id: &str,
			_query: &PageQuery,
		) -> SyncResult<Page> {
			Ok(Page {
				transactions: vec![],
				has_more: true,
			})
		}
	}

	fn date(s: &str) -> NaiveDate {
		NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
	}

	fn bank_with(count: usize, today: NaiveDate) -> MemoryBank {
		let bank = MemoryBank::new("u1");
		bank.set_transactions(
			(0..count)
				.map(|i| Transaction::new(&format!("t{}", i), today, Decimal::ONE))
				.collect(),
		);
		bank
	}

	#[test]
	fn test_cursor_window() {
		let cursor = RefreshCursor::new(date("2024-11-15"));
		assert_eq!(cursor.step, 0);
		assert_eq!(cursor.window_start, date("2024-10-15"));
		assert_eq!(cursor.window_end, date("2024-11-30"));

		let query = cursor.query();
		assert_eq!(query.limit, 100);
		assert!(!query.pending);
	}

	#[tokio::test]
	async fn test_walks_every_page() {
		let today = date("2024-11-15");
		let bank = bank_with(250, today);
		let mut cursor = RefreshCursor::new(today);
		let mut sizes = vec![];

		let result =
			fetch_all_transactions(&bank, "u1", &mut cursor, |page| sizes.push(page.len()))
				.await;

		assert_eq!(sizes, vec![100, 100, 50]);
		assert_eq!(
			result,
			Pagination {
				pages: 3,
				complete: true
			}
		);
		assert_eq!(cursor.step, 0);
	}

	#[tokio::test]
	async fn test_stops_on_failure() {
		let today = date("2024-11-15");
		let bank = bank_with(250, today);
		bank.fail_at_step(Some(1));
		let mut cursor = RefreshCursor::new(today);
		let mut received = 0;

		let result =
			fetch_all_transactions(&bank, "u1", &mut cursor, |page| received += page.len())
				.await;

		assert_eq!(received, 100);
		assert!(!result.complete);
		assert_eq!(result.pages, 1);
		assert_eq!(bank.requests(), vec!["transactions:0", "transactions:1"]);
	}

	#[tokio::test]
	async fn test_empty_listing() {
		let today = date("2024-11-15");
		let bank = MemoryBank::new("u1");
		let mut cursor = RefreshCursor::new(today);
		let mut calls = 0;

		let result =
			fetch_all_transactions(&bank, "u1", &mut cursor, |_| calls += 1).await;

		assert_eq!(calls, 1);
		assert!(result.complete);
	}

	#[tokio::test]
	async fn test_endless_listing_is_cut_off() {
		let mut cursor = RefreshCursor::new(date("2024-11-15"));
		let mut calls = 0;

		let result =
			fetch_all_transactions(&Endless, "u1", &mut cursor, |_| calls += 1).await;

		assert_eq!(calls, MAX_PAGES);
		assert_eq!(
			result,
			Pagination {
				pages: MAX_PAGES,
				complete: false
			}
		);
		assert_eq!(cursor.step, 0);
	}
}
