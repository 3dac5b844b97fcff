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
//! The dashboard core: one explicit state object, the refresh sequence, and
//! the hide/unhide mutations a front end drives.

use crate::api::{DocumentStore, FinanceApi};
use crate::cache::{self, CacheKey, LocalCache};
use crate::model::{Account, HiddenSet, Transaction, User};
use crate::store::{fetch_all_transactions, views, Pagination, RefreshCursor, TransactionStore};
use crate::sync::{HiddenListSync, PullOutcome, PushOutcome};
use crate::util::date::window_start;
use crate::util::lock;
use chrono::{DateTime, Duration, Local, NaiveDate};
use std::sync::{Arc, Mutex};

/// A refresh is due once the last one started this long ago
const STALE_AFTER_SECONDS: i64 = 60;

/// Everything the views are computed from, apart from the hidden set, which
/// `HiddenListSync` owns.
pub struct AppState {
	pub user: Option<User>,
	pub accounts: Vec<Account>,
	pub store: TransactionStore,
	/// When the last refresh started
	pub last_refresh: Option<DateTime<Local>>,
}

/// What each step of a refresh managed to do. Failed steps were logged and
/// skipped; the state they would have replaced is untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshReport {
	pub user: bool,
	pub accounts: bool,
	pub hidden: bool,
	pub transactions: Pagination,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
	Completed(RefreshReport),
	/// Another refresh was already running; this call waited for it and
	/// made no requests of its own
	Joined,
}

pub struct Dashboard<A, D> {
	api: A,
	user_id: String,
	cache: Arc<dyn LocalCache>,
	sync: HiddenListSync<D>,
	state: Mutex<AppState>,
	refresh_gate: tokio::sync::Mutex<()>,
}

impl<A, D> Dashboard<A, D>
where
	A: FinanceApi,
	D: DocumentStore + 'static,
{
	/// Builds the dashboard from whatever the cache holds. Cached
	/// transactions get their display fields re-derived against today's
	/// window and the cached hidden set.
	pub fn restore(
		api: A,
		documents: D,
		cache: Arc<dyn LocalCache>,
		user_id: &str,
		today: NaiveDate,
	) -> Self {
		let sync = HiddenListSync::new(documents, cache.clone());

		let user: Option<User> = cache::load(cache.as_ref(), CacheKey::User);
		let accounts: Vec<Account> =
			cache::load(cache.as_ref(), CacheKey::Banks).unwrap_or_default();
		let last_refresh: Option<DateTime<Local>> =
			cache::load(cache.as_ref(), CacheKey::Last);

		let mut store = TransactionStore::restore(cache.clone());
		if !store.is_empty() {
			store.apply_page(vec![], window_start(today), &sync.hidden(), &accounts);
		}

		log::info!(
			"[REFRESH] restored {} accounts, {} transactions",
			accounts.len(),
			store.len()
		);

		Self {
			api,
			user_id: user_id.to_string(),
			cache,
			sync,
			state: Mutex::new(AppState {
				user,
				accounts,
				store,
				last_refresh,
			}),
			refresh_gate: tokio::sync::Mutex::new(()),
		}
	}

	/// True when there is nothing to show or the data is at least a minute
	/// old.
	pub fn needs_refresh(&self, now: DateTime<Local>) -> bool {
		let state = lock(&self.state);
		if state.store.is_empty() {
			return true;
		}

		match state.last_refresh {
			Some(last) => now - last >= Duration::seconds(STALE_AFTER_SECONDS),
			None => true,
		}
	}

	pub fn is_refreshing(&self) -> bool {
		self.refresh_gate.try_lock().is_err()
	}

	pub async fn refresh(&self) -> RefreshOutcome {
		self.refresh_at(Local::now()).await
	}

	/// Fetches user, then accounts, then the remote hidden list, then every
	/// page of transactions, each step after the previous one finished.
	/// A call made while a refresh is running waits for that one instead.
	pub async fn refresh_at(&self, now: DateTime<Local>) -> RefreshOutcome {
		let _gate = match self.refresh_gate.try_lock() {
			Ok(gate) => gate,
			Err(_) => {
				log::info!("[REFRESH] already running, waiting on it");
				let _ = self.refresh_gate.lock().await;
				return RefreshOutcome::Joined;
			},
		};

		log::info!("[REFRESH] starting");
		{
			let mut state = lock(&self.state);
			state.last_refresh = Some(now);
		}
		cache::store_or_log(self.cache.as_ref(), CacheKey::Last, &now);

		let today = now.date_naive();
		let user = self.refresh_user().await;
		let accounts = self.refresh_accounts().await;
		let (hidden, reconciled) = self.refresh_hidden(today).await;
		let transactions = self.refresh_transactions(today).await;

		if reconciled {
			self.sync.push_local().await;
		}

		let report = RefreshReport {
			user,
			accounts,
			hidden,
			transactions,
		};
		log::info!("[REFRESH] done: {:?}", report);
		RefreshOutcome::Completed(report)
	}

	async fn refresh_user(&self) -> bool {
		match self.api.fetch_user(&self.user_id).await {
			Ok(user) => {
				cache::store_or_log(self.cache.as_ref(), CacheKey::User, &user);
				lock(&self.state).user = Some(user);
				true
			},
			Err(e) => {
				log::error!("[REFRESH] could not fetch user: {}", e);
				false
			},
		}
	}

	async fn refresh_accounts(&self) -> bool {
		match self.api.fetch_accounts(&self.user_id).await {
			Ok(accounts) => {
				log::debug!("[REFRESH] {} accounts", accounts.len());
				cache::store_or_log(self.cache.as_ref(), CacheKey::Banks, &accounts);
				lock(&self.state).accounts = accounts;
				true
			},
			Err(e) => {
				log::error!("[REFRESH] could not fetch accounts: {}", e);
				false
			},
		}
	}

	/// Returns whether the pull applied, and whether it had to fold in
	/// unconfirmed local changes.
	async fn refresh_hidden(&self, today: NaiveDate) -> (bool, bool) {
		match self.sync.pull().await {
			PullOutcome::Applied { hidden, reconciled } => {
				self.rederive(&hidden, today);
				(true, reconciled)
			},
			PullOutcome::Failed(_) | PullOutcome::Superseded => (false, false),
		}
	}

	async fn refresh_transactions(&self, today: NaiveDate) -> Pagination {
		let mut cursor = RefreshCursor::new(today);
		let window_start = cursor.window_start;

		fetch_all_transactions(&self.api, &self.user_id, &mut cursor, |page| {
			let hidden = self.sync.hidden();
			let mut guard = lock(&self.state);
			let state = &mut *guard;
			state
				.store
				.apply_page(page, window_start, &hidden, &state.accounts);
		})
		.await
	}

	fn rederive(&self, hidden: &HiddenSet, today: NaiveDate) {
		let mut guard = lock(&self.state);
		let state = &mut *guard;
		state
			.store
			.apply_page(vec![], window_start(today), hidden, &state.accounts);
	}

	/// Flips whether `id` is hidden, then pushes the new list.
	pub async fn toggle_hidden(&self, id: &str) -> PushOutcome {
		let hidden = self.sync.modify(|set| set.toggle(id));
		lock(&self.state).store.set_hidden(id, hidden);
		log::info!("[SYNC] {} {}", if hidden { "hid" } else { "unhid" }, id);
		self.sync.push_local().await
	}

	/// Returns None if `id` was already in the requested state; nothing is
	/// pushed then.
	pub async fn set_hidden(&self, id: &str, hidden: bool) -> Option<PushOutcome> {
		if self.sync.is_hidden(id) == hidden {
			return None;
		}
		Some(self.toggle_hidden(id).await)
	}

	pub async fn hide(&self, id: &str) -> Option<PushOutcome> {
		self.set_hidden(id, true).await
	}

	pub async fn unhide(&self, id: &str) -> Option<PushOutcome> {
		self.set_hidden(id, false).await
	}

	pub fn is_hidden(&self, id: &str) -> bool {
		self.sync.is_hidden(id)
	}

	pub fn hidden_ids(&self) -> HiddenSet {
		self.sync.hidden()
	}

	/// The primary view
	pub fn visible_transactions(&self) -> Vec<Transaction> {
		views::visible(lock(&self.state).store.transactions())
	}

	pub fn hidden_transactions(&self) -> Vec<Transaction> {
		views::hidden(lock(&self.state).store.transactions())
	}

	pub fn sorted_accounts(&self) -> Vec<Account> {
		views::accounts(&lock(&self.state).accounts)
	}

	pub fn user(&self) -> Option<User> {
		lock(&self.state).user.clone()
	}

	pub fn last_refresh(&self) -> Option<DateTime<Local>> {
		lock(&self.state).last_refresh
	}

	pub fn transaction_count(&self) -> usize {
		lock(&self.state).store.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::memory::{MemoryBank, MemoryDocument};
	use crate::cache::MemoryCache;
	use chrono::TimeZone;
	use rust_decimal::Decimal;

	fn noon(y: i32, m: u32, d: u32) -> DateTime<Local> {
		Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
	}

	fn dashboard(
		bank: MemoryBank,
		cache: Arc<MemoryCache>,
	) -> Dashboard<MemoryBank, MemoryDocument> {
		Dashboard::restore(
			bank,
			MemoryDocument::with_content("[]"),
			cache,
			"u1",
			noon(2024, 11, 15).date_naive(),
		)
	}

	#[test]
	fn test_needs_refresh() {
		let cache = Arc::new(MemoryCache::new());
		let now = noon(2024, 11, 15);

		// nothing cached at all
		let dash = dashboard(MemoryBank::new("u1"), cache.clone());
		assert!(dash.needs_refresh(now));

		let mut store = TransactionStore::new(cache.clone());
		store.apply_page(
			vec![Transaction::new("a", now.date_naive(), Decimal::ONE)],
			now.date_naive(),
			&HiddenSet::new(),
			&[],
		);
		cache::store(cache.as_ref(), CacheKey::Last, &now).unwrap();

		let dash = dashboard(MemoryBank::new("u1"), cache);
		assert!(!dash.needs_refresh(now + Duration::seconds(59)));
		assert!(dash.needs_refresh(now + Duration::seconds(60)));
	}

	#[tokio::test]
	async fn test_refresh_records_start() {
		let cache = Arc::new(MemoryCache::new());
		let dash = dashboard(MemoryBank::new("u1"), cache.clone());
		let now = noon(2024, 11, 15);

		dash.refresh_at(now).await;

		assert_eq!(dash.last_refresh(), Some(now));
		let cached: DateTime<Local> = cache::load(cache.as_ref(), CacheKey::Last).unwrap();
		assert_eq!(cached, now);
	}

	#[tokio::test]
	async fn test_toggle() {
		let bank = MemoryBank::new("u1");
		bank.set_transactions(vec![Transaction::new(
			"a",
			noon(2024, 11, 10).date_naive(),
			Decimal::ONE,
		)]);
		let dash = dashboard(bank, Arc::new(MemoryCache::new()));
		dash.refresh_at(noon(2024, 11, 15)).await;

		assert_eq!(dash.visible_transactions().len(), 1);

		let outcome = dash.toggle_hidden("a").await;
		assert!(matches!(outcome, PushOutcome::Confirmed));
		assert!(dash.visible_transactions().is_empty());
		assert_eq!(dash.hidden_transactions()[0].id, "a");

		assert!(dash.hide("a").await.is_none());
		assert!(dash.unhide("a").await.is_some());
		assert_eq!(dash.visible_transactions().len(), 1);
	}
}
