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
//! In-memory stand-ins for the remote services, for tests and for running
//! the dashboard offline. Latency and failures can be injected so the
//! cancellation and degradation paths can be exercised deterministically.

use crate::api::{DocumentStore, FinanceApi, Page, PageQuery};
use crate::error::{SyncError, SyncResult};
use crate::model::{Account, Transaction, User};
use crate::util::lock;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct BankState {
	user: User,
	accounts: Vec<Account>,
	transactions: Vec<Transaction>,

	/// Page step that fails, if any
	failing_step: Option<u32>,
	fail_user: bool,
	fail_accounts: bool,
	latency: Duration,

	/// Every request received, in order
	log: Vec<String>,
}

pub struct MemoryBank {
	state: Mutex<BankState>,
}

impl MemoryBank {
	pub fn new(user_id: &str) -> Self {
		Self {
			state: Mutex::new(BankState {
				user: User {
					id: user_id.to_string(),
					..Default::default()
				},
				..Default::default()
			}),
		}
	}

	pub fn set_accounts(&self, accounts: Vec<Account>) {
		self.with_state(|s| s.accounts = accounts);
	}

	pub fn set_transactions(&self, transactions: Vec<Transaction>) {
		self.with_state(|s| s.transactions = transactions);
	}

	pub fn fail_at_step(&self, step: Option<u32>) {
		self.with_state(|s| s.failing_step = step);
	}

	pub fn fail_user(&self, fail: bool) {
		self.with_state(|s| s.fail_user = fail);
	}

	pub fn fail_accounts(&self, fail: bool) {
		self.with_state(|s| s.fail_accounts = fail);
	}

	/// Delay applied before every response
	pub fn set_latency(&self, latency: Duration) {
		self.with_state(|s| s.latency = latency);
	}

	/// Requests received so far, e.g. "user", "accounts", "transactions:2"
	pub fn requests(&self) -> Vec<String> {
		self.with_state(|s| s.log.clone())
	}

	fn with_state<T>(&self, f: impl FnOnce(&mut BankState) -> T) -> T {
		f(&mut lock(&self.state))
	}

	async fn respond<T>(
		&self,
		request: String,
		f: impl FnOnce(&BankState) -> SyncResult<T>,
	) -> SyncResult<T> {
		let latency = self.with_state(|s| {
			s.log.push(request);
			s.latency
		});

		if !latency.is_zero() {
			tokio::time::sleep(latency).await;
		}

		self.with_state(|s| f(s))
	}
}

#[async_trait]
impl FinanceApi for MemoryBank {
	async fn fetch_user(&self, user_id: &str) -> SyncResult<User> {
		let user_id = user_id.to_string();
		self.respond("user".to_string(), move |s| {
			if s.fail_user {
				return Err(SyncError::Network("user unavailable".into()));
			}
			if s.user.id != user_id {
				return Err(SyncError::Network(format!(
					"404 for user {}",
					user_id
				)));
			}
			Ok(s.user.clone())
		})
		.await
	}

	async fn fetch_accounts(&self, _user_id: &str) -> SyncResult<Vec<Account>> {
		self.respond("accounts".to_string(), |s| {
			if s.fail_accounts {
				return Err(SyncError::Network("accounts unavailable".into()));
			}
			Ok(s.accounts.clone())
		})
		.await
	}

	async fn fetch_transactions(
		&self,
		_user_id: &str,
		query: &PageQuery,
	) -> SyncResult<Page> {
		let query = query.clone();
		self.respond(format!("transactions:{}", query.step), move |s| {
			if s.failing_step == Some(query.step) {
				return Err(SyncError::Network(format!(
					"page {} unavailable",
					query.step
				)));
			}

			let in_range: Vec<&Transaction> = s
				.transactions
				.iter()
				.filter(|t| t.date >= query.gte && t.date <= query.lte)
				.collect();

			let start = (query.step * query.limit) as usize;
			let end = (start + query.limit as usize).min(in_range.len());

			let transactions = if start < in_range.len() {
				in_range[start..end].iter().map(|t| (*t).clone()).collect()
			} else {
				vec![]
			};

			Ok(Page {
				transactions,
				has_more: end < in_range.len(),
			})
		})
		.await
	}
}

/// A document with a single text field.
#[derive(Default)]
pub struct MemoryDocument {
	content: Mutex<Option<String>>,

	/// Per-request delays, consumed front to back; empty means no delay
	latencies: Mutex<VecDeque<Duration>>,

	fail_reads: AtomicBool,
	fail_writes: AtomicBool,

	reads: AtomicUsize,
	writes: AtomicUsize,
}

impl MemoryDocument {
	/// A document whose file has no content yet; reads fail to parse.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_content(content: &str) -> Self {
		let doc = Self::default();
		doc.set_content(content);
		doc
	}

	pub fn content(&self) -> Option<String> {
		lock(&self.content).clone()
	}

	pub fn set_content(&self, content: &str) {
		*lock(&self.content) = Some(content.to_string());
	}

	/// Delay the next not-yet-delayed request by `latency`
	pub fn queue_latency(&self, latency: Duration) {
		lock(&self.latencies).push_back(latency);
	}

	pub fn fail_reads(&self, fail: bool) {
		self.fail_reads.store(fail, Ordering::SeqCst);
	}

	pub fn fail_writes(&self, fail: bool) {
		self.fail_writes.store(fail, Ordering::SeqCst);
	}

	/// Reads that ran to completion
	pub fn reads(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	/// Writes that ran to completion
	pub fn writes(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}

	async fn delay(&self) {
		let latency = lock(&self.latencies).pop_front();
		if let Some(latency) = latency {
			tokio::time::sleep(latency).await;
		}
	}
}

#[async_trait]
impl DocumentStore for MemoryDocument {
	async fn read(&self) -> SyncResult<String> {
		self.delay().await;

		if self.fail_reads.load(Ordering::SeqCst) {
			return Err(SyncError::Network("document unavailable".into()));
		}

		self.reads.fetch_add(1, Ordering::SeqCst);
		self.content()
			.ok_or_else(|| SyncError::Parse("document has no content".into()))
	}

	async fn write(&self, content: String) -> SyncResult<()> {
		self.delay().await;

		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(SyncError::Network("document unavailable".into()));
		}

		*lock(&self.content) = Some(content);
		self.writes.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use rust_decimal::Decimal;

	fn day(d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
	}

	fn query(step: u32, limit: u32) -> PageQuery {
		PageQuery {
			step,
			limit,
			pending: false,
			gte: day(1),
			lte: day(30),
		}
	}

	#[tokio::test]
	async fn test_paging() {
		let bank = MemoryBank::new("u1");
		bank.set_transactions(
			(1..=5)
				.map(|i| Transaction::new(&format!("t{}", i), day(i), Decimal::ONE))
				.collect(),
		);

		let first = bank.fetch_transactions("u1", &query(0, 2)).await.unwrap();
		assert_eq!(first.transactions.len(), 2);
		assert!(first.has_more);

		let last = bank.fetch_transactions("u1", &query(2, 2)).await.unwrap();
		assert_eq!(last.transactions.len(), 1);
		assert!(!last.has_more);

		let past = bank.fetch_transactions("u1", &query(3, 2)).await.unwrap();
		assert!(past.transactions.is_empty());
		assert!(!past.has_more);

		assert_eq!(
			bank.requests(),
			vec!["transactions:0", "transactions:2", "transactions:3"]
		);
	}

	#[tokio::test]
	async fn test_unknown_user() {
		let bank = MemoryBank::new("u1");
		assert!(bank.fetch_user("someone-else").await.is_err());
		assert_eq!(bank.fetch_user("u1").await.unwrap().id, "u1");
	}

	#[tokio::test]
	async fn test_document_read_write() {
		let doc = MemoryDocument::new();
		assert!(doc.read().await.unwrap_err().is_parse());

		doc.write("[\"a\"]".to_string()).await.unwrap();
		assert_eq!(doc.read().await.unwrap(), "[\"a\"]");
		assert_eq!(doc.writes(), 1);
		assert_eq!(doc.reads(), 1);

		doc.fail_writes(true);
		assert!(doc.write("[]".to_string()).await.unwrap_err().is_network());
		assert_eq!(doc.content().as_deref(), Some("[\"a\"]"));
	}
}
