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
//! The two remote collaborators: the financial aggregation API and the
//! document store mirroring the hidden list. Both are traits so the sync
//! core can be driven by the in-memory versions in `memory`.

pub mod gist;
pub mod http;
pub mod memory;
pub mod models;
pub mod tiny;

use crate::error::SyncResult;
use crate::model::{Account, Transaction, User};
use async_trait::async_trait;
use chrono::NaiveDate;

/// One request's worth of the transaction listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageQuery {
	pub step: u32,
	pub limit: u32,
	pub pending: bool,
	/// Inclusive lower bound
	pub gte: NaiveDate,
	/// Inclusive upper bound
	pub lte: NaiveDate,
}

#[derive(Clone, Debug, Default)]
pub struct Page {
	pub transactions: Vec<Transaction>,
	pub has_more: bool,
}

#[async_trait]
pub trait FinanceApi: Send + Sync {
	async fn fetch_user(&self, user_id: &str) -> SyncResult<User>;

	async fn fetch_accounts(&self, user_id: &str) -> SyncResult<Vec<Account>>;

	async fn fetch_transactions(
		&self,
		user_id: &str,
		query: &PageQuery,
	) -> SyncResult<Page>;
}

/// A single remote document with one text field. Which document is fixed
/// when the store is constructed.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	async fn read(&self) -> SyncResult<String>;

	async fn write(&self, content: String) -> SyncResult<()>;
}

#[async_trait]
impl<T: FinanceApi + ?Sized> FinanceApi for std::sync::Arc<T> {
	async fn fetch_user(&self, user_id: &str) -> SyncResult<User> {
		(**self).fetch_user(user_id).await
	}

	async fn fetch_accounts(&self, user_id: &str) -> SyncResult<Vec<Account>> {
		(**self).fetch_accounts(user_id).await
	}

	async fn fetch_transactions(
		&self,
		user_id: &str,
		query: &PageQuery,
	) -> SyncResult<Page> {
		(**self).fetch_transactions(user_id, query).await
	}
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
	async fn read(&self) -> SyncResult<String> {
		(**self).read().await
	}

	async fn write(&self, content: String) -> SyncResult<()> {
		(**self).write(content).await
	}
}
