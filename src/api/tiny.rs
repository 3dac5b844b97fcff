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
use crate::api::http::Client;
use crate::api::models::{
	BanksHolder, TransactionsHolder, TransactionsParams, UserHolder,
};
use crate::api::{FinanceApi, Page, PageQuery};
use crate::config::config_file::Api;
use crate::error::SyncResult;
use crate::model::{Account, User};
use crate::util::date::API_DATE_FORMAT;
use anyhow::{anyhow, Error};
use async_trait::async_trait;

const TINY_API_URL: &str = "https://tiny.money/v1";

/// Client for the financial aggregation API. Read-only.
pub struct TinyClient {
	http: Client,
}

impl TinyClient {
	pub fn new(config: &Api) -> Result<Self, Error> {
		let key = config
			.key
			.as_ref()
			.ok_or_else(|| anyhow!("no api key in config"))?;

		let api_url = config.url.as_deref().unwrap_or(TINY_API_URL);

		Ok(TinyClient {
			http: Client::new(api_url, format!("Bearer {}", key)),
		})
	}
}

#[async_trait]
impl FinanceApi for TinyClient {
	async fn fetch_user(&self, user_id: &str) -> SyncResult<User> {
		let resp: UserHolder = self
			.http
			.get(&format!("users/{}", user_id), None::<&()>)
			.await?;
		Ok(resp.user)
	}

	async fn fetch_accounts(&self, user_id: &str) -> SyncResult<Vec<Account>> {
		let resp: BanksHolder = self
			.http
			.get(&format!("users/{}/banks", user_id), None::<&()>)
			.await?;
		Ok(resp.banks)
	}

	async fn fetch_transactions(
		&self,
		user_id: &str,
		query: &PageQuery,
	) -> SyncResult<Page> {
		let params = TransactionsParams {
			step: query.step,
			pending: query.pending,
			limit: query.limit,
			lte: query.lte.format(API_DATE_FORMAT).to_string(),
			gte: query.gte.format(API_DATE_FORMAT).to_string(),
		};

		let resp: TransactionsHolder = self
			.http
			.get(&format!("users/{}/transactions", user_id), Some(&params))
			.await?;

		Ok(Page {
			transactions: resp.transactions,
			has_more: resp.meta.pagination.has_more,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_requires_key() {
		let config = Api {
			user: Some("u1".into()),
			..Default::default()
		};
		assert!(TinyClient::new(&config).is_err());
	}

	#[test]
	fn test_builds_with_key() {
		let config = Api {
			key: Some("k".into()),
			..Default::default()
		};
		assert!(TinyClient::new(&config).is_ok());
	}
}
