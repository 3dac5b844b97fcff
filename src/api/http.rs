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
use crate::error::{SyncError, SyncResult};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize};

const AGENT: &str = concat!("tally/", env!("CARGO_PKG_VERSION"));

/// Thin JSON client shared by the financial API and the document store.
/// Each instance is bound to one base URL and one Authorization value.
pub struct Client {
	client: reqwest::Client,
	base_url: String,
	authorization: String,
}

impl Client {
	/// `authorization` is the full header value, e.g. "Bearer abc" or
	/// "token abc", since the two services disagree on the scheme.
	pub fn new(base_url: &str, authorization: String) -> Self {
		Client {
			client: reqwest::Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
			authorization,
		}
	}

	/// Sends a GET and handles the response. Errors on non-2xx response codes.
	pub async fn get<Q, R>(
		&self,
		endpoint: &str,
		query_params: Option<&Q>,
	) -> SyncResult<R>
	where
		Q: Serialize + ?Sized,
		R: for<'de> Deserialize<'de>,
	{
		let mut request = self.request(Method::GET, endpoint);

		if let Some(query_params) = query_params {
			request = request.query(query_params);
		}

		let response = self.send(Method::GET, endpoint, request).await?;
		Ok(response.json::<R>().await?)
	}

	/// Sends a PATCH with a JSON body. The response body is not inspected.
	pub async fn patch<B>(&self, endpoint: &str, body: &B) -> SyncResult<()>
	where
		B: Serialize + ?Sized,
	{
		let request = self.request(Method::PATCH, endpoint).json(body);
		self.send(Method::PATCH, endpoint, request).await?;
		Ok(())
	}

	fn url(&self, endpoint: &str) -> String {
		format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
	}

	fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
		self.client
			.request(method, self.url(endpoint))
			.header(AUTHORIZATION, &self.authorization)
			.header(ACCEPT, "application/json")
			.header(USER_AGENT, AGENT)
	}

	async fn send(
		&self,
		method: Method,
		endpoint: &str,
		request: RequestBuilder,
	) -> SyncResult<reqwest::Response> {
		let url = self.url(endpoint);
		log::debug!("[HTTP] {} {}", method, url);

		let response = request.send().await?;

		// Handle non-2xx response codes
		if !response.status().is_success() {
			return Err(SyncError::Network(format!(
				"{} {} failed with status: {}",
				method,
				url,
				response.status()
			)));
		}

		Ok(response)
	}
}
