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
use crate::api::models::{Document, DocumentFile, DocumentPatch};
use crate::api::DocumentStore;
use crate::config::config_file::Documents;
use crate::error::{SyncError, SyncResult};
use anyhow::{anyhow, Error};
use async_trait::async_trait;
use std::collections::BTreeMap;

const GIST_API_URL: &str = "https://api.github.com";

pub const DEFAULT_FILE: &str = "localStorage.json";

/// A GitHub gist used as a tiny key-value document. The hidden list lives
/// as the content of one file inside it.
pub struct GistStore {
	http: Client,
	document: String,
	file: String,
}

impl GistStore {
	pub fn new(config: &Documents) -> Result<Self, Error> {
		let token = config
			.token
			.as_ref()
			.ok_or_else(|| anyhow!("no document token in config"))?;
		let document = config
			.document
			.clone()
			.ok_or_else(|| anyhow!("no document id in config"))?;

		let url = config.url.as_deref().unwrap_or(GIST_API_URL);

		Ok(GistStore {
			http: Client::new(url, format!("token {}", token)),
			document,
			file: config.file.clone().unwrap_or(DEFAULT_FILE.to_owned()),
		})
	}

	fn endpoint(&self) -> String {
		format!("gists/{}", self.document)
	}
}

#[async_trait]
impl DocumentStore for GistStore {
	async fn read(&self) -> SyncResult<String> {
		let doc: Document = self.http.get(&self.endpoint(), None::<&()>).await?;

		doc.files
			.get(&self.file)
			.and_then(|f| f.content.clone())
			.ok_or_else(|| {
				SyncError::Parse(format!(
					"document {} has no content for {}",
					self.document, self.file
				))
			})
	}

	async fn write(&self, content: String) -> SyncResult<()> {
		let mut files = BTreeMap::new();
		files.insert(
			self.file.clone(),
			DocumentFile {
				content: Some(content),
			},
		);

		self.http
			.patch(&self.endpoint(), &DocumentPatch { files })
			.await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_requires_token_and_document() {
		let missing_doc = Documents {
			token: Some("t".into()),
			..Default::default()
		};
		assert!(GistStore::new(&missing_doc).is_err());

		let missing_token = Documents {
			document: Some("d".into()),
			..Default::default()
		};
		assert!(GistStore::new(&missing_token).is_err());
	}

	#[test]
	fn test_defaults() {
		let store = GistStore::new(&Documents {
			token: Some("t".into()),
			document: Some("abc123".into()),
			..Default::default()
		})
		.unwrap();

		assert_eq!(store.file, DEFAULT_FILE);
		assert_eq!(store.endpoint(), "gists/abc123");
	}
}
