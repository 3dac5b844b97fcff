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
use std::io;
use thiserror::Error;

/// Failures the sync core can run into. None of these escape a refresh or a
/// hide/unhide: they are logged where they happen and the operation carries
/// on with whatever state it already has.
#[derive(Error, Debug)]
pub enum SyncError {
	/// Transport failure or a non-2xx response
	#[error("network failure: {0}")]
	Network(String),

	/// A response or document did not match the expected schema
	#[error("parse failure: {0}")]
	Parse(String),

	#[error("cache failure: {0}")]
	Cache(String),
}

impl SyncError {
	pub fn is_network(&self) -> bool {
		matches!(self, SyncError::Network(_))
	}

	pub fn is_parse(&self) -> bool {
		matches!(self, SyncError::Parse(_))
	}
}

impl From<reqwest::Error> for SyncError {
	fn from(e: reqwest::Error) -> Self {
		// a body that failed to decode is a schema problem, not a transport one
		if e.is_decode() {
			SyncError::Parse(e.to_string())
		} else {
			SyncError::Network(e.to_string())
		}
	}
}

impl From<serde_json::Error> for SyncError {
	fn from(e: serde_json::Error) -> Self {
		SyncError::Parse(e.to_string())
	}
}

impl From<io::Error> for SyncError {
	fn from(e: io::Error) -> Self {
		SyncError::Cache(e.to_string())
	}
}

pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_json_errors_are_parse_failures() {
		let err: SyncError =
			serde_json::from_str::<Vec<String>>("not json").unwrap_err().into();
		assert!(err.is_parse());
		assert!(!err.is_network());
	}

	#[test]
	fn test_io_errors_are_cache_failures() {
		let err: SyncError =
			io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
		assert!(matches!(err, SyncError::Cache(_)));
		assert_eq!(err.to_string(), "cache failure: nope");
	}
}
