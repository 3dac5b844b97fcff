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
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub api: Option<Api>,
	pub documents: Option<Documents>,
	pub cache: Option<Cache>,
}

/// The financial aggregation API
#[derive(Debug, Default, Deserialize)]
pub struct Api {
	pub url: Option<String>,
	pub key: Option<String>,
	pub key_cmd: Option<String>,

	/// The aggregation API's id for the account holder
	pub user: Option<String>,
}

/// The remote document mirroring the hidden list
#[derive(Debug, Default, Deserialize)]
pub struct Documents {
	pub url: Option<String>,
	pub document: Option<String>,
	pub token: Option<String>,
	pub token_cmd: Option<String>,

	/// Name of the file inside the document holding the list.
	/// Default: localStorage.json
	pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Cache {
	/// Default: ~/.cache/tally
	pub dir: Option<String>,
}
