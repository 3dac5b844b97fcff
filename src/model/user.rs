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
use serde::{Deserialize, Serialize};

/// The aggregation API's user record. Only the id is used for routing; the
/// rest is carried along so the cached copy matches what the API sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
	#[serde(rename = "_id")]
	pub id: String,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,

	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}
