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
use crate::model::{Account, Transaction, User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
pub struct TransactionsParams {
	pub step: u32,
	pub pending: bool,
	pub limit: u32,
	pub lte: String,
	pub gte: String,
}

/// Body of a document PATCH. Only the named file is touched; other files in
/// the document are left alone by the store.
#[derive(Debug, Serialize)]
pub struct DocumentPatch {
	pub files: BTreeMap<String, DocumentFile>,
}

// ---------------
// -- RECEIVING --
// ---------------

#[derive(Deserialize)]
pub struct UserHolder {
	pub user: User,
}

#[derive(Deserialize)]
pub struct BanksHolder {
	pub banks: Vec<Account>,
}

#[derive(Deserialize, Debug)]
pub struct TransactionsHolder {
	pub transactions: Vec<Transaction>,
	pub meta: Meta,
}

#[derive(Deserialize, Debug)]
pub struct Meta {
	pub pagination: Pagination,
}

#[derive(Deserialize, Debug)]
pub struct Pagination {
	pub has_more: bool,
}

#[derive(Deserialize, Debug)]
pub struct Document {
	pub files: BTreeMap<String, DocumentFile>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DocumentFile {
	/// Large files come back truncated with no content inline
	pub content: Option<String>,
}
