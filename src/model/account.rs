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
use crate::model::Tag;
use crate::util::amount::deserialize_decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
	Depository,
	Credit,
	Loan,
	Investment,
	#[default]
	#[serde(other)]
	Other,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
	#[serde(deserialize_with = "deserialize_decimal", default)]
	pub current: Decimal,
}

/// A bank account linked to the user. The account list is replaced as a
/// whole on every fetch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
	#[serde(rename = "_id")]
	pub id: String,

	#[serde(default)]
	pub name: String,

	#[serde(rename = "net", deserialize_with = "deserialize_decimal", default)]
	pub net_balance: Decimal,

	#[serde(default)]
	pub balance: Balance,

	#[serde(rename = "type", default)]
	pub kind: AccountKind,
}

impl Account {
	pub fn new(id: &str, name: &str, net_balance: Decimal) -> Self {
		Self {
			id: id.to_string(),
			name: name.to_string(),
			net_balance,
			balance: Balance {
				current: net_balance,
			},
			kind: AccountKind::Other,
		}
	}

	/// Balance from the user's point of view. Depository balances are
	/// reported as assets, everything else as debt, so the former is flipped
	/// to line up with the transaction sign convention.
	pub fn displayed_balance(&self) -> Decimal {
		match self.kind {
			AccountKind::Depository => -self.balance.current,
			_ => self.balance.current,
		}
	}

	pub fn tag(&self) -> Tag {
		Tag::for_amount(self.displayed_balance())
	}
}
