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
use crate::util::amount::deserialize_decimal;
use crate::util::date::deserialize_api_date;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display classification attached to transactions and accounts.
///
/// Note that `Negative` is attached to amounts >= 0. The API reports money
/// leaving an account as a positive number, so the tag describes the effect
/// on the user's balance rather than the sign of the number.
#[derive(
	Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
	Pending,
	Negative,
	Positive,
}

impl Tag {
	pub fn for_amount(amount: Decimal) -> Tag {
		if amount >= Decimal::ZERO {
			Tag::Negative
		} else {
			Tag::Positive
		}
	}
}

/// A single bank transaction as reported by the financial API, plus the
/// display fields derived for it on every merge.
///
/// The derived fields are kept in the local cache so a restored dashboard
/// can render before its first refresh; `hidden` is not, since it is always
/// recomputed from the hidden set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	#[serde(rename = "_id")]
	pub id: String,

	#[serde(deserialize_with = "deserialize_api_date")]
	pub date: NaiveDate,

	/// Positive is money out, negative is money in
	#[serde(deserialize_with = "deserialize_decimal")]
	pub amount: Decimal,

	#[serde(default)]
	pub pending: bool,

	/// Id of the account this transaction belongs to. Only resolved against
	/// the current account list at merge time; never owned.
	#[serde(rename = "_bank", default)]
	pub account_ref: Option<String>,

	#[serde(default)]
	pub name: String,

	/// Trailing digits of the account number, as shown next to the account
	#[serde(default)]
	pub number: Option<String>,

	// ---------------
	// -- DERIVED --
	// ---------------
	#[serde(default)]
	pub tags: Vec<Tag>,

	/// Day of the month, 1-31
	#[serde(default)]
	pub day: u32,

	#[serde(default)]
	pub month: String,

	/// "<account name> <number>" when the account is known
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub info: Option<String>,

	#[serde(skip)]
	pub hidden: bool,
}

impl Transaction {
	pub fn new(id: &str, date: NaiveDate, amount: Decimal) -> Self {
		Self {
			id: id.to_string(),
			date,
			amount,
			pending: false,
			account_ref: None,
			name: String::new(),
			number: None,
			tags: vec![],
			day: 0,
			month: String::new(),
			info: None,
			hidden: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	#[test]
	fn test_tag_sign_mapping() {
		assert_eq!(Tag::for_amount(Decimal::from(5)), Tag::Negative);
		assert_eq!(Tag::for_amount(Decimal::ZERO), Tag::Negative);
		assert_eq!(Tag::for_amount(Decimal::from(-5)), Tag::Positive);
	}

	#[test]
	fn test_deserialize_api_shape() {
		let raw = r#"{
			"_id": "t1",
			"_bank": "b1",
			"date": "2024-11-15T00:00:00.000Z",
			"amount": 12.34,
			"pending": true,
			"name": "Coffee",
			"number": "4321",
			"category": ["Food and Drink"]
		}"#;

		let t: Transaction = serde_json::from_str(raw).unwrap();
		assert_eq!(t.id, "t1");
		assert_eq!(t.account_ref.as_deref(), Some("b1"));
		assert_eq!(t.date, NaiveDate::from_ymd_opt(2024, 11, 15).unwrap());
		assert_eq!(t.amount, Decimal::from_str("12.34").unwrap());
		assert!(t.pending);
		assert!(t.tags.is_empty());
		assert!(!t.hidden);
	}

	#[test]
	fn test_cache_round_trip_drops_hidden() {
		let mut t = Transaction::new(
			"t1",
			NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
			Decimal::from_str("-3.50").unwrap(),
		);
		t.hidden = true;
		t.tags = vec![Tag::Positive];
		t.day = 15;
		t.month = "Nov".to_string();

		let json = serde_json::to_string(&t).unwrap();
		assert!(!json.contains("hidden"));

		let back: Transaction = serde_json::from_str(&json).unwrap();
		assert!(!back.hidden);
		assert_eq!(back.amount, t.amount);
		assert_eq!(back.tags, vec![Tag::Positive]);
		assert_eq!(back.month, "Nov");
	}

	#[test]
	fn test_missing_id_is_rejected() {
		let raw = r#"{"date": "2024-11-15", "amount": 1}"#;
		assert!(serde_json::from_str::<Transaction>(raw).is_err());
	}
}
