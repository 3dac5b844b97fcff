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
use crate::model::{Account, HiddenSet, Tag, Transaction};
use crate::util::date::month_abbrev;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Folds a page of transactions from the API into the existing set.
///
/// Identity is the transaction id; when both sides carry the same id, the
/// incoming record replaces the existing one in place. Anything dated before
/// `window_start` is dropped. Every survivor gets its display fields derived
/// afresh against the current hidden set and account list.
///
/// No ordering is promised; see `views` for presentation order.
pub fn merge_page(
	existing: Vec<Transaction>,
	incoming: Vec<Transaction>,
	window_start: NaiveDate,
	hidden: &HiddenSet,
	accounts: &[Account],
) -> Vec<Transaction> {
	let mut merged: Vec<Transaction> =
		Vec::with_capacity(existing.len() + incoming.len());
	let mut position: HashMap<String, usize> = HashMap::new();

	for t in existing.into_iter().chain(incoming) {
		match position.get(&t.id) {
			Some(&i) => merged[i] = t,
			None => {
				position.insert(t.id.clone(), merged.len());
				merged.push(t);
			},
		}
	}

	merged.retain(|t| t.date >= window_start);

	let accounts_by_id: HashMap<&str, &Account> =
		accounts.iter().map(|a| (a.id.as_str(), a)).collect();

	for t in merged.iter_mut() {
		decorate(t, hidden, &accounts_by_id);
	}

	merged
}

fn decorate(
	t: &mut Transaction,
	hidden: &HiddenSet,
	accounts: &HashMap<&str, &Account>,
) {
	t.tags.clear();
	if t.pending {
		t.tags.push(Tag::Pending);
	}
	t.tags.push(Tag::for_amount(t.amount));

	t.day = t.date.day();
	t.month = month_abbrev(t.date);

	// an account that disappeared keeps the label from when it was known
	if let Some(account) = t
		.account_ref
		.as_deref()
		.and_then(|id| accounts.get(id))
	{
		t.info = Some(match &t.number {
			Some(number) => format!("{} {}", account.name, number),
			None => account.name.clone(),
		});
	}

	t.hidden = hidden.contains(&t.id);
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal::Decimal;
	use std::collections::BTreeSet;

	fn day(d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
	}

	fn txn(id: &str, amount: i64, date: NaiveDate) -> Transaction {
		Transaction::new(id, date, Decimal::from(amount))
	}

	fn ids(ts: &[Transaction]) -> BTreeSet<String> {
		ts.iter().map(|t| t.id.clone()).collect()
	}

	#[test]
	fn test_overlapping_pages() {
		let d = day(15);
		let existing = vec![txn("a", -10, d), txn("b", 5, d)];
		let incoming = vec![txn("a", -10, d), txn("c", 20, d)];

		let merged = merge_page(existing, incoming, day(1), &HiddenSet::new(), &[]);

		assert_eq!(merged.len(), 3);
		let expected: BTreeSet<String> =
			["a", "b", "c"].iter().map(|s| s.to_string()).collect();
		assert_eq!(ids(&merged), expected);
	}

	#[test]
	fn test_incoming_wins_on_collision() {
		let mut stale = txn("a", -10, day(15));
		stale.pending = true;
		let mut fresh = txn("a", -12, day(16));
		fresh.name = "Settled".to_string();

		let merged =
			merge_page(vec![stale], vec![fresh], day(1), &HiddenSet::new(), &[]);

		assert_eq!(merged.len(), 1);
		assert_eq!(merged[0].amount, Decimal::from(-12));
		assert_eq!(merged[0].date, day(16));
		assert!(!merged[0].pending);
		assert_eq!(merged[0].name, "Settled");
	}

	#[test]
	fn test_duplicates_within_a_page() {
		let merged = merge_page(
			vec![],
			vec![txn("a", 1, day(2)), txn("a", 2, day(3))],
			day(1),
			&HiddenSet::new(),
			&[],
		);
		assert_eq!(merged.len(), 1);
		assert_eq!(merged[0].amount, Decimal::from(2));
	}

	#[test]
	fn test_window_filter() {
		let merged = merge_page(
			vec![txn("old", 1, day(9))],
			vec![txn("edge", 1, day(10)), txn("new", 1, day(20))],
			day(10),
			&HiddenSet::new(),
			&[],
		);

		assert!(merged.iter().all(|t| t.date >= day(10)));
		assert_eq!(merged.len(), 2);
	}

	#[test]
	fn test_window_filter_drops_existing_records_too() {
		// an incoming record can move a transaction out of the window
		let merged = merge_page(
			vec![txn("a", 1, day(20))],
			vec![txn("a", 1, day(5))],
			day(10),
			&HiddenSet::new(),
			&[],
		);
		assert!(merged.is_empty());
	}

	#[test]
	fn test_idempotent() {
		let a = vec![txn("a", -10, day(15)), txn("b", 5, day(14))];
		let b = vec![txn("a", -11, day(15)), txn("c", 20, day(16))];
		let hidden: HiddenSet = ["b"].into_iter().collect();

		let once = merge_page(a, b.clone(), day(1), &hidden, &[]);
		let twice = merge_page(once.clone(), b, day(1), &hidden, &[]);

		assert_eq!(once, twice);
	}

	#[test]
	fn test_hidden_flag() {
		let hidden: HiddenSet = ["a"].into_iter().collect();
		let merged = merge_page(
			vec![txn("b", 1, day(15))],
			vec![txn("a", 1, day(15))],
			day(1),
			&hidden,
			&[],
		);

		for t in &merged {
			assert_eq!(t.hidden, t.id == "a");
		}
	}

	#[test]
	fn test_unhiding_clears_flag_on_remerge() {
		let hidden: HiddenSet = ["a"].into_iter().collect();
		let merged =
			merge_page(vec![], vec![txn("a", 1, day(15))], day(1), &hidden, &[]);
		assert!(merged[0].hidden);

		let merged = merge_page(merged, vec![], day(1), &HiddenSet::new(), &[]);
		assert!(!merged[0].hidden);
	}

	#[test]
	fn test_tags() {
		let mut pending_out = txn("a", 5, day(15));
		pending_out.pending = true;

		let merged = merge_page(
			vec![],
			vec![pending_out, txn("b", -5, day(15)), txn("c", 0, day(15))],
			day(1),
			&HiddenSet::new(),
			&[],
		);

		assert_eq!(merged[0].tags, vec![Tag::Pending, Tag::Negative]);
		assert_eq!(merged[1].tags, vec![Tag::Positive]);
		assert_eq!(merged[2].tags, vec![Tag::Negative]);
	}

	#[test]
	fn test_display_fields() {
		let account = Account::new("bank1", "Checking", Decimal::ZERO);

		let mut with_account = txn("a", 5, day(3));
		with_account.account_ref = Some("bank1".to_string());
		with_account.number = Some("1234".to_string());

		let mut unknown_account = txn("b", 5, day(3));
		unknown_account.account_ref = Some("gone".to_string());

		let merged = merge_page(
			vec![],
			vec![with_account, unknown_account],
			day(1),
			&HiddenSet::new(),
			&[account],
		);

		assert_eq!(merged[0].day, 3);
		assert_eq!(merged[0].month, "Nov");
		assert_eq!(merged[0].info.as_deref(), Some("Checking 1234"));
		assert_eq!(merged[1].info, None);
	}
}
