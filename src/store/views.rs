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
//! Read-side ordering for the dashboard. Nothing here mutates or persists;
//! merge results are stored unordered and sorted on every read.

use crate::model::{Account, Transaction};
use std::cmp::Ordering;

/// Transactions that are not hidden, in display order.
pub fn visible(transactions: &[Transaction]) -> Vec<Transaction> {
	sorted(transactions.iter().filter(|t| !t.hidden))
}

/// Hidden transactions, in display order.
pub fn hidden(transactions: &[Transaction]) -> Vec<Transaction> {
	sorted(transactions.iter().filter(|t| t.hidden))
}

/// Accounts by size of balance, largest first.
pub fn accounts(accounts: &[Account]) -> Vec<Account> {
	let mut out = accounts.to_vec();
	out.sort_by(|a, b| {
		b.net_balance
			.abs()
			.cmp(&a.net_balance.abs())
			.then_with(|| b.name.cmp(&a.name))
	});
	out
}

fn sorted<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> Vec<Transaction> {
	let mut out: Vec<Transaction> = transactions.cloned().collect();
	out.sort_by(display_order);
	out
}

/// Pending first, then visible before hidden, then the largest amounts,
/// the newest dates, and finally name, descending.
pub fn display_order(a: &Transaction, b: &Transaction) -> Ordering {
	// First: pending before settled
	let pending_cmp = b.pending.cmp(&a.pending);
	if pending_cmp != Ordering::Equal {
		return pending_cmp;
	}

	// Then: visible before hidden
	let hidden_cmp = a.hidden.cmp(&b.hidden);
	if hidden_cmp != Ordering::Equal {
		return hidden_cmp;
	}

	// Then: magnitude (descending), regardless of direction
	let amount_cmp = b.amount.abs().cmp(&a.amount.abs());
	if amount_cmp != Ordering::Equal {
		return amount_cmp;
	}

	// Then: date (descending)
	let date_cmp = b.date.cmp(&a.date);
	if date_cmp != Ordering::Equal {
		return date_cmp;
	}

	b.name.cmp(&a.name)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use rust_decimal::Decimal;

	fn txn(id: &str, amount: i64, d: u32) -> Transaction {
		Transaction::new(
			id,
			NaiveDate::from_ymd_opt(2024, 11, d).unwrap(),
			Decimal::from(amount),
		)
	}

	fn order(ts: &[Transaction]) -> Vec<&str> {
		ts.iter().map(|t| t.id.as_str()).collect()
	}

	#[test]
	fn test_pending_first() {
		let mut p = txn("pending", 1, 1);
		p.pending = true;
		let ts = vec![txn("big", 500, 20), p];
		assert_eq!(order(&visible(&ts)), vec!["pending", "big"]);
	}

	#[test]
	fn test_magnitude_ignores_sign() {
		let ts = vec![txn("small", 5, 1), txn("refund", -50, 1), txn("mid", 20, 1)];
		assert_eq!(order(&visible(&ts)), vec!["refund", "mid", "small"]);
	}

	#[test]
	fn test_date_then_name() {
		let mut a = txn("a", 5, 10);
		a.name = "Alpha".into();
		let mut b = txn("b", 5, 10);
		b.name = "Bravo".into();
		let newer = txn("newer", 5, 11);

		let ts = vec![a, newer, b];
		assert_eq!(order(&visible(&ts)), vec!["newer", "b", "a"]);
	}

	#[test]
	fn test_partition() {
		let mut h = txn("h", 100, 1);
		h.hidden = true;
		let ts = vec![h, txn("v", 1, 1)];

		assert_eq!(order(&visible(&ts)), vec!["v"]);
		assert_eq!(order(&hidden(&ts)), vec!["h"]);
	}

	#[test]
	fn test_hidden_sorts_after_visible() {
		let mut h = txn("h", 100, 1);
		h.hidden = true;
		let v = txn("v", 1, 1);
		assert_eq!(display_order(&v, &h), Ordering::Less);
	}

	#[test]
	fn test_accounts_by_balance() {
		let ts = vec![
			Account::new("1", "Savings", Decimal::from(300)),
			Account::new("2", "Card", Decimal::from(-900)),
			Account::new("3", "Alpha", Decimal::from(300)),
		];
		let sorted: Vec<String> = accounts(&ts).into_iter().map(|a| a.name).collect();
		assert_eq!(sorted, vec!["Card", "Savings", "Alpha"]);
	}
}
