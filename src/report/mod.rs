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
//! Plain text rendering of the dashboard views for the terminal.

mod table;

pub use table::Table;

use crate::model::{Account, Tag, Transaction};
use crate::util::amount::money;

/// Arrow showing which way money moved for a given tag set.
fn direction(tags: &[Tag]) -> &'static str {
	if tags.contains(&Tag::Positive) {
		"+"
	} else {
		"-"
	}
}

pub fn render_accounts(accounts: &[Account]) -> String {
	let mut table = Table::new(3);
	table.add_header(vec!["Account", "", "Balance"]);
	table.add_separator();
	table.right_align(vec![2]);

	for account in accounts {
		let tags = [account.tag()];
		table.add_row(vec![
			account.name.clone(),
			direction(&tags).to_string(),
			money(Some(account.displayed_balance())),
		]);
	}

	table.render()
}

pub fn render_transactions(transactions: &[Transaction]) -> String {
	let mut table = Table::new(6);
	table.add_header(vec!["Date", "Id", "Name", "", "Amount", "Account"]);
	table.add_separator();
	table.right_align(vec![4]);

	for t in transactions {
		let mut name = t.name.clone();
		if t.tags.contains(&Tag::Pending) {
			name.push_str(" (pending)");
		}

		table.add_row(vec![
			format!("{} {:>2}", t.month, t.day),
			t.id.clone(),
			name,
			direction(&t.tags).to_string(),
			money(Some(t.amount)),
			t.info.clone().unwrap_or_default(),
		]);
	}

	table.render()
}
