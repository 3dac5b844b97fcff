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
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Renders an amount the way the dashboard shows money: always in positive
/// terms, rounded to cents, with a dollar sign and thousands separators.
/// Direction is conveyed separately through the transaction's tags.
pub fn money(amount: Option<Decimal>) -> String {
	let value = match amount {
		Some(v) if !v.is_zero() => v,
		_ => return "$0.00".to_string(),
	};

	let rounded = value
		.abs()
		.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
	let rendered = format!("{:.2}", rounded);

	let (whole, cents) = rendered.split_once('.').unwrap_or((&rendered, "00"));

	let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
	for (i, c) in whole.chars().enumerate() {
		if i > 0 && (whole.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(c);
	}

	format!("${}.{}", grouped, cents)
}

/// Accepts a decimal as either a JSON number or a string. The API sends
/// numbers; the local cache holds whatever `Decimal` serializes to.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
	D: Deserializer<'de>,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	let raw = match value {
		serde_json::Value::Number(num) => num.to_string(),
		serde_json::Value::String(s) => s,
		_ => return Err(serde::de::Error::custom("expected a number")),
	};

	Decimal::from_str(&raw)
		.or_else(|_| Decimal::from_scientific(&raw))
		.map_err(|e| serde::de::Error::custom(format!("{}: {}", raw, e)))
}
