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
use anyhow::{anyhow, bail, Error};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Wire format for dates sent to the financial API.
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses the date portion of an API timestamp. The API is not consistent
/// about sending bare dates vs. full ISO-8601 timestamps, so only the first
/// 10 characters are considered.
pub fn parse_api_date(date_str: &str) -> Result<NaiveDate, Error> {
	let prefix = date_str
		.get(..10)
		.ok_or_else(|| anyhow!("Date format must be YYYY-MM-DD: {}", date_str))?;

	NaiveDate::parse_from_str(prefix, API_DATE_FORMAT)
		.map_err(|e| anyhow!("Invalid date {}: {}", date_str, e))
}

/// The earliest date retained locally: one calendar month before `today`.
/// Clamps to the end of the shorter month, e.g. Mar 31 -> Feb 28/29.
pub fn window_start(today: NaiveDate) -> NaiveDate {
	today.checked_sub_months(Months::new(1)).unwrap_or(NaiveDate::MIN)
}

/// The last day of the month containing `today`.
pub fn end_of_month(today: NaiveDate) -> Result<NaiveDate, Error> {
	let first = today.with_day(1).ok_or_else(|| anyhow!("Invalid date"))?;
	let next = match first.checked_add_months(Months::new(1)) {
		Some(next) => next,
		None => bail!("No month follows {}", today),
	};
	next.pred_opt()
		.ok_or_else(|| anyhow!("No day precedes {}", next))
}

/// Three-letter month name, e.g. "Jan"
pub fn month_abbrev(date: NaiveDate) -> String {
	date.format("%b").to_string()
}

/// Serde adapter for API dates; see `parse_api_date`.
pub fn deserialize_api_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;
	parse_api_date(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn date(s: &str) -> NaiveDate {
		NaiveDate::parse_from_str(s, API_DATE_FORMAT).unwrap()
	}

	#[test]
	fn test_parse_bare_date() {
		assert_eq!(parse_api_date("2024-11-15").unwrap(), date("2024-11-15"));
	}

	#[test]
	fn test_parse_timestamp() {
		assert_eq!(
			parse_api_date("2024-11-15T18:22:01.000Z").unwrap(),
			date("2024-11-15")
		);
	}

	#[test]
	fn test_parse_rejects_garbage() {
		assert!(parse_api_date("2024-11").is_err());
		assert!(parse_api_date("2024-13-01").is_err());
		assert!(parse_api_date("yesterday!").is_err());
	}

	#[test]
	fn test_window_start() {
		assert_eq!(window_start(date("2024-11-15")), date("2024-10-15"));
	}

	#[test]
	fn test_window_start_crossing_year_boundary() {
		assert_eq!(window_start(date("2024-01-10")), date("2023-12-10"));
	}

	#[test]
	fn test_window_start_clamps_to_short_month() {
		// leap year test case
		assert_eq!(window_start(date("2024-03-31")), date("2024-02-29"));
		assert_eq!(window_start(date("2023-03-31")), date("2023-02-28"));
	}

	#[test]
	fn test_end_of_month() {
		assert_eq!(end_of_month(date("2024-11-15")).unwrap(), date("2024-11-30"));
		assert_eq!(end_of_month(date("2024-02-01")).unwrap(), date("2024-02-29"));
		assert_eq!(end_of_month(date("2024-12-31")).unwrap(), date("2024-12-31"));
	}

	#[test]
	fn test_month_abbrev() {
		assert_eq!(month_abbrev(date("2024-01-31")), "Jan");
		assert_eq!(month_abbrev(date("2024-09-01")), "Sep");
	}
}
