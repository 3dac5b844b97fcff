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
//! Core of a personal finance dashboard: pulls accounts and transactions
//! from a financial aggregation API, keeps a user-curated list of hidden
//! transactions in step with a remote document, and caches everything
//! locally so the views can be served before the network answers.

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod report;
pub mod store;
pub mod sync;
pub mod util;

pub use dashboard::{AppState, Dashboard, RefreshOutcome, RefreshReport};
pub use error::{SyncError, SyncResult};
