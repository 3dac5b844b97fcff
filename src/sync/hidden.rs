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
use super::slot::RequestSlot;
use crate::api::DocumentStore;
use crate::cache::{self, CacheKey, LocalCache};
use crate::error::SyncError;
use crate::model::HiddenSet;
use crate::util::lock;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub enum PushOutcome {
	/// The remote document now holds the pushed set
	Confirmed,
	Failed(SyncError),
	/// A newer push took over; this one wrote nothing it will answer for
	Superseded,
}

#[derive(Debug)]
pub enum PullOutcome {
	/// The local set was replaced. `reconciled` means local changes the
	/// remote never confirmed were folded in, and the result should be
	/// pushed back.
	Applied {
		hidden: HiddenSet,
		reconciled: bool,
	},
	Failed(SyncError),
	/// A newer pull took over, or the local set changed while this one was
	/// in flight. Nothing was applied.
	Superseded,
}

struct Local {
	hidden: HiddenSet,
	/// Bumped on every local change
	generation: u64,
	/// The remote document is known to match `hidden`
	confirmed: bool,
}

/// Keeps the hidden list in step with the remote document. Owns the local
/// copy of the set, so every change to it goes through here.
pub struct HiddenListSync<D> {
	store: Arc<D>,
	cache: Arc<dyn LocalCache>,
	local: Mutex<Local>,
	pull_slot: RequestSlot,
	push_slot: RequestSlot,
}

impl<D: DocumentStore + 'static> HiddenListSync<D> {
	/// Starts from whatever set the cache holds.
	pub fn new(store: D, cache: Arc<dyn LocalCache>) -> Self {
		let hidden: HiddenSet =
			cache::load(cache.as_ref(), CacheKey::Hidden).unwrap_or_default();
		let unsynced: bool =
			cache::load(cache.as_ref(), CacheKey::Unsynced).unwrap_or(false);
		log::debug!(
			"[SYNC] restored {} hidden ids{}",
			hidden.len(),
			if unsynced { ", not yet pushed" } else { "" }
		);

		Self {
			store: Arc::new(store),
			cache,
			local: Mutex::new(Local {
				hidden,
				generation: 0,
				confirmed: !unsynced,
			}),
			pull_slot: RequestSlot::new("pull"),
			push_slot: RequestSlot::new("push"),
		}
	}

	pub fn hidden(&self) -> HiddenSet {
		lock(&self.local).hidden.clone()
	}

	pub fn is_hidden(&self, id: &str) -> bool {
		lock(&self.local).hidden.contains(id)
	}

	/// False from the moment the local set changes until a push of it lands.
	pub fn is_confirmed(&self) -> bool {
		lock(&self.local).confirmed
	}

	pub fn pull_in_flight(&self) -> bool {
		self.pull_slot.in_flight()
	}

	pub fn push_in_flight(&self) -> bool {
		self.push_slot.in_flight()
	}

	/// Changes the local set and persists it to the cache, along with a
	/// marker that the remote has not seen it yet. Nothing is sent until
	/// `push_local`.
	pub fn modify<R>(&self, change: impl FnOnce(&mut HiddenSet) -> R) -> R {
		let mut local = lock(&self.local);
		let result = change(&mut local.hidden);
		local.generation += 1;
		local.confirmed = false;
		cache::store_or_log(self.cache.as_ref(), CacheKey::Hidden, &local.hidden);
		cache::store_or_log(self.cache.as_ref(), CacheKey::Unsynced, &true);
		result
	}

	/// Makes `hidden` the local set and writes it to the remote document.
	pub async fn push(&self, hidden: HiddenSet) -> PushOutcome {
		self.modify(|local| *local = hidden);
		self.push_local().await
	}

	/// Writes the local set as it stands now to the remote document,
	/// cancelling any push still in flight.
	pub async fn push_local(&self) -> PushOutcome {
		// the snapshot and the slot claim happen under one lock, so the
		// newest snapshot is always the one left holding the slot
		let (request, generation) = {
			let mut local = lock(&self.local);
			let content = match local.hidden.to_document() {
				Ok(content) => content,
				Err(e) => {
					log::error!("[SYNC] could not encode hidden list: {}", e);
					return PushOutcome::Failed(e);
				},
			};
			local.confirmed = false;

			log::debug!("[SYNC] pushing hidden list ({} bytes)", content.len());
			let store = Arc::clone(&self.store);
			let request = self
				.push_slot
				.start(async move { store.write(content).await });
			(request, local.generation)
		};

		let result = request.finish().await;

		match result {
			None => {
				log::debug!("[SYNC] push superseded");
				PushOutcome::Superseded
			},
			Some(Ok(())) => {
				let mut local = lock(&self.local);
				// a change made after this push started still needs its own
				if local.generation == generation {
					local.confirmed = true;
					cache::store_or_log(self.cache.as_ref(), CacheKey::Unsynced, &false);
				}
				log::info!("[SYNC] pushed hidden list");
				PushOutcome::Confirmed
			},
			Some(Err(e)) => {
				log::error!("[SYNC] push failed: {}", e);
				PushOutcome::Failed(e)
			},
		}
	}

	/// Replaces the local set with the remote document's, cancelling any
	/// pull still in flight. If the remote has not confirmed the local set,
	/// the two are unioned instead.
	pub async fn pull(&self) -> PullOutcome {
		let started = lock(&self.local).generation;

		let store = Arc::clone(&self.store);
		let result = self.pull_slot.run(async move { store.read().await }).await;

		let content = match result {
			None => {
				log::debug!("[SYNC] pull superseded");
				return PullOutcome::Superseded;
			},
			Some(Err(e)) => {
				log::error!("[SYNC] pull failed: {}", e);
				return PullOutcome::Failed(e);
			},
			Some(Ok(content)) => content,
		};

		let remote = match HiddenSet::from_document(&content) {
			Ok(remote) => remote,
			Err(e) => {
				log::error!("[SYNC] remote hidden list unreadable: {}", e);
				return PullOutcome::Failed(e);
			},
		};

		let mut local = lock(&self.local);
		if local.generation != started {
			log::debug!("[SYNC] dropping pull, local list changed meanwhile");
			return PullOutcome::Superseded;
		}

		let reconciled = !local.confirmed;
		let hidden = if reconciled {
			log::warn!("[SYNC] remote list is behind, merging local changes in");
			remote.union(&local.hidden)
		} else {
			remote
		};

		local.hidden = hidden.clone();
		cache::store_or_log(self.cache.as_ref(), CacheKey::Hidden, &hidden);
		log::info!("[SYNC] pulled {} hidden ids", hidden.len());

		PullOutcome::Applied { hidden, reconciled }
	}
}
