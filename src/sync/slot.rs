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
use crate::util::lock;
use std::future::Future;
use std::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

#[derive(Default)]
struct SlotState {
	next_ticket: u64,
	/// The one request whose result will be honored
	current: Option<(u64, AbortHandle)>,
}

/// Holds at most one live request of a kind. Starting a new request aborts
/// the previous one; a request that was superseded never reports a result,
/// even if it had already finished by the time it was superseded.
pub struct RequestSlot {
	name: &'static str,
	state: Mutex<SlotState>,
}

impl RequestSlot {
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			state: Mutex::new(SlotState::default()),
		}
	}

	pub fn in_flight(&self) -> bool {
		lock(&self.state).current.is_some()
	}

	/// Runs `request` as this slot's current request. Returns None if a
	/// newer request took over before this one was done.
	pub async fn run<F, T>(&self, request: F) -> Option<T>
	where
		F: Future<Output = T> + Send + 'static,
		T: Send + 'static,
	{
		self.start(request).finish().await
	}

	/// Spawns `request` and claims the slot for it before returning, so
	/// claims are ordered exactly as calls to `start` are. Must be called
	/// from within a tokio runtime.
	pub fn start<F, T>(&self, request: F) -> Started<'_, T>
	where
		F: Future<Output = T> + Send + 'static,
		T: Send + 'static,
	{
		let task = tokio::spawn(request);

		let mut state = lock(&self.state);
		state.next_ticket += 1;
		let ticket = state.next_ticket;

		if let Some((previous, handle)) =
			state.current.replace((ticket, task.abort_handle()))
		{
			log::debug!(
				"[SYNC] {} request {} superseded by {}",
				self.name,
				previous,
				ticket
			);
			handle.abort();
		}

		Started {
			claim: Claim {
				slot: self,
				ticket,
				released: false,
			},
			task,
		}
	}

	/// Clears the slot if `ticket` still holds it. Aborting a finished task
	/// is a no-op, so this doubles as cleanup for a dropped caller.
	fn clear(&self, ticket: u64) -> bool {
		let mut state = lock(&self.state);
		let holds = matches!(state.current, Some((current, _)) if current == ticket);
		if holds {
			if let Some((_, handle)) = state.current.take() {
				handle.abort();
			}
		}
		holds
	}
}

/// A caller's hold on the slot; released on completion or when the caller
/// stops waiting.
struct Claim<'a> {
	slot: &'a RequestSlot,
	ticket: u64,
	released: bool,
}

impl Claim<'_> {
	fn release(mut self) -> bool {
		self.released = true;
		self.slot.clear(self.ticket)
	}
}

impl Drop for Claim<'_> {
	fn drop(&mut self) {
		if !self.released {
			self.slot.clear(self.ticket);
		}
	}
}

/// A request that holds, or held, its slot. Dropping it without calling
/// `finish` gives the slot up and cancels the request.
pub struct Started<'a, T> {
	claim: Claim<'a>,
	task: JoinHandle<T>,
}

impl<T> Started<'_, T> {
	/// Waits for the request. None if a newer request took over first.
	pub async fn finish(self) -> Option<T> {
		let Started { claim, task } = self;

		let result = task.await;
		let honored = claim.release();

		match result {
			Ok(value) if honored => Some(value),
			Ok(_) => None,
			Err(e) if e.is_cancelled() => None,
			Err(e) => std::panic::resume_unwind(e.into_panic()),
		}
	}
}
