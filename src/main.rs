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
use chrono::Local;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::sync::Arc;
use tally::api::gist::GistStore;
use tally::api::tiny::TinyClient;
use tally::cache::FileCache;
use tally::config::{cache_path, load_config};
use tally::report::{render_accounts, render_transactions};
use tally::sync::PushOutcome;
use tally::util::amount::money;
use tally::{Dashboard, RefreshOutcome};

#[derive(Parser)]
#[command(name = "tally", version = "1.0", about = "Bank transaction dashboard")]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// Transaction id for the hide and unhide commands
	#[arg(required = false)]
	id: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Custom config file location (default: ~/.config/tally/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Also list hidden transactions
	#[arg(short = 'H', long)]
	show_hidden: bool,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		let needs_id = matches!(self.command, Directive::Hide | Directive::Unhide);
		if needs_id && self.id.is_none() {
			bail!("A transaction id is required");
		}

		Ok(())
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Refresh, // fetch everything, then show
	Show,    // show cached data, refreshing first if stale
	Hide,    // hide a transaction from the primary view
	Unhide,  // bring a hidden transaction back
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	env_logger::init();

	let args = Cli::parse();
	args.validate()?;

	let config = load_config(args.config.as_ref(), true)?;

	let api_config = config
		.api
		.as_ref()
		.ok_or_else(|| anyhow!("Missing [api] section in config"))?;
	let user_id = api_config
		.user
		.clone()
		.ok_or_else(|| anyhow!("Missing api.user in config"))?;
	let docs_config = config
		.documents
		.as_ref()
		.ok_or_else(|| anyhow!("Missing [documents] section in config"))?;

	let api = TinyClient::new(api_config)?;
	let documents = GistStore::new(docs_config)?;
	let cache = Arc::new(FileCache::new(&cache_path(&config)?));

	let now = Local::now();
	let dashboard =
		Dashboard::restore(api, documents, cache, &user_id, now.date_naive());

	match args.command {
		Directive::Refresh => {
			refresh(&dashboard).await;
			show(&dashboard, args.show_hidden);
		},
		Directive::Show => {
			if dashboard.needs_refresh(now) {
				refresh(&dashboard).await;
			}
			show(&dashboard, args.show_hidden);
		},
		Directive::Hide | Directive::Unhide => {
			let id = args.id.as_deref().unwrap_or_default();
			let hide = args.command == Directive::Hide;

			match dashboard.set_hidden(id, hide).await {
				None => println!("{} is already {}", id, state_word(hide)),
				Some(PushOutcome::Failed(e)) => {
					println!("{} {} locally, but could not sync: {}", id, state_word(hide), e)
				},
				Some(_) => println!("{} {}", id, state_word(hide)),
			}
		},
	}

	Ok(())
}

fn state_word(hidden: bool) -> &'static str {
	if hidden {
		"hidden"
	} else {
		"visible"
	}
}

async fn refresh<A, D>(dashboard: &Dashboard<A, D>)
where
	A: tally::api::FinanceApi,
	D: tally::api::DocumentStore + 'static,
{
	if let RefreshOutcome::Completed(report) = dashboard.refresh().await {
		if !report.transactions.complete {
			eprintln!(
				"Warning: transaction refresh stopped after {} pages",
				report.transactions.pages
			);
		}
	}
}

fn show<A, D>(dashboard: &Dashboard<A, D>, show_hidden: bool)
where
	A: tally::api::FinanceApi,
	D: tally::api::DocumentStore + 'static,
{
	if let Some(name) = dashboard.user().and_then(|u| u.name) {
		println!("{}", name);
	}

	let accounts = dashboard.sorted_accounts();
	let net: Decimal = accounts.iter().map(|a| a.net_balance).sum();
	println!();
	print!("{}", render_accounts(&accounts));
	println!("Net: {}", money(Some(net)));

	println!();
	print!("{}", render_transactions(&dashboard.visible_transactions()));

	let hidden = dashboard.hidden_transactions();
	if show_hidden && !hidden.is_empty() {
		println!();
		println!("Hidden:");
		print!("{}", render_transactions(&hidden));
	} else if !hidden.is_empty() {
		println!("({} hidden)", hidden.len());
	}
}
