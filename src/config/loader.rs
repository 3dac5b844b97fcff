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
use crate::config::config_file::Config;
use anyhow::{anyhow, bail, Error};
use dirs::{cache_dir, home_dir};
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::process::Command;

/// Fetches the config from the given path, or default path if none.
/// The boolean argument indicates whether secrets given as commands should
/// be executed and resolved, which only matters when talking to the network.
pub fn load_config(
	custom_config_path: Option<&String>,
	expand_auth: bool,
) -> Result<Config, Error> {
	let config_path = match &custom_config_path {
		None => {
			let home_dir = home_dir()
				.ok_or_else(|| anyhow!("Unable to determine home directory"))?;
			home_dir.join(".config/tally/config.toml")
		},
		Some(p) => PathBuf::from(p),
	};

	// create empty config file if it doesn't exist
	if !config_path.exists() && custom_config_path.is_none() {
		if let Some(parent) = config_path.parent() {
			fs::create_dir_all(parent)?;
		}
		File::create(config_path.clone())?;
	}

	let content = fs::read_to_string(config_path)?;
	let mut config = parse_config(&content)?;

	if expand_auth {
		expand_secrets(&mut config)?;
	}

	Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config, Error> {
	toml::from_str(content).map_err(|e| anyhow!("failed to parse config: {}", e))
}

/// Directory the local cache lives in.
pub fn cache_path(config: &Config) -> Result<PathBuf, Error> {
	if let Some(dir) = config.cache.as_ref().and_then(|c| c.dir.as_ref()) {
		return Ok(PathBuf::from(dir));
	}

	cache_dir()
		.map(|d| d.join("tally"))
		.ok_or_else(|| anyhow!("Unable to determine cache directory"))
}

/// Runs `key_cmd` / `token_cmd` where given and puts the result in the
/// corresponding literal field.
fn expand_secrets(config: &mut Config) -> Result<(), Error> {
	if let Some(api) = &mut config.api {
		api.key = resolve_secret("api.key", api.key.take(), &api.key_cmd)?;
	}

	if let Some(docs) = &mut config.documents {
		docs.token =
			resolve_secret("documents.token", docs.token.take(), &docs.token_cmd)?;
	}

	Ok(())
}

fn resolve_secret(
	name: &str,
	literal: Option<String>,
	cmd: &Option<String>,
) -> Result<Option<String>, Error> {
	let cmd = match cmd {
		None => return Ok(literal),
		Some(cmd) => cmd,
	};

	if literal.is_some() {
		bail!("Only one of {} and {}_cmd may be specified", name, name);
	}

	let output = Command::new("sh")
		.arg("-c")
		.arg(cmd)
		.output()
		.map_err(|e| anyhow!("failed to execute {}_cmd: {}", name, e))?;

	if !output.status.success() {
		bail!(
			"{}_cmd failed with status {}: {}",
			name,
			output.status,
			String::from_utf8_lossy(&output.stderr)
		);
	}

	let secret = String::from_utf8(output.stdout)
		.map_err(|e| anyhow!("failed to parse command output: {}", e))?
		.trim()
		.to_string();

	Ok(Some(secret))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_full_config() {
		let config = parse_config(
			r#"
			[api]
			key = "k"
			user = "u1"

			[documents]
			document = "d1"
			token = "t"

			[cache]
			dir = "/tmp/tally"
			"#,
		)
		.unwrap();

		let api = config.api.unwrap();
		assert_eq!(api.key.as_deref(), Some("k"));
		assert_eq!(api.user.as_deref(), Some("u1"));
		assert!(api.url.is_none());
		assert_eq!(config.documents.unwrap().document.as_deref(), Some("d1"));
	}

	#[test]
	fn test_empty_config() {
		let config = parse_config("").unwrap();
		assert!(config.api.is_none());
		assert!(config.documents.is_none());
	}

	#[test]
	fn test_cache_path_override() {
		let config = parse_config("[cache]\ndir = \"/var/tally\"").unwrap();
		assert_eq!(cache_path(&config).unwrap(), PathBuf::from("/var/tally"));
	}

	#[test]
	fn test_secret_cmd() {
		let mut config =
			parse_config("[api]\nkey_cmd = \"echo '  sekrit  '\"").unwrap();
		expand_secrets(&mut config).unwrap();
		assert_eq!(config.api.unwrap().key.as_deref(), Some("sekrit"));
	}

	#[test]
	fn test_secret_and_cmd_conflict() {
		let mut config =
			parse_config("[documents]\ntoken = \"a\"\ntoken_cmd = \"echo b\"")
				.unwrap();
		assert!(expand_secrets(&mut config).is_err());
	}

	#[test]
	fn test_failing_secret_cmd() {
		let mut config = parse_config("[api]\nkey_cmd = \"exit 3\"").unwrap();
		assert!(expand_secrets(&mut config).is_err());
	}
}
