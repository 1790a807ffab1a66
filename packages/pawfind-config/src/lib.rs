mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Discovery, Postgres, Reference, SavedSearch, Service, Storage};

use std::{fs, net::SocketAddr, path::Path};

/// Upper bound for `discovery.max_limit`; matches the criteria limit ceiling.
pub const MAX_LIMIT_CEILING: u32 = 200;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::validation("service.http_bind", "must be non-empty."));
	}

	let admin_addr: SocketAddr = cfg
		.service
		.admin_bind
		.parse()
		.map_err(|_| Error::validation("service.admin_bind", "must be a socket address."))?;

	if !admin_addr.ip().is_loopback() {
		return Err(Error::validation("service.admin_bind", "must be a loopback address."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::validation("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation(
			"storage.postgres.pool_max_conns",
			"must be greater than zero.",
		));
	}
	if cfg.discovery.max_limit == 0 {
		return Err(Error::validation("discovery.max_limit", "must be greater than zero."));
	}
	if cfg.discovery.max_limit > MAX_LIMIT_CEILING {
		return Err(Error::validation(
			"discovery.max_limit",
			format!("must be at most {MAX_LIMIT_CEILING}."),
		));
	}
	if cfg.discovery.fetch_timeout_ms == Some(0) {
		return Err(Error::validation(
			"discovery.fetch_timeout_ms",
			"must be greater than zero when set.",
		));
	}
	if cfg.saved_search.max_per_owner == 0 {
		return Err(Error::validation("saved_search.max_per_owner", "must be greater than zero."));
	}
	if cfg.saved_search.max_name_chars == 0 {
		return Err(Error::validation("saved_search.max_name_chars", "must be greater than zero."));
	}
	if cfg.reference.ttl_seconds == Some(0) {
		return Err(Error::validation("reference.ttl_seconds", "must be greater than zero when set."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let level = cfg.service.log_level.trim();

	cfg.service.log_level = if level.is_empty() { "info".to_string() } else { level.to_string() };
}
