use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub discovery: Discovery,
	#[serde(default)]
	pub saved_search: SavedSearch,
	#[serde(default)]
	pub reference: Reference,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Limits applied to every discovery cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct Discovery {
	/// Hard cap on rows requested from the record store. Never above the criteria limit ceiling.
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
	/// Optional. Upper bound on a single record store call; unset leaves it to the driver.
	pub fetch_timeout_ms: Option<u64>,
}
impl Default for Discovery {
	fn default() -> Self {
		Self { max_limit: default_max_limit(), fetch_timeout_ms: None }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedSearch {
	#[serde(default = "default_max_saved_per_owner")]
	pub max_per_owner: u32,
	#[serde(default = "default_max_name_chars")]
	pub max_name_chars: u32,
}
impl Default for SavedSearch {
	fn default() -> Self {
		Self {
			max_per_owner: default_max_saved_per_owner(),
			max_name_chars: default_max_name_chars(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reference {
	/// Optional. When unset, cached reference tables live until explicitly invalidated.
	pub ttl_seconds: Option<u64>,
}

fn default_max_limit() -> u32 {
	200
}

fn default_max_saved_per_owner() -> u32 {
	20
}

fn default_max_name_chars() -> u32 {
	100
}
