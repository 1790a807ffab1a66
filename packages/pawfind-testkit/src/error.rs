pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Base DSN is not a valid Postgres DSN: {source}")]
	InvalidDsn { source: sqlx::Error },
	#[error("Failed to {action} test database {name}: {source}")]
	Database { action: &'static str, name: String, source: sqlx::Error },
	#[error("Test database cleanup could not start a runtime: {0}")]
	Runtime(#[from] std::io::Error),
}
