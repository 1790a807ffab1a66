//! Throwaway Postgres databases for the ignored storage tests.
//!
//! Each [`TestDatabase`] is a fresh, uniquely named database created from the server named by
//! `PAWFIND_PG_DSN`. It is dropped by [`TestDatabase::cleanup`], or on `Drop` as a fallback.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

const DSN_VAR: &str = "PAWFIND_PG_DSN";
const ADMIN_DATABASE: &str = "postgres";

/// Base DSN for a Postgres test, or `None` after printing why `test` is skipped.
pub fn dsn_or_skip(test: &str) -> Option<String> {
	let dsn = env::var(DSN_VAR).ok().filter(|dsn| !dsn.trim().is_empty());

	if dsn.is_none() {
		eprintln!("Skipping {test}; set {DSN_VAR} to run this test.");
	}

	dsn
}

pub struct TestDatabase {
	name: String,
	dsn: String,
	admin: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn create(base_dsn: &str) -> Result<Self> {
		let base =
			PgConnectOptions::from_str(base_dsn).map_err(|source| Error::InvalidDsn { source })?;
		let admin = base.clone().database(ADMIN_DATABASE);
		let name = format!("pawfind_test_{}", Uuid::new_v4().simple());
		let failed = |action: &'static str| {
			let name = name.clone();

			move |source: sqlx::Error| Error::Database { action, name, source }
		};
		let mut conn = PgConnection::connect_with(&admin).await.map_err(failed("connect for"))?;

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(failed("create"))?;

		let _ = conn.close().await;
		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.admin).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin = self.admin.clone();
		// Drop can run inside the test's runtime, which must not be blocked on.
		let worker = thread::spawn(move || -> Result<()> {
			let runtime = Builder::new_current_thread().enable_all().build()?;

			runtime.block_on(drop_database(&name, &admin))
		});

		match worker.join() {
			Ok(Err(err)) => eprintln!("Test database cleanup failed: {err}."),
			Err(_) => eprintln!("Test database cleanup panicked."),
			Ok(Ok(())) => {},
		}
	}
}

async fn drop_database(name: &str, admin: &PgConnectOptions) -> Result<()> {
	let failed = |action: &'static str| {
		move |source: sqlx::Error| Error::Database { action, name: name.to_string(), source }
	};
	let mut conn = PgConnection::connect_with(admin).await.map_err(failed("connect for"))?;

	sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.fetch_all(&mut conn)
	.await
	.map_err(failed("disconnect sessions from"))?;
	sqlx::query(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str())
		.execute(&mut conn)
		.await
		.map_err(failed("drop"))?;

	Ok(())
}
