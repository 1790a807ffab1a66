pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A failure reaching the record store. Every read a discovery cycle issues returns this.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
	#[error("Record store unavailable: {message}")]
	Unavailable { message: String },
	#[error("Record store call exceeded {millis} ms.")]
	Timeout { millis: u64 },
}
impl From<pawfind_storage::Error> for FetchError {
	fn from(err: pawfind_storage::Error) -> Self {
		Self::Unavailable { message: err.to_string() }
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// `field` names the offending request field.
	#[error("Invalid request: {message}")]
	InvalidRequest { field: &'static str, message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error(transparent)]
	Fetch(#[from] FetchError),
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<pawfind_storage::Error> for Error {
	fn from(err: pawfind_storage::Error) -> Self {
		match err {
			pawfind_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			err @ pawfind_storage::Error::ListingNotFound { .. } =>
				Self::NotFound { message: err.to_string() },
			err @ pawfind_storage::Error::SavedSearchLimit { .. } =>
				Self::Conflict { message: err.to_string() },
		}
	}
}
