pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Encoding error: {message}")]
	Encoding { message: String },
	#[error("Retrieval error: {message}")]
	Retrieval { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<lode_storage::Error> for Error {
	fn from(err: lode_storage::Error) -> Self {
		match err {
			lode_storage::Error::Sqlx(inner) => Self::Retrieval { message: inner.to_string() },
			lode_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			lode_storage::Error::NotFound(message) => Self::Retrieval { message },
		}
	}
}
