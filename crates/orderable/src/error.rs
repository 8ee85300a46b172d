use sea_orm::{DbErr, SqlErr};

use thiserror::Error;

use super::orderable::Position;

#[derive(Debug, Error)]
pub enum Error {
	#[error("the following ids are not in this group: [{}]", .0.join(", "))]
	UnknownIds(Vec<String>),
	#[error("the following ids appear more than once: [{}]", .0.join(", "))]
	DuplicateIds(Vec<String>),
	#[error("sort order must not be negative <requested={0}>")]
	NegativePosition(Position),
	#[error("no sort order left after <max={0}>")]
	PositionOverflow(Position),
	#[error("no value for group field '{0}'")]
	MissingGroupField(&'static str),

	#[error("record not found <id='{0}'>")]
	RecordNotFound(String),
	#[error("sort order conflict persisted after retrying with fresh state: {0}")]
	UnresolvedConflict(#[source] DbErr),

	#[error(transparent)]
	Database(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// Errors the caller can fix by sending different input.
	#[must_use]
	pub const fn is_validation(&self) -> bool {
		matches!(
			self,
			Self::UnknownIds(_)
				| Self::DuplicateIds(_)
				| Self::NegativePosition(_)
				| Self::PositionOverflow(_)
				| Self::MissingGroupField(_)
		)
	}

	#[must_use]
	pub fn is_uniqueness_conflict(&self) -> bool {
		match self {
			Self::Database(e) => is_unique_violation(e),
			_ => false,
		}
	}
}

pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
	matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
