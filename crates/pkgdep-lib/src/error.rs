//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	#[error("invalid state: {0}")]
	InvalidState(String),
	#[error("planning failed: {0}")]
	Plan(#[from] crate::planner::PlanError),
	/// A package source failed to answer a query.
	#[error("source error: {0}")]
	Source(Box<dyn std::error::Error + Send + Sync>),
}
