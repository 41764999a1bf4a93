use serde::{Serialize, Deserialize};
use std::cmp::Ordering;

use super::Version;

/// A release channel, compared lexically. The empty channel is the default.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(String);

impl Channel {
	pub fn new(channel: impl Into<String>) -> Self {
		Self(channel.into())
	}

	pub fn is_default(&self) -> bool {
		self.0.is_empty()
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for Channel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// A version within a channel.
///
/// Sorted by channel first, then by version *descending*, so with the default sort
/// ```text
/// 2.0 ""
/// 1.0 ""
/// 3.0 "alpha"
/// 2.0 "alpha"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionAndChannel {
	pub version: Version,
	#[serde(default)]
	pub channel: Channel,
}

impl VersionAndChannel {
	pub fn new(version: Version, channel: Channel) -> Self {
		Self { version, channel }
	}

	/// Checks if `other` is a newer version in the same channel.
	///
	/// Channels are matched case-insensitively, crossing channels is never an update.
	pub fn is_updated_by(&self, other: &VersionAndChannel) -> bool {
		self.channel.0.to_lowercase() == other.channel.0.to_lowercase()
			&& self.version < other.version
	}
}

impl Ord for VersionAndChannel {
	fn cmp(&self, other: &Self) -> Ordering {
		self.channel.cmp(&other.channel)
			.then_with(|| other.version.cmp(&self.version))
	}
}

impl PartialOrd for VersionAndChannel {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for VersionAndChannel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.channel.is_default() {
			write!(f, "{}", self.version)
		} else {
			write!(f, "{}[{}]", self.version, self.channel)
		}
	}
}
