use serde::{Serialize, Deserialize};
use std::cmp::Ordering;

use super::Version;

/// An inclusive range of versions from `min` to `max`.
///
/// The default range is empty and overlaps nothing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VersionRange {
	bounds: Option<Bounds>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Bounds {
	min: Version,
	max: Version,
}

impl VersionRange {
	/// # Errors
	/// - `InvalidArgument` if `min > max`
	pub fn new(min: Version, max: Version) -> crate::Result<Self> {
		if min > max {
			return Err(crate::Error::InvalidArgument(format!("range minimum `{}` is greater than maximum `{}`", min, max)));
		}
		Ok(Self { bounds: Some(Bounds { min, max }) })
	}

	/// The range from `version` to `version`.
	pub fn single(version: Version) -> Self {
		Self { bounds: Some(Bounds { min: version.clone(), max: version }) }
	}

	pub fn is_empty(&self) -> bool {
		self.bounds.is_none()
	}

	/// Checks if the ranges share at least one version. Empty ranges never overlap.
	pub fn has_overlap_with(&self, other: &VersionRange) -> bool {
		match (&self.bounds, &other.bounds) {
			/* Also covers `other` sitting entirely inside `self` */
			(Some(lhs), Some(rhs)) => lhs.min <= rhs.max && lhs.max >= rhs.min,
			_ => false,
		}
	}

	/// Checks if any range in `others` overlaps with this one.
	pub fn has_overlap_with_any<'a>(&self, others: impl IntoIterator<Item = &'a VersionRange>) -> bool {
		others.into_iter().any(|other| self.has_overlap_with(other))
	}

	/// The versions in both ranges, empty when they don't overlap.
	pub fn intersection(&self, other: &VersionRange) -> VersionRange {
		match (&self.bounds, &other.bounds) {
			(Some(lhs), Some(rhs)) if self.has_overlap_with(other) => Self {
				bounds: Some(Bounds {
					min: std::cmp::max(&lhs.min, &rhs.min).clone(),
					max: std::cmp::min(&lhs.max, &rhs.max).clone(),
				}),
			},
			_ => Self::default(),
		}
	}

	/// Checks if the range only contains `version`.
	pub fn is_same_as_single_version(&self, version: &Version) -> bool {
		match &self.bounds {
			Some(b) => &b.min == version && &b.max == version,
			None => false,
		}
	}

	pub fn contains_version(&self, version: &Version) -> bool {
		match &self.bounds {
			Some(b) => version >= &b.min && version <= &b.max,
			None => false,
		}
	}

	/// # Errors
	/// - `InvalidState` if the range is empty.
	pub fn min_version(&self) -> crate::Result<&Version> {
		self.bounds.as_ref().map(|b| &b.min).ok_or_else(|| crate::Error::InvalidState("empty range has no minimum".to_string()))
	}

	/// # Errors
	/// - `InvalidState` if the range is empty.
	pub fn max_version(&self) -> crate::Result<&Version> {
		self.bounds.as_ref().map(|b| &b.max).ok_or_else(|| crate::Error::InvalidState("empty range has no maximum".to_string()))
	}

	/// Orders disjoint ranges by their minimum.
	/// # Errors
	/// - `InvalidArgument` if either range is empty or the ranges overlap.
	pub fn try_cmp(&self, other: &VersionRange) -> crate::Result<Ordering> {
		match (&self.bounds, &other.bounds) {
			(Some(lhs), Some(rhs)) if !self.has_overlap_with(other) => Ok(lhs.min.cmp(&rhs.min)),
			(Some(_), Some(_)) => Err(crate::Error::InvalidArgument(format!("ranges {} and {} overlap", self, other))),
			_ => Err(crate::Error::InvalidArgument("empty ranges can't be ordered".to_string())),
		}
	}
}

impl std::fmt::Display for VersionRange {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.bounds {
			Some(b) => write!(f, "[{}, {}]", b.min, b.max),
			None => f.write_str("[]"),
		}
	}
}

impl Serialize for VersionRange {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.bounds.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for VersionRange {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		match Option::<Bounds>::deserialize(deserializer)? {
			Some(b) => Self::new(b.min, b.max).map_err(serde::de::Error::custom),
			None => Ok(Self::default()),
		}
	}
}

/// Checks if any two of `ranges` overlap.
pub fn has_overlap_in_version_ranges(ranges: &[VersionRange]) -> bool {
	ranges.iter()
		.enumerate()
		.any(|(i, range)| range.has_overlap_with_any(&ranges[i + 1..]))
}
