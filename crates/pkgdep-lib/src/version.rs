//! Comparable package versions.
//!
//! # Parsing
//! 1. An approximate comparator prefix (`"< "` or `"> "`) is read if present.
//! 1. Leading non-digit characters are trimmed when the first digit comes before the first split character.
//! 1. The string is split on any of the split characters (`.` by default).
//! 1. Each segment becomes a [`Part`]: a leading integer and whatever text follows it.
//! 1. Trailing `0` parts are dropped so `1.0.0` and `1` are the same version.
//!
//! # Ordering
//! Parts are compared pairwise, padding the shorter version with empty parts.
//! Integers are compared first, then the remaining text where a part without
//! text is greater than a part with text. When every part is equal the
//! approximate comparator decides, `< x` sorting before `x` sorting before `> x`.
//!
//! [`Version::latest()`] sorts above and [`Version::unknown()`] below every other version.

use serde::{Serialize, Deserialize};
use std::cmp::Ordering;

mod range;
pub use range::VersionRange;
pub use range::has_overlap_in_version_ranges;

mod channel;
pub use channel::Channel;
pub use channel::VersionAndChannel;

/// Characters a version string is split on when none are given.
pub const DEFAULT_SPLIT_CHARS: &str = ".";

const LATEST: &str = "Latest";
const UNKNOWN: &str = "Unknown";
const APPROXIMATE_LESS_THAN: &str = "< ";
const APPROXIMATE_GREATER_THAN: &str = "> ";

/// Relation of an approximate version to its base version.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApproximateComparator {
	#[default] None,
	LessThan,
	GreaterThan,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
enum Sentinel {
	#[default] None,
	Latest,
	Unknown,
}

/// A version parsed into comparable parts.
///
/// Any string is a valid version, parsing never fails.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Version {
	text: String,
	parts: Vec<Part>,
	sentinel: Sentinel,
	approximate: ApproximateComparator,
}

impl Version {
	/// Parses `version` using [`DEFAULT_SPLIT_CHARS`].
	pub fn new(version: impl Into<String>) -> Self {
		Self::with_split_chars(version, DEFAULT_SPLIT_CHARS)
	}

	/// Parses `version` splitting on any character in `split_chars`.
	pub fn with_split_chars(version: impl Into<String>, split_chars: &str) -> Self {
		let mut v = Self::default();
		v.assign(version, split_chars);
		v
	}

	/// Resets the version to the parsed value of `version`.
	pub fn assign(&mut self, version: impl Into<String>, split_chars: &str) {
		let text = version.into();
		let trimmed = text.trim();

		let (approximate, mut base) = if starts_with_ignore_case(trimmed, APPROXIMATE_LESS_THAN) {
			(ApproximateComparator::LessThan, &trimmed[APPROXIMATE_LESS_THAN.len()..])
		} else if starts_with_ignore_case(trimmed, APPROXIMATE_GREATER_THAN) {
			(ApproximateComparator::GreaterThan, &trimmed[APPROXIMATE_GREATER_THAN.len()..])
		} else {
			(ApproximateComparator::None, trimmed)
		};

		let is_split = |c: char| split_chars.contains(c);
		if let Some(digit) = base.find(|c: char| c.is_ascii_digit()) {
			if base.find(is_split).map_or(true, |split| digit < split) {
				base = &base[digit..];
			}
		}

		let mut parts: Vec<Part> = if base.is_empty() {
			Vec::new()
		} else {
			base.split(is_split).map(Part::parse).collect()
		};
		trim_parts(&mut parts);

		*self = Self {
			text,
			parts,
			sentinel: Sentinel::None,
			approximate,
		};
	}

	/// The sentinel version sorting above every other version.
	pub fn latest() -> Self {
		Self::sentinel(Sentinel::Latest, LATEST)
	}

	/// The sentinel version sorting below every other version.
	pub fn unknown() -> Self {
		Self::sentinel(Sentinel::Unknown, UNKNOWN)
	}

	fn sentinel(sentinel: Sentinel, text: &str) -> Self {
		Self {
			text: text.to_string(),
			parts: vec![Part::new(0, text)],
			sentinel,
			approximate: ApproximateComparator::None,
		}
	}

	/// A version just below `base`, displayed as `"< base"`.
	pub fn less_than(base: Version) -> crate::Result<Self> {
		Self::approximate(base, ApproximateComparator::LessThan)
	}

	/// A version just above `base`, displayed as `"> base"`.
	pub fn greater_than(base: Version) -> crate::Result<Self> {
		Self::approximate(base, ApproximateComparator::GreaterThan)
	}

	/// Wraps `base` with `comparator`.
	/// # Errors
	/// - `InvalidArgument` if `base` is already approximate or is [`Version::unknown()`].
	pub fn approximate(base: Version, comparator: ApproximateComparator) -> crate::Result<Self> {
		let prefix = match comparator {
			ApproximateComparator::None => return Ok(base),
			ApproximateComparator::LessThan => APPROXIMATE_LESS_THAN,
			ApproximateComparator::GreaterThan => APPROXIMATE_GREATER_THAN,
		};
		if base.is_approximate() {
			return Err(crate::Error::InvalidArgument(format!("`{}` is already an approximate version", base.text)));
		}
		if base.is_unknown() {
			return Err(crate::Error::InvalidArgument("an unknown version can't be approximate".to_string()));
		}
		Ok(Self {
			text: format!("{}{}", prefix, base.text),
			approximate: comparator,
			..base
		})
	}

	pub fn is_latest(&self) -> bool {
		self.sentinel == Sentinel::Latest && self.approximate == ApproximateComparator::None
	}

	pub fn is_unknown(&self) -> bool {
		self.sentinel == Sentinel::Unknown && self.approximate == ApproximateComparator::None
	}

	pub fn is_approximate(&self) -> bool {
		self.approximate != ApproximateComparator::None
	}

	pub fn approximate_comparator(&self) -> ApproximateComparator {
		self.approximate
	}

	/// `true` when the version was created from an empty string.
	///
	/// Not the same as having no parts, `"0.0"` has no parts but is not empty.
	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}

	pub fn parts(&self) -> &[Part] {
		&self.parts
	}

	/// Gets the part at `index` or the implied zero part past the end.
	pub fn part_at(&self, index: usize) -> Part {
		self.parts.get(index).cloned().unwrap_or_default()
	}

	/// Strips the approximate comparator, returns a copy if the version isn't approximate.
	pub fn base_version(&self) -> Version {
		let prefix_len = match self.approximate {
			ApproximateComparator::None => 0,
			ApproximateComparator::LessThan => APPROXIMATE_LESS_THAN.len(),
			ApproximateComparator::GreaterThan => APPROXIMATE_GREATER_THAN.len(),
		};
		let text = self.text.trim_start();
		Version {
			text: text.get(prefix_len..).unwrap_or_default().to_string(),
			parts: self.parts.clone(),
			sentinel: self.sentinel,
			approximate: ApproximateComparator::None,
		}
	}

	fn cmp_base(&self, other: &Self) -> Ordering {
		match (self.sentinel, other.sentinel) {
			(Sentinel::Latest, Sentinel::Latest) | (Sentinel::Unknown, Sentinel::Unknown) => return Ordering::Equal,
			(Sentinel::Latest, _) | (_, Sentinel::Unknown) => return Ordering::Greater,
			(_, Sentinel::Latest) | (Sentinel::Unknown, _) => return Ordering::Less,
			(Sentinel::None, Sentinel::None) => {},
		}

		let empty = Part::default();
		for i in 0..std::cmp::max(self.parts.len(), other.parts.len()) {
			let lhs = self.parts.get(i).unwrap_or(&empty);
			let rhs = other.parts.get(i).unwrap_or(&empty);
			match lhs.cmp(rhs) {
				Ordering::Equal => {},
				ord => return ord,
			}
		}
		Ordering::Equal
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		fn rank(a: ApproximateComparator) -> u8 {
			match a {
				ApproximateComparator::LessThan => 0,
				ApproximateComparator::None => 1,
				ApproximateComparator::GreaterThan => 2,
			}
		}

		match self.cmp_base(other) {
			Ordering::Equal => rank(self.approximate).cmp(&rank(other.approximate)),
			ord => ord,
		}
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Version {}

impl std::hash::Hash for Version {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.approximate.hash(state);
		self.sentinel.hash(state);
		if self.sentinel == Sentinel::None {
			self.parts.hash(state);
		}
	}
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.text)
	}
}

impl From<String> for Version {
	fn from(value: String) -> Self { Self::new(value) }
}

impl From<&str> for Version {
	fn from(value: &str) -> Self { Self::new(value) }
}

impl From<Version> for String {
	fn from(value: Version) -> Self { value.text }
}

/// A single component of a version between split characters.
#[derive(Debug, Default, Clone)]
pub struct Part {
	integer: u64,
	remainder: String,
	folded: String,
}

impl Part {
	pub fn new(integer: u64, remainder: &str) -> Self {
		let remainder = remainder.trim().to_string();
		Self {
			integer,
			folded: remainder.to_lowercase(),
			remainder,
		}
	}

	/// Reads a leading integer from `segment`, keeping anything after it as the remainder.
	///
	/// A segment without a leading integer, or one too large for a `u64`, is kept whole as the remainder.
	pub fn parse(segment: &str) -> Self {
		let segment = segment.trim();
		let digits = segment.find(|c: char| !c.is_ascii_digit()).unwrap_or(segment.len());
		if digits == 0 {
			return Self::new(0, segment);
		}
		match segment[..digits].parse::<u64>() {
			Ok(integer) => Self::new(integer, &segment[digits..]),
			Err(_) => Self::new(0, segment),
		}
	}

	pub fn integer(&self) -> u64 {
		self.integer
	}

	pub fn remainder(&self) -> &str {
		&self.remainder
	}

	fn is_zero(&self) -> bool {
		self.integer == 0 && self.remainder.is_empty()
	}
}

impl Ord for Part {
	fn cmp(&self, other: &Self) -> Ordering {
		match self.integer.cmp(&other.integer) {
			Ordering::Equal => {},
			ord => return ord,
		}
		match (self.folded.is_empty(), other.folded.is_empty()) {
			(true, true) => Ordering::Equal,
			/* No remainder is the final release, anything with a remainder comes before it */
			(true, false) => Ordering::Greater,
			(false, true) => Ordering::Less,
			(false, false) => self.folded.cmp(&other.folded),
		}
	}
}

impl PartialOrd for Part {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Part {
	fn eq(&self, other: &Self) -> bool {
		self.integer == other.integer && self.folded == other.folded
	}
}

impl Eq for Part {}

impl std::hash::Hash for Part {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.integer.hash(state);
		self.folded.hash(state);
	}
}

/// A version with an optional trailing `*` wildcard, e.g. `1.2.*`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatedVersion {
	version: Version,
}

impl GatedVersion {
	pub fn new(version: impl Into<Version>) -> Self {
		Self { version: version.into() }
	}

	/// Checks if `version` matches every part up to the wildcard.
	///
	/// Without a wildcard this is a plain equality check.
	pub fn is_valid_version(&self, version: &Version) -> bool {
		let gate = self.version.parts();
		let Some((last, prefix)) = gate.split_last() else {
			return false
		};

		if last != &Part::new(0, "*") {
			return &self.version == version;
		}

		prefix.iter()
			.enumerate()
			.all(|(i, part)| part == &version.part_at(i))
	}
}

impl std::fmt::Display for GatedVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.version.fmt(f)
	}
}

fn trim_parts(parts: &mut Vec<Part>) {
	while parts.last().map_or(false, Part::is_zero) {
		parts.pop();
	}
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
	s.get(..prefix.len()).map_or(false, |p| p.eq_ignore_ascii_case(prefix))
}
