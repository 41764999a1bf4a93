//! Dependencies declared by packages.

use serde::{Serialize, Deserialize};
use std::cmp::Ordering;

use crate::version::{Version, VersionRange};

/// What a dependency refers to.
///
/// Only [`DependencyKind::Package`] dependencies are followed when building a [`crate::DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
	WindowsFeature,
	WindowsLibrary,
	Package,
	External,
}

/// A required package or feature and the versions accepted for it.
///
/// Identity is the kind and the case-insensitive id, the version bounds are not
/// part of it. Two requests for the same package with different bounds are the same `Dependency`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
	pub kind: DependencyKind,
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_version: Option<Version>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_version: Option<Version>,
}

impl Dependency {
	pub fn new(kind: DependencyKind, id: impl Into<String>) -> Self {
		Self {
			kind,
			id: id.into(),
			min_version: None,
			max_version: None,
		}
	}

	/// A package dependency without version bounds.
	pub fn package(id: impl Into<String>) -> Self {
		Self::new(DependencyKind::Package, id)
	}

	pub fn with_min_version(mut self, version: impl Into<Version>) -> Self {
		self.min_version = Some(version.into());
		self
	}

	pub fn with_max_version(mut self, version: impl Into<Version>) -> Self {
		self.max_version = Some(version.into());
		self
	}

	pub fn is_package(&self) -> bool {
		self.kind == DependencyKind::Package
	}

	/// The accepted versions as a range, unbounded ends become [`Version::unknown()`] and [`Version::latest()`].
	/// # Errors
	/// - `InvalidArgument` if the minimum is greater than the maximum.
	pub fn version_range(&self) -> crate::Result<VersionRange> {
		VersionRange::new(
			self.min_version.clone().unwrap_or_else(Version::unknown),
			self.max_version.clone().unwrap_or_else(Version::latest),
		)
	}

	fn folded_id(&self) -> impl Iterator<Item = char> + '_ {
		self.id.chars().flat_map(char::to_lowercase)
	}
}

impl Ord for Dependency {
	fn cmp(&self, other: &Self) -> Ordering {
		self.kind.cmp(&other.kind)
			.then_with(|| self.folded_id().cmp(other.folded_id()))
	}
}

impl PartialOrd for Dependency {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Dependency {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Dependency {}

impl std::hash::Hash for Dependency {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.kind.hash(state);
		self.folded_id().for_each(|c| c.hash(state));
	}
}

impl std::fmt::Display for Dependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.id)?;
		match (&self.min_version, &self.max_version) {
			(None, None) => Ok(()),
			(Some(min), None) => write!(f, " >= {}", min),
			(None, Some(max)) => write!(f, " <= {}", max),
			(Some(min), Some(max)) => write!(f, " [{}, {}]", min, max),
		}
	}
}

/// An ordered list of dependencies with at most one entry per identity.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Dependency>", into = "Vec<Dependency>")]
pub struct DependencyList {
	dependencies: Vec<Dependency>,
}

impl DependencyList {
	pub fn new() -> Self {
		Default::default()
	}

	/// Adds `dependency`, merging it into an existing entry with the same identity.
	///
	/// When merging the stricter bound wins, the higher minimum and the lower maximum.
	pub fn add(&mut self, dependency: Dependency) {
		let Some(i) = self.dependencies.iter().position(|d| *d == dependency) else {
			self.dependencies.push(dependency);
			return
		};
		let existing = &mut self.dependencies[i];

		if let Some(min) = dependency.min_version {
			if existing.min_version.as_ref().map_or(true, |m| &min > m) {
				existing.min_version = Some(min);
			}
		}
		if let Some(max) = dependency.max_version {
			if existing.max_version.as_ref().map_or(true, |m| &max < m) {
				existing.max_version = Some(max);
			}
		}
	}

	pub fn has_any(&self) -> bool {
		!self.dependencies.is_empty()
	}

	pub fn has_any_of(&self, kind: DependencyKind) -> bool {
		self.dependencies.iter().any(|d| d.kind == kind)
	}

	/// Gets the entry with the same identity as `dependency`.
	pub fn get(&self, dependency: &Dependency) -> Option<&Dependency> {
		self.dependencies.iter().find(|d| *d == dependency)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Dependency> {
		self.dependencies.iter()
	}

	pub fn iter_kind(&self, kind: DependencyKind) -> impl Iterator<Item = &Dependency> {
		self.dependencies.iter().filter(move |d| d.kind == kind)
	}

	pub fn len(&self) -> usize {
		self.dependencies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.dependencies.is_empty()
	}

	pub fn clear(&mut self) {
		self.dependencies.clear();
	}
}

impl Extend<Dependency> for DependencyList {
	fn extend<T: IntoIterator<Item = Dependency>>(&mut self, iter: T) {
		for d in iter {
			self.add(d);
		}
	}
}

impl FromIterator<Dependency> for DependencyList {
	fn from_iter<T: IntoIterator<Item = Dependency>>(iter: T) -> Self {
		let mut list = Self::new();
		list.extend(iter);
		list
	}
}

impl From<Vec<Dependency>> for DependencyList {
	fn from(value: Vec<Dependency>) -> Self { value.into_iter().collect() }
}

impl From<DependencyList> for Vec<Dependency> {
	fn from(value: DependencyList) -> Self { value.dependencies }
}

impl<'a> IntoIterator for &'a DependencyList {
	type Item = &'a Dependency;
	type IntoIter = std::slice::Iter<'a, Dependency>;
	fn into_iter(self) -> Self::IntoIter { self.dependencies.iter() }
}

impl IntoIterator for DependencyList {
	type Item = Dependency;
	type IntoIter = std::vec::IntoIter<Dependency>;
	fn into_iter(self) -> Self::IntoIter { self.dependencies.into_iter() }
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn dependency_id_is_case_insensitive() { assert_eq!(Dependency::package("LibA"), Dependency::package("liba")) }
	#[test] fn dependency_bounds_are_not_identity() { assert_eq!(Dependency::package("A").with_min_version("1.0"), Dependency::package("A")) }
	#[test] fn dependency_kind_is_identity() { assert_ne!(Dependency::package("A"), Dependency::new(DependencyKind::External, "A")) }
	#[test] fn dependency_ordered_by_id() { assert!(Dependency::package("a") < Dependency::package("B")) }
	#[test] fn dependency_open_range() { assert!(Dependency::package("A").version_range().unwrap().contains_version(&Version::new("7"))) }
	#[test] fn dependency_inverted_range_fails() { assert!(Dependency::package("A").with_min_version("2").with_max_version("1").version_range().is_err()) }

	#[test]
	fn dependency_hash_matches_eq() {
		use std::collections::HashSet;
		let set: HashSet<Dependency> = [Dependency::package("Foo"), Dependency::package("FOO")].into_iter().collect();
		assert_eq!(set.len(), 1);
	}

	#[test]
	fn dependency_list_merges_keeping_stricter_bounds() {
		let mut list = DependencyList::new();
		list.add(Dependency::package("A").with_min_version("1.0").with_max_version("3.0"));
		list.add(Dependency::package("a").with_min_version("2.0").with_max_version("4.0"));
		list.add(Dependency::package("A").with_min_version("0.5"));
		assert_eq!(list.len(), 1);
		let merged = list.get(&Dependency::package("A")).unwrap();
		assert_eq!(merged.min_version, Some(Version::new("2.0")));
		assert_eq!(merged.max_version, Some(Version::new("3.0")));
	}

	#[test]
	fn dependency_list_filters_kind() {
		let list: DependencyList = vec![
			Dependency::package("A"),
			Dependency::new(DependencyKind::WindowsFeature, "NetFx3"),
			Dependency::package("B"),
		].into();
		assert!(list.has_any_of(DependencyKind::WindowsFeature));
		assert!(!list.has_any_of(DependencyKind::External));
		assert_eq!(list.iter_kind(DependencyKind::Package).map(|d| d.id.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
	}

	#[test]
	fn dependency_list_deserialize() {
		let list: DependencyList = serde_json::from_str(r#"[
			{ "kind": "Package", "id": "A", "min_version": "1.2" },
			{ "kind": "External", "id": "tool" }
		]"#).unwrap();
		assert_eq!(list.len(), 2);
		assert_eq!(list.get(&Dependency::package("A")).unwrap().min_version, Some(Version::new("1.2")));
	}
}
