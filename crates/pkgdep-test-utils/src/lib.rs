//! Fixtures shared by the pkgdep tests.
//!
//! - [`FakeCatalog`], an in-memory catalog with installed versions and ids whose lookups fail.
//! - [`scenarios`], canned dependency layouts rooted at `root`.
//! - [`write_catalog()`], writes a catalog to a temporary JSON file for the loaders.

use std::collections::{BTreeMap, HashSet};

use pkgdep::dependency::{Dependency, DependencyList};
use pkgdep::planner::{Catalog, ManifestCatalog, PackageManifest};
use pkgdep::version::Version;

#[derive(Debug, thiserror::Error)]
pub enum FakeCatalogError {
	#[error("catalog source for `{0}` is unreachable")]
	Unreachable(String),
}

/// An in-memory catalog which can also be told to fail lookups.
#[derive(Debug, Default)]
pub struct FakeCatalog {
	packages: Vec<PackageManifest>,
	installed: BTreeMap<String, Version>,
	unreachable: HashSet<String>,
}

impl FakeCatalog {
	pub fn new() -> Self {
		Default::default()
	}

	/// Adds a manifest for `id` at `version` depending on each of `dependencies` without bounds.
	pub fn with_package(mut self, id: &str, version: &str, dependencies: &[&str]) -> Self {
		let mut manifest = PackageManifest::new(id, version);
		for d in dependencies {
			manifest = manifest.with_dependency(Dependency::package(*d));
		}
		self.packages.push(manifest);
		self
	}

	pub fn with_manifest(mut self, manifest: PackageManifest) -> Self {
		self.packages.push(manifest);
		self
	}

	pub fn with_installed(mut self, id: &str, version: &str) -> Self {
		self.installed.insert(id.to_lowercase(), Version::new(version));
		self
	}

	/// Lookups of `id` will fail with [`FakeCatalogError::Unreachable`].
	pub fn with_unreachable(mut self, id: &str) -> Self {
		self.unreachable.insert(id.to_lowercase());
		self
	}

	/// The same packages as a [`ManifestCatalog`], installed versions included.
	pub fn to_manifest_catalog(&self) -> ManifestCatalog {
		let mut catalog = ManifestCatalog::new();
		for m in &self.packages {
			catalog.add_manifest(m.clone());
		}
		for (id, v) in &self.installed {
			catalog.set_installed(id.clone(), v.clone());
		}
		catalog
	}

	/// Dependencies of the first manifest for `dependency`, usable as a graph provider.
	pub fn dependencies(&self, dependency: &Dependency) -> pkgdep::Result<DependencyList> {
		Ok(self.manifests(&dependency.id)?
			.into_iter()
			.next()
			.map(|m| m.dependencies)
			.unwrap_or_default())
	}
}

impl Catalog for FakeCatalog {
	fn manifests(&self, id: &str) -> pkgdep::Result<Vec<PackageManifest>> {
		let id = id.to_lowercase();
		if self.unreachable.contains(&id) {
			return Err(pkgdep::Error::Source(Box::new(FakeCatalogError::Unreachable(id))));
		}
		Ok(self.packages.iter().filter(|m| m.id.to_lowercase() == id).cloned().collect())
	}

	fn installed_version(&self, id: &str) -> Option<Version> {
		self.installed.get(&id.to_lowercase()).cloned()
	}
}

/// Canned dependency layouts, each rooted at `root`.
pub mod scenarios {
	use super::FakeCatalog;
	use pkgdep::dependency::Dependency;
	use pkgdep::planner::PackageManifest;

	/// root -> B, C and B -> C, so C has to go before B.
	pub fn needs_to_install_b_first() -> FakeCatalog {
		FakeCatalog::new()
			.with_package("root", "1.0", &["B", "C"])
			.with_package("B", "1.0", &["C"])
			.with_package("C", "1.0", &[])
	}

	/// root -> C, F and C -> F, F is seen twice without a loop.
	pub fn dependency_already_in_stack_but_no_loop() -> FakeCatalog {
		FakeCatalog::new()
			.with_package("root", "1.0", &["C", "F"])
			.with_package("C", "1.0", &["F"])
			.with_package("F", "1.0", &[])
	}

	/// root -> D -> root
	pub fn easy_to_see_loop() -> FakeCatalog {
		FakeCatalog::new()
			.with_package("root", "1.0", &["D"])
			.with_package("D", "1.0", &["root"])
	}

	/// root -> B -> H -> G and root -> C -> G -> B, a loop below the root.
	pub fn loop_below_root() -> FakeCatalog {
		FakeCatalog::new()
			.with_package("root", "1.0", &["B", "C"])
			.with_package("B", "1.0", &["H"])
			.with_package("C", "1.0", &["G"])
			.with_package("G", "1.0", &["B"])
			.with_package("H", "1.0", &["G"])
	}

	/// root -> A, B where A needs Lib >= 1.0 and B needs Lib >= 2.0.
	///
	/// Lib is available at 1.0 and 2.0.
	pub fn requesters_with_different_minimums() -> FakeCatalog {
		FakeCatalog::new()
			.with_package("root", "1.0", &["A", "B"])
			.with_manifest(PackageManifest::new("A", "1.0").with_dependency(Dependency::package("Lib").with_min_version("1.0")))
			.with_manifest(PackageManifest::new("B", "1.0").with_dependency(Dependency::package("Lib").with_min_version("2.0")))
			.with_package("Lib", "1.0", &[])
			.with_package("Lib", "2.0", &[])
	}

	/// root -> B, C and both branches reach I, with a path between the branches.
	pub fn path_between_branches_but_no_loop() -> FakeCatalog {
		FakeCatalog::new()
			.with_package("root", "1.0", &["B", "C"])
			.with_package("B", "1.0", &["G"])
			.with_package("C", "1.0", &["H"])
			.with_package("G", "1.0", &["H"])
			.with_package("H", "1.0", &["I"])
			.with_package("I", "1.0", &[])
	}
}

/// Writes `catalog` as JSON to a new temporary file.
/// # Errors
/// IO and serialization errors from writing the file.
pub fn write_catalog(catalog: &ManifestCatalog) -> pkgdep::Result<tempfile::NamedTempFile> {
	let file = tempfile::NamedTempFile::new()?;
	serde_json::to_writer_pretty(file.as_file(), catalog)?;
	Ok(file)
}
