use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

use crate::dependency::{Dependency, DependencyList};
use crate::version::{Channel, Version, VersionAndChannel};

/// One available version of a package and what it depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
	pub id: String,
	pub version: Version,
	#[serde(default)]
	pub channel: Channel,
	#[serde(default)]
	pub dependencies: DependencyList,
}

impl PackageManifest {
	pub fn new(id: impl Into<String>, version: impl Into<Version>) -> Self {
		Self {
			id: id.into(),
			version: version.into(),
			channel: Channel::default(),
			dependencies: DependencyList::new(),
		}
	}

	pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
		self.channel = Channel::new(channel);
		self
	}

	pub fn with_dependency(mut self, dependency: Dependency) -> Self {
		self.dependencies.add(dependency);
		self
	}

	pub fn version_and_channel(&self) -> VersionAndChannel {
		VersionAndChannel::new(self.version.clone(), self.channel.clone())
	}
}

/// Where the planner looks up packages.
pub trait Catalog {
	/// Every available manifest for `id`, matched case-insensitively.
	/// # Errors
	/// Lookup failures are returned to the caller of [`super::InstallPlanner::plan()`] unchanged.
	fn manifests(&self, id: &str) -> crate::Result<Vec<PackageManifest>>;

	/// The installed version of `id`, if any.
	fn installed_version(&self, _id: &str) -> Option<Version> {
		None
	}
}

/// A catalog held in memory, usually read from a JSON file.
///
/// # Format
/// ```json
/// {
/// 	"packages": [ { "id": "App", "version": "1.0", "dependencies": [ { "kind": "Package", "id": "Lib" } ] } ],
/// 	"installed": { "Lib": "0.9" }
/// }
/// ```
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ManifestCatalog {
	#[serde(default)]
	packages: Vec<PackageManifest>,
	#[serde(default)]
	installed: BTreeMap<String, Version>,
}

impl ManifestCatalog {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		log::debug!("reading catalog from {}", path.display());
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	pub fn save_to_path(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		let file = std::fs::File::create(path)?;
		serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
		Ok(())
	}

	pub fn add_manifest(&mut self, manifest: PackageManifest) {
		self.packages.push(manifest);
	}

	pub fn set_installed(&mut self, id: impl Into<String>, version: impl Into<Version>) {
		self.installed.insert(id.into(), version.into());
	}

	pub fn packages(&self) -> &[PackageManifest] {
		&self.packages
	}
}

impl Catalog for ManifestCatalog {
	fn manifests(&self, id: &str) -> crate::Result<Vec<PackageManifest>> {
		let id = id.to_lowercase();
		Ok(self.packages.iter().filter(|m| m.id.to_lowercase() == id).cloned().collect())
	}

	fn installed_version(&self, id: &str) -> Option<Version> {
		let id = id.to_lowercase();
		self.installed.iter().find(|(k, _)| k.to_lowercase() == id).map(|(_, v)| v.clone())
	}
}
