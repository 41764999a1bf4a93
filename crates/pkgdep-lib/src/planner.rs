//! Turns a package request into the list of packages to install, dependencies first.
//!
//! # Usage
//! 1. Implement [`Catalog`] or load a [`ManifestCatalog`].
//! 1. Create an [`InstallPlanner`] with the catalog and [`PlannerOptions`].
//! 1. [`InstallPlanner::plan()`] with the requested package to get an [`InstallPlan`].
//!
//! Planning fails with a [`PlanError`] when the dependencies loop, when two packages
//! require versions of the same package that can't both be met, or when the catalog has no suitable version.

use std::collections::{BTreeMap, HashMap};

use crate::config::PlannerOptions;
use crate::dependency::{Dependency, DependencyList};
use crate::dependency_graph::DependencyGraph;
use crate::version::{Version, VersionAndChannel, VersionRange};

mod catalog;
pub use catalog::Catalog;
pub use catalog::ManifestCatalog;
pub use catalog::PackageManifest;

/// These errors stop the plan and should be shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
	/// The catalog has no package with this id.
	#[error("package `{0}` not found.")]
	PackageNotFound(String),
	/// No available version is inside the required range.
	#[error("no version of `{id}` within {range}.")]
	NoSuitableVersion { id: String, range: String },
	/// The packages required by the request depend on each other.
	#[error("dependency loop found while resolving `{0}`.")]
	DependencyLoop(String),
	/// Two packages require versions of the same package with no overlap.
	#[error("version requirements for `{id}` can't be met together: {}", requirements.join(", "))]
	IncompatibleVersionRequirements { id: String, requirements: Vec<String> },
	/// A chain of dependencies went deeper than [`PlannerOptions::max_dependency_depth()`].
	#[error("`{id}` is {depth} dependencies deep, past the configured maximum.")]
	DependencyDepthExceeded { id: String, depth: usize },
}

/// A package to install and the version chosen for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPackage {
	pub dependency: Dependency,
	pub version: VersionAndChannel,
}

impl std::fmt::Display for PlannedPackage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.dependency.id, self.version)
	}
}

#[derive(Debug, Clone, Default)]
pub struct InstallPlan {
	/// Packages in installation order, the request last.
	pub packages: Vec<PlannedPackage>,
	/// Dependencies already installed at a suitable version.
	pub skipped: Vec<Dependency>,
	/// Dependencies that aren't packages, left for the caller to deal with.
	pub external_dependencies: DependencyList,
}

#[derive(Debug)]
struct Requirement {
	requester: String,
	range: VersionRange,
}

#[derive(Debug, Default)]
struct PlanState {
	selected: HashMap<Dependency, PackageManifest>,
	/// Installed versions of skipped packages.
	installed: HashMap<Dependency, Version>,
	requirements: BTreeMap<Dependency, Vec<Requirement>>,
	depth: HashMap<Dependency, usize>,
	skipped: Vec<Dependency>,
	external: DependencyList,
}

impl PlanState {
	/// The version a package ends up at, selected or already installed.
	fn chosen_version(&self, dependency: &Dependency) -> Option<&Version> {
		self.selected.get(dependency).map(|m| &m.version)
			.or_else(|| self.installed.get(dependency))
	}
}

pub struct InstallPlanner<'c, C: Catalog + ?Sized> {
	catalog: &'c C,
	options: PlannerOptions,
}

impl<'c, C: Catalog + ?Sized> InstallPlanner<'c, C> {
	pub fn new(catalog: &'c C, options: PlannerOptions) -> Self {
		Self { catalog, options }
	}

	pub fn options(&self) -> &PlannerOptions {
		&self.options
	}

	/// Plans the install of `request` and everything it depends on.
	///
	/// A package is expanded with the bounds of the first package found requiring it.
	/// When the version chosen for it misses the combined requirements of every requester,
	/// the combined range is kept as a constraint and planning runs again.
	/// # Errors
	/// - [`PlanError`] for any reason the request can't be installed.
	/// - Catalog errors are passed through.
	pub fn plan(&self, request: &Dependency) -> crate::Result<InstallPlan> {
		let mut constraints = HashMap::<Dependency, VersionRange>::new();

		loop {
			let (state, order) = self.plan_pass(request, &constraints)?;

			let mut narrowed = false;
			for (dependency, requirements) in &state.requirements {
				let combined = combine_requirements(dependency, requirements)?;
				let Some(version) = state.chosen_version(dependency) else {
					continue
				};
				if combined.contains_version(version) {
					continue;
				}

				let constraint = match constraints.get(dependency) {
					Some(existing) => existing.intersection(&combined),
					None => combined,
				};
				if constraint.is_empty() {
					return Err(PlanError::IncompatibleVersionRequirements {
						id: dependency.id.clone(),
						requirements: requirement_descriptions(requirements),
					}.into());
				}
				log::debug!("`{}` {} misses {}, planning again.", dependency.id, version, constraint);
				constraints.insert(dependency.clone(), constraint);
				narrowed = true;
			}

			if !narrowed {
				return self.finish(request, state, order);
			}
		}
	}

	/// Builds the graph once, expanding packages within `constraints`.
	fn plan_pass(&self, request: &Dependency, constraints: &HashMap<Dependency, VersionRange>) -> crate::Result<(PlanState, Vec<Dependency>)> {
		let mut state = PlanState::default();

		let (has_loop, order) = {
			let mut graph = DependencyGraph::new(request.clone(), |dependency: &Dependency| self.expand(dependency, constraints, &mut state));
			graph.build_graph()?;
			(graph.has_loop(), graph.installation_order())
		};

		if has_loop {
			return Err(PlanError::DependencyLoop(request.id.clone()).into());
		}
		Ok((state, order))
	}

	fn finish(&self, request: &Dependency, state: PlanState, order: Vec<Dependency>) -> crate::Result<InstallPlan> {
		/* A request without dependencies never gets as far as ordering */
		let order = if order.is_empty() { vec![request.clone()] } else { order };

		let mut packages = Vec::with_capacity(order.len());
		for dependency in order {
			if state.skipped.contains(&dependency) {
				continue;
			}
			let manifest = state.selected.get(&dependency)
				.ok_or_else(|| crate::Error::InvalidState(format!("no manifest selected for `{}`", dependency.id)))?;
			packages.push(PlannedPackage { version: manifest.version_and_channel(), dependency });
		}

		Ok(InstallPlan {
			packages,
			skipped: state.skipped,
			external_dependencies: state.external,
		})
	}

	/// Provider for the dependency graph, selects a manifest for `dependency` and returns its dependencies.
	fn expand(&self, dependency: &Dependency, constraints: &HashMap<Dependency, VersionRange>, state: &mut PlanState) -> crate::Result<DependencyList> {
		let depth = state.depth.get(dependency).copied().unwrap_or(0);
		let requested = dependency.version_range()?;
		let range = match constraints.get(dependency) {
			Some(constraint) => {
				let range = requested.intersection(constraint);
				if range.is_empty() {
					return Err(PlanError::IncompatibleVersionRequirements {
						id: dependency.id.clone(),
						requirements: vec![format!("requested {}", requested), format!("required {}", constraint)],
					}.into());
				}
				range
			},
			None => requested,
		};
		let installed = self.catalog.installed_version(&dependency.id);

		if depth > 0 && self.options.skip_installed() {
			if let Some(installed) = &installed {
				if range.contains_version(installed) {
					log::info!("`{}` {} is already installed, skipping.", dependency.id, installed);
					state.skipped.push(dependency.clone());
					state.installed.insert(dependency.clone(), installed.clone());
					return Ok(DependencyList::new());
				}
			}
		}

		let manifest = self.select_manifest(dependency, &range)?;
		match installed {
			Some(installed) if VersionAndChannel::new(installed.clone(), manifest.channel.clone()).is_updated_by(&manifest.version_and_channel()) => {
				log::info!("`{}` will be upgraded from {} to {}.", dependency.id, installed, manifest.version);
			},
			_ => log::info!("`{}` {} selected.", dependency.id, manifest.version_and_channel()),
		}

		for d in manifest.dependencies.iter() {
			if !d.is_package() {
				state.external.add(d.clone());
				continue;
			}

			let d_depth = *state.depth.entry(d.clone()).or_insert(depth + 1);
			if d_depth > self.options.max_dependency_depth() {
				return Err(PlanError::DependencyDepthExceeded { id: d.id.clone(), depth: d_depth }.into());
			}

			state.requirements.entry(d.clone()).or_default().push(Requirement {
				requester: manifest.id.clone(),
				range: d.version_range()?,
			});
		}

		let dependencies = manifest.dependencies.clone();
		state.selected.insert(dependency.clone(), manifest);
		Ok(dependencies)
	}

	/// Picks the minimum of `range` when available, otherwise the latest version in `range`.
	///
	/// Releases in the default channel are preferred over other channels.
	fn select_manifest(&self, dependency: &Dependency, range: &VersionRange) -> crate::Result<PackageManifest> {
		let mut manifests = self.catalog.manifests(&dependency.id)?;
		if manifests.is_empty() {
			return Err(PlanError::PackageNotFound(dependency.id.clone()).into());
		}

		let min = range.min_version()?;
		if let Some(i) = manifests.iter().position(|m| &m.version == min) {
			return Ok(manifests.swap_remove(i));
		}

		manifests.sort_by_key(PackageManifest::version_and_channel);
		manifests.into_iter()
			.find(|m| range.contains_version(&m.version))
			.ok_or_else(|| PlanError::NoSuitableVersion { id: dependency.id.clone(), range: range.to_string() }.into())
	}
}

/// The versions meeting every requirement on a package.
/// # Errors
/// - `IncompatibleVersionRequirements` if any two requirements don't overlap.
fn combine_requirements(dependency: &Dependency, requirements: &[Requirement]) -> crate::Result<VersionRange> {
	let ranges: Vec<&VersionRange> = requirements.iter().map(|r| &r.range).collect();
	let disjoint = ranges.iter()
		.enumerate()
		.any(|(i, a)| ranges[i + 1..].iter().any(|b| !a.has_overlap_with(b)));

	let combined = ranges.split_first()
		.map(|(first, rest)| rest.iter().fold((*first).clone(), |acc, r| acc.intersection(r)))
		.unwrap_or_default();

	if disjoint || combined.is_empty() {
		return Err(PlanError::IncompatibleVersionRequirements {
			id: dependency.id.clone(),
			requirements: requirement_descriptions(requirements),
		}.into());
	}
	Ok(combined)
}

fn requirement_descriptions(requirements: &[Requirement]) -> Vec<String> {
	requirements.iter().map(|r| format!("`{}` requires {}", r.requester, r.range)).collect()
}
