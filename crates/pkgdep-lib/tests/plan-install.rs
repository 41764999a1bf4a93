use pkgdep::planner::{InstallPlanner, ManifestCatalog, PackageManifest, PlanError};
use pkgdep::{Dependency, DependencyKind, PlannerOptions, Version};
use pkgdep_test_utils::{scenarios, FakeCatalog};

fn init_log() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn ids(plan: &pkgdep::planner::InstallPlan) -> Vec<&str> {
	plan.packages.iter().map(|p| p.dependency.id.as_str()).collect()
}

#[test]
fn plan_orders_dependencies_first() {
	init_log();
	let catalog = scenarios::needs_to_install_b_first();
	let plan = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap();
	assert_eq!(ids(&plan), vec!["C", "B", "root"]);
}

#[test]
fn plan_rejects_loop() {
	init_log();
	let catalog = scenarios::easy_to_see_loop();
	let err = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap_err();
	assert!(matches!(err, pkgdep::Error::Plan(PlanError::DependencyLoop(_))));
}

#[test]
fn plan_skips_installed() {
	init_log();
	let catalog = scenarios::needs_to_install_b_first().with_installed("C", "1.0");
	let plan = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap();
	assert_eq!(ids(&plan), vec!["B", "root"]);
	assert_eq!(plan.skipped, vec![Dependency::package("C")]);
}

#[test]
fn plan_reinstalls_when_skipping_disabled() {
	init_log();
	let catalog = scenarios::needs_to_install_b_first().with_installed("C", "1.0");
	let mut options = PlannerOptions::default();
	options.set_skip_installed(false);
	let plan = InstallPlanner::new(&catalog, options).plan(&Dependency::package("root")).unwrap();
	assert_eq!(ids(&plan), vec!["C", "B", "root"]);
	assert!(plan.skipped.is_empty());
}

#[test]
fn plan_installed_too_old_is_upgraded() {
	init_log();
	let catalog = FakeCatalog::new()
		.with_manifest(PackageManifest::new("root", "1.0").with_dependency(Dependency::package("Lib").with_min_version("2.0")))
		.with_package("Lib", "2.0", &[])
		.with_package("Lib", "2.5", &[])
		.with_installed("Lib", "1.0");
	let plan = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap();
	assert_eq!(plan.packages[0].version.version, Version::new("2.0"));
}

#[test]
fn plan_incompatible_requirements() {
	init_log();
	let catalog = FakeCatalog::new()
		.with_package("root", "1.0", &["A", "B"])
		.with_manifest(PackageManifest::new("A", "1.0").with_dependency(Dependency::package("Lib").with_min_version("2.0")))
		.with_manifest(PackageManifest::new("B", "1.0").with_dependency(Dependency::package("Lib").with_max_version("1.5")))
		.with_package("Lib", "1.0", &[])
		.with_package("Lib", "2.0", &[]);
	let err = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap_err();
	match err {
		pkgdep::Error::Plan(PlanError::IncompatibleVersionRequirements { id, requirements }) => {
			assert_eq!(id, "Lib");
			assert_eq!(requirements.len(), 2);
		},
		e => panic!("unexpected error {e}"),
	}
}

#[test]
fn plan_no_suitable_version() {
	init_log();
	let catalog = FakeCatalog::new()
		.with_manifest(PackageManifest::new("root", "1.0").with_dependency(Dependency::package("Lib").with_min_version("3.0")))
		.with_package("Lib", "2.0", &[]);
	let err = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap_err();
	assert!(matches!(err, pkgdep::Error::Plan(PlanError::NoSuitableVersion { .. })));
}

#[test]
fn plan_depth_limit() {
	init_log();
	let catalog = scenarios::path_between_branches_but_no_loop();
	let mut options = PlannerOptions::default();
	options.set_max_dependency_depth(2);
	let err = InstallPlanner::new(&catalog, options).plan(&Dependency::package("root")).unwrap_err();
	assert!(matches!(err, pkgdep::Error::Plan(PlanError::DependencyDepthExceeded { depth: 3, .. })));
}

#[test]
fn plan_collects_external_dependencies() {
	init_log();
	let catalog = FakeCatalog::new()
		.with_manifest(PackageManifest::new("root", "1.0")
			.with_dependency(Dependency::new(DependencyKind::WindowsFeature, "NetFx3"))
			.with_dependency(Dependency::package("Lib")))
		.with_package("Lib", "1.0", &[]);
	let plan = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap();
	assert_eq!(ids(&plan), vec!["Lib", "root"]);
	assert!(plan.external_dependencies.has_any_of(DependencyKind::WindowsFeature));
}

#[test]
fn plan_from_catalog_file() {
	init_log();
	let file = pkgdep_test_utils::write_catalog(&scenarios::dependency_already_in_stack_but_no_loop().to_manifest_catalog()).unwrap();
	let catalog = ManifestCatalog::load_from_path(file.path()).unwrap();
	let plan = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("ROOT")).unwrap();
	assert_eq!(ids(&plan), vec!["F", "C", "ROOT"]);
}

#[test]
fn plan_selects_version_meeting_every_requester() {
	init_log();
	let catalog = scenarios::requesters_with_different_minimums();
	let plan = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap();
	let lines: Vec<_> = plan.packages.iter().map(|p| p.to_string()).collect();
	assert_eq!(lines, vec!["Lib 2.0", "A 1.0", "B 1.0", "root 1.0"]);
}

#[test]
fn plan_installed_version_checked_against_every_requester() {
	init_log();
	let catalog = scenarios::requesters_with_different_minimums().with_installed("Lib", "1.5");
	let plan = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap();
	assert!(plan.skipped.is_empty());
	assert_eq!(ids(&plan), vec!["Lib", "A", "B", "root"]);
	assert_eq!(plan.packages[0].version.version, Version::new("2.0"));
}

#[test]
fn plan_installed_version_meeting_every_requester_is_skipped() {
	init_log();
	let catalog = scenarios::requesters_with_different_minimums().with_installed("Lib", "2.5");
	let plan = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap();
	assert_eq!(plan.skipped, vec![Dependency::package("Lib")]);
	assert_eq!(ids(&plan), vec!["A", "B", "root"]);
}

#[test]
fn plan_installed_too_old_for_one_requester_without_newer_release() {
	init_log();
	let catalog = FakeCatalog::new()
		.with_package("root", "1.0", &["A", "B"])
		.with_manifest(PackageManifest::new("A", "1.0").with_dependency(Dependency::package("Lib").with_min_version("1.0")))
		.with_manifest(PackageManifest::new("B", "1.0").with_dependency(Dependency::package("Lib").with_min_version("2.0")))
		.with_package("Lib", "1.5", &[])
		.with_installed("Lib", "1.5");
	let err = InstallPlanner::new(&catalog, PlannerOptions::default()).plan(&Dependency::package("root")).unwrap_err();
	assert!(matches!(err, pkgdep::Error::Plan(PlanError::NoSuitableVersion { id, .. }) if id == "Lib"));
}
