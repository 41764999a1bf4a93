use pkgdep::{Dependency, DependencyGraph};
use pkgdep_test_utils::{scenarios, FakeCatalog};

fn init_log() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn resolve(catalog: &FakeCatalog) -> (bool, Vec<String>) {
	let mut graph = DependencyGraph::new(Dependency::package("root"), |d: &Dependency| catalog.dependencies(d));
	graph.build_graph().unwrap();
	(graph.has_loop(), graph.installation_order().into_iter().map(|d| d.id).collect())
}

#[test]
fn resolve_needs_to_install_b_first() {
	init_log();
	let (has_loop, order) = resolve(&scenarios::needs_to_install_b_first());
	assert!(!has_loop);
	assert_eq!(order, vec!["C", "B", "root"]);
}

#[test]
fn resolve_dependency_already_in_stack_but_no_loop() {
	init_log();
	let (has_loop, order) = resolve(&scenarios::dependency_already_in_stack_but_no_loop());
	assert!(!has_loop);
	assert_eq!(order, vec!["F", "C", "root"]);
}

#[test]
fn resolve_easy_to_see_loop() {
	init_log();
	let (has_loop, order) = resolve(&scenarios::easy_to_see_loop());
	assert!(has_loop);
	assert_eq!(order, vec!["D", "root"]);
}

#[test]
fn resolve_loop_below_root() {
	init_log();
	let (has_loop, order) = resolve(&scenarios::loop_below_root());
	assert!(has_loop);
	assert_eq!(order, vec!["G", "H", "B", "C", "root"]);
}

#[test]
fn resolve_path_between_branches_but_no_loop() {
	init_log();
	let (has_loop, order) = resolve(&scenarios::path_between_branches_but_no_loop());
	assert!(!has_loop);
	assert_eq!(order, vec!["I", "H", "G", "B", "C", "root"]);
}

#[test]
fn resolve_unreachable_source_fails() {
	init_log();
	let catalog = scenarios::needs_to_install_b_first().with_unreachable("C");
	let mut graph = DependencyGraph::new(Dependency::package("root"), |d: &Dependency| catalog.dependencies(d));
	assert!(matches!(graph.build_graph(), Err(pkgdep::Error::Source(_))));
}
