//! Discovers every package a root package depends on and an order to install them in.
//!
//! # Usage
//! 1. Create a [`DependencyGraph`] with the root and a provider returning a package's direct dependencies.
//! 1. [`DependencyGraph::build_graph()`] to walk the provider until no new packages are found.
//! 1. Check [`DependencyGraph::has_loop()`] before trusting [`DependencyGraph::installation_order()`].
//!
//! Loops are a result of the build, not an error. The order is still complete when one is found,
//! every discovered package appears exactly once, but it can't be used as an install sequence.

use std::collections::{BTreeMap, HashSet};

use petgraph::prelude::*;

use crate::dependency::{Dependency, DependencyKind, DependencyList};

/// Returns the direct dependencies of a package.
///
/// Errors are passed through [`DependencyGraph::build_graph()`] untouched.
pub type DependencyProvider<'p, E> = Box<dyn FnMut(&Dependency) -> Result<DependencyList, E> + 'p>;

pub struct DependencyGraph<'p, E = crate::Error> {
	root: Dependency,
	root_node: NodeIndex,
	graph: StableDiGraph<Dependency, ()>,
	nodes: BTreeMap<Dependency, NodeIndex>,
	/// Work queue of packages waiting for their dependencies to be fetched. Only ever appended to.
	to_check: Vec<Dependency>,
	installation_order: Vec<NodeIndex>,
	root_dependency_evaluated: bool,
	has_loop: bool,
	provider: DependencyProvider<'p, E>,
}

impl<'p, E> DependencyGraph<'p, E> {
	pub fn new(root: Dependency, provider: impl FnMut(&Dependency) -> Result<DependencyList, E> + 'p) -> Self {
		let mut graph = StableDiGraph::default();
		let root_node = graph.add_node(root.clone());
		Self {
			nodes: BTreeMap::from([(root.clone(), root_node)]),
			root,
			root_node,
			graph,
			to_check: Vec::new(),
			installation_order: Vec::new(),
			root_dependency_evaluated: false,
			has_loop: false,
			provider: Box::new(provider),
		}
	}

	/// Creates a graph where the root's dependencies are already known.
	///
	/// The provider won't be asked for the root's dependencies.
	pub fn with_root_dependencies(root: Dependency, root_dependencies: &DependencyList, provider: impl FnMut(&Dependency) -> Result<DependencyList, E> + 'p) -> Self {
		let mut graph = Self::new(root, provider);
		graph.add_root_dependencies(root_dependencies);
		graph
	}

	/// Fetches dependencies until every discovered package has been expanded, then checks for loops.
	///
	/// Calling this again asks the provider for every known package's dependencies again.
	/// # Errors
	/// - Any error returned by the provider, the build stops at the first one.
	pub fn build_graph(&mut self) -> Result<(), E> {
		if !self.root_dependency_evaluated {
			let root = self.root.clone();
			log::trace!("fetching dependencies of root `{}`", root.id);
			let dependencies = (self.provider)(&root)?;
			self.add_root_dependencies(&dependencies);
		}

		if self.to_check.is_empty() {
			return Ok(());
		}

		/* The queue grows while we walk it so the length has to be read every iteration */
		let mut i = 0;
		while i < self.to_check.len() {
			let node = self.to_check[i].clone();
			log::trace!("fetching dependencies of `{}`", node.id);
			let dependencies = (self.provider)(&node)?;

			for dependency in dependencies.iter_kind(DependencyKind::Package) {
				if !self.has_node(dependency) {
					self.to_check.push(dependency.clone());
					self.add_node(dependency.clone());
				}
				/* May close a loop, that's for `check_for_loops_and_get_order` to find */
				self.add_adjacent(&node, dependency);
			}
			i += 1;
		}

		self.check_for_loops_and_get_order();
		Ok(())
	}

	/// `true` if the last build found a loop.
	pub fn has_loop(&self) -> bool {
		self.has_loop
	}

	/// Every discovered package with dependencies before the packages requiring them, the root last.
	///
	/// Not a valid install sequence when [`DependencyGraph::has_loop()`] is `true`.
	pub fn installation_order(&self) -> Vec<Dependency> {
		self.installation_order.iter().map(|i| self.graph[*i].clone()).collect()
	}

	pub fn root(&self) -> &Dependency {
		&self.root
	}

	pub fn has_node(&self, dependency: &Dependency) -> bool {
		self.nodes.contains_key(dependency)
	}

	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	/// The known direct dependencies of `dependency`, sorted.
	pub fn dependencies_of(&self, dependency: &Dependency) -> Vec<&Dependency> {
		self.nodes.get(dependency)
			.map(|i| self.sorted_adjacents(*i).into_iter().map(|a| &self.graph[a]).collect())
			.unwrap_or_default()
	}

	fn add_root_dependencies(&mut self, dependencies: &DependencyList) {
		for dependency in dependencies.iter_kind(DependencyKind::Package) {
			self.to_check.push(dependency.clone());
			if !self.has_node(dependency) {
				self.add_node(dependency.clone());
			}
			let root = self.root.clone();
			self.add_adjacent(&root, dependency);
		}
		self.root_dependency_evaluated = true;
	}

	/// Adds a node without edges, an existing node loses all its outgoing edges.
	fn add_node(&mut self, dependency: Dependency) -> NodeIndex {
		if let Some(&i) = self.nodes.get(&dependency) {
			for e in self.graph.edges(i).map(|e| e.id()).collect::<Vec<_>>() {
				self.graph.remove_edge(e);
			}
			i
		} else {
			let i = self.graph.add_node(dependency.clone());
			self.nodes.insert(dependency, i);
			i
		}
	}

	/// # Panics
	/// - If either node hasn't been added.
	fn add_adjacent(&mut self, from: &Dependency, to: &Dependency) {
		let a = self.nodes[from];
		let b = self.nodes[to];
		self.graph.update_edge(a, b, ());
	}

	/// Outgoing neighbours in dependency order so traversal doesn't depend on insertion order.
	fn sorted_adjacents(&self, i: NodeIndex) -> Vec<NodeIndex> {
		let mut adjacents: Vec<NodeIndex> = self.graph.neighbors(i).collect();
		adjacents.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
		adjacents
	}

	fn check_for_loops_and_get_order(&mut self) {
		self.installation_order.clear();
		self.has_loop = self.visit(self.root_node, HashSet::new());

		if self.has_loop {
			log::warn!("dependency loop found below `{}`", self.root.id);
		}
		log::debug!("installation order: {:?}", self.installation_order().iter().map(|d| d.id.as_str()).collect::<Vec<_>>());
	}

	/// Depth first walk from `node` recording nodes once their dependencies are recorded.
	///
	/// `ancestors` is owned by each call so only nodes on the current path count as a loop,
	/// reaching a node already seen down a sibling branch does not.
	/// Returns `true` if a loop was found below `node`, the walk carries on regardless.
	fn visit(&mut self, node: NodeIndex, mut ancestors: HashSet<NodeIndex>) -> bool {
		ancestors.insert(node);
		let mut has_loop = false;

		for adjacent in self.sorted_adjacents(node) {
			if ancestors.contains(&adjacent) {
				has_loop = true;
			} else if self.visit(adjacent, ancestors.clone()) {
				has_loop = true;
			}
		}

		if !self.installation_order.contains(&node) {
			self.installation_order.push(node);
		}
		has_loop
	}
}

impl<'p, E> std::fmt::Debug for DependencyGraph<'p, E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DependencyGraph")
			.field("root", &self.root)
			.field("graph", &self.graph)
			.field("to_check", &self.to_check)
			.field("root_dependency_evaluated", &self.root_dependency_evaluated)
			.field("has_loop", &self.has_loop)
			.finish_non_exhaustive()
	}
}
