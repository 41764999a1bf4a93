pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::PlannerOptions;

pub mod version;
pub use version::Version;
pub use version::VersionRange;

pub mod dependency;
pub use dependency::Dependency;
pub use dependency::DependencyKind;
pub use dependency::DependencyList;

pub mod dependency_graph;
pub use dependency_graph::DependencyGraph;

pub mod planner;
