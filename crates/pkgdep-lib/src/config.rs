use serde::{Serialize, Deserialize};

/// Options controlling how [`crate::planner::InstallPlanner`] walks dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
	max_dependency_depth: usize,
	skip_installed: bool,
}

impl Default for PlannerOptions {
	fn default() -> Self {
		Self {
			max_dependency_depth: 32,
			skip_installed: true,
		}
	}
}

impl PlannerOptions {
	/// Reads options from a JSON file, missing fields keep their defaults.
	pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	/// How many packages deep below the root a dependency chain may go.
	pub fn max_dependency_depth(&self) -> usize {
		self.max_dependency_depth
	}
	pub fn set_max_dependency_depth(&mut self, max_dependency_depth: usize) {
		self.max_dependency_depth = max_dependency_depth;
	}

	/// When set, installed packages meeting their requirement are left out of the plan.
	pub fn skip_installed(&self) -> bool {
		self.skip_installed
	}
	pub fn set_skip_installed(&mut self, skip_installed: bool) {
		self.skip_installed = skip_installed;
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn options_missing_fields_use_defaults() {
		let options: PlannerOptions = serde_json::from_str(r#"{ "skip_installed": false }"#).unwrap();
		assert!(!options.skip_installed());
		assert_eq!(options.max_dependency_depth(), PlannerOptions::default().max_dependency_depth());
	}

	#[test]
	fn options_load_from_path() {
		use std::io::Write;
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, r#"{{ "max_dependency_depth": 4 }}"#).unwrap();
		let options = PlannerOptions::load_from_path(file.path()).unwrap();
		assert_eq!(options.max_dependency_depth(), 4);
		assert!(options.skip_installed());
	}
}
