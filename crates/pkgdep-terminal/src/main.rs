use pkgdep::planner::{InstallPlan, InstallPlanner, ManifestCatalog};
use pkgdep::{Dependency, PlannerOptions};

fn main() {
	env_logger::init();

	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",    "Show help");
		opts.optflag( "v", "verbose", "List skipped and external dependencies");
		opts.optopt(  "c", "catalog", "Catalog of available packages", "FILE");
		opts.optopt(  "o", "options", "Planner options", "FILE");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { eprintln!("Unable to parse options: {}", e); std::process::exit(2) }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: pkgdep-terminal [options] <package> [min-version]"));
			return;
		}

		parsed_options
	};

	match run(&parsed_options) {
		Ok(plan) => print_plan(&plan, parsed_options.opt_present("v")),
		Err(e) => {
			log::error!("{}", e);
			eprintln!("{}", e);
			std::process::exit(1);
		}
	}
}

fn run(parsed_options: &getopts::Matches) -> Result<InstallPlan, Error> {
	let catalog_path = parsed_options.opt_str("c").ok_or(Error::MissingArgument("--catalog"))?;
	let catalog = ManifestCatalog::load_from_path(catalog_path)?;

	let options = match parsed_options.opt_str("o") {
		Some(path) => PlannerOptions::load_from_path(path)?,
		None => PlannerOptions::default(),
	};

	let request = request_from_args(&parsed_options.free)?;
	log::info!("planning install of {}", request);

	Ok(InstallPlanner::new(&catalog, options).plan(&request)?)
}

fn request_from_args(free: &[String]) -> Result<Dependency, Error> {
	let id = free.first().ok_or(Error::MissingArgument("package"))?;
	let mut request = Dependency::package(id.as_str());
	if let Some(min) = free.get(1) {
		request = request.with_min_version(min.as_str());
	}
	Ok(request)
}

fn print_plan(plan: &InstallPlan, verbose: bool) {
	for package in &plan.packages {
		println!("{}", package);
	}
	if verbose {
		for d in &plan.skipped {
			println!("skipped: {}", d);
		}
		for d in &plan.external_dependencies {
			println!("external: {:?} {}", d.kind, d);
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("pkgdep error: {0}")]
	Pkgdep(#[from] pkgdep::Error),
	#[error("Missing argument {0}")]
	MissingArgument(&'static str),
}

#[cfg(test)]
mod test {
	use super::*;

	fn matches(args: &[&str]) -> getopts::Matches {
		let mut opts = getopts::Options::new();
		opts.optflag("v", "verbose", "");
		opts.optopt("c", "catalog", "", "FILE");
		opts.optopt("o", "options", "", "FILE");
		opts.parse(args).unwrap()
	}

	#[test]
	fn request_with_min_version() {
		let request = request_from_args(&["App".to_string(), "1.2".to_string()]).unwrap();
		assert_eq!(request.id, "App");
		assert_eq!(request.min_version, Some(pkgdep::Version::new("1.2")));
	}

	#[test]
	fn request_missing_package() {
		assert!(matches!(request_from_args(&[]), Err(Error::MissingArgument("package"))));
	}

	#[test]
	fn run_missing_catalog() {
		assert!(matches!(run(&matches(&["App"])), Err(Error::MissingArgument("--catalog"))));
	}

	#[test]
	fn run_plans_from_catalog() {
		let catalog = pkgdep_test_utils::scenarios::needs_to_install_b_first().to_manifest_catalog();
		let file = pkgdep_test_utils::write_catalog(&catalog).unwrap();
		let path = file.path().to_string_lossy().to_string();
		let plan = run(&matches(&["-c", path.as_str(), "root"])).unwrap();
		let lines: Vec<_> = plan.packages.iter().map(|p| p.to_string()).collect();
		assert_eq!(lines, vec!["C 1.0", "B 1.0", "root 1.0"]);
	}
}
