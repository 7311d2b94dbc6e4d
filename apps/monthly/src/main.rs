use std::path::PathBuf;

use runtime::PipelineConfig;

const USAGE: &str = "usage: monthly [--config <pipeline.yaml>] [input_csv] [output_dir]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let mut config_path = std::env::var("MONTHLY_CONFIG").ok().map(PathBuf::from);
	let mut positional = Vec::new();

	let mut args = std::env::args().skip(1);
	while let Some(arg) = args.next() {
		match arg.as_str() {
			"-c" | "--config" => {
				let Some(path) = args.next() else {
					eprintln!("{USAGE}");
					std::process::exit(2);
				};
				config_path = Some(PathBuf::from(path));
			}
			"-h" | "--help" => {
				println!("{USAGE}");
				return Ok(());
			}
			_ => positional.push(arg),
		}
	}
	if positional.len() > 2 {
		eprintln!("{USAGE}");
		std::process::exit(2);
	}

	let mut config = match &config_path {
		Some(path) => PipelineConfig::from_yaml_file(path)?,
		None => PipelineConfig::default(),
	};
	if let Some(input) = positional.first() {
		config.input = PathBuf::from(input);
	}
	if let Some(output_dir) = positional.get(1) {
		config.output_dir = PathBuf::from(output_dir);
	}

	runtime::init(&config);
	let report = runtime::run(&config)?;

	if let Some((ticker, err)) = report.first_failure() {
		eprintln!("{ticker}: {err}");
		std::process::exit(1);
	}
	println!("Data processing complete.");
	Ok(())
}
