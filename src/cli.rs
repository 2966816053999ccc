use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub profile: Option<PathBuf>,
    pub trajectory_out: Option<PathBuf>,
    pub template_out: Option<PathBuf>,
    pub sweep_installed: Option<Vec<f64>>,
    pub json: bool,
    pub help: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: Option<u16>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                set_once(&mut opts.config, PathBuf::from(path), "--config")?;
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                set_once(&mut opts.preset, name.to_string(), "--preset")?;
            }
            "--profile" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --profile (expected a CSV file path)")?;
                set_once(&mut opts.profile, PathBuf::from(path), "--profile")?;
            }
            "--trajectory-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --trajectory-out (expected a file path)")?;
                set_once(&mut opts.trajectory_out, PathBuf::from(path), "--trajectory-out")?;
            }
            "--template-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --template-out (expected a file path)")?;
                set_once(&mut opts.template_out, PathBuf::from(path), "--template-out")?;
            }
            "--sweep-installed" => {
                i += 1;
                let list = args.next_or_err(
                    i,
                    "missing value for --sweep-installed (expected comma-separated capacities)",
                )?;
                set_once(&mut opts.sweep_installed, parse_capacity_list(list)?, "--sweep-installed")?;
            }
            "--json" => opts.json = true,
            #[cfg(feature = "api")]
            "--serve" => opts.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                set_once(&mut opts.port, port, "--port")?;
            }
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(opts)
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

fn parse_capacity_list(list: &str) -> Result<Vec<f64>, String> {
    let values = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("--sweep-installed value \"{s}\" is not a number"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err("--sweep-installed needs at least one capacity".to_string());
    }
    Ok(values)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("h2-sizing: hydrogen storage dispatch simulation and cylinder sizing");
    eprintln!();
    eprintln!("Usage: h2-sizing [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>            Load configuration from a TOML file");
    eprintln!("  --preset <name>            Use a built-in preset (baseline, pilot, single_stack)");
    eprintln!("  --profile <path>           Hourly profile CSV (overrides the configured one)");
    eprintln!("  --trajectory-out <path>    Export per-hour records to CSV");
    eprintln!("  --template-out <path>      Write the profile in its upload format");
    eprintln!("  --sweep-installed <list>   Size each comma-separated installed capacity");
    eprintln!("  --json                     Print results as JSON");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                    Start the REST API after the run");
        eprintln!("  --port <u16>               API server port (default: 3000)");
    }
    eprintln!("  --help                     Show this help message");
    eprintln!();
    eprintln!("Without --config or --preset the baseline preset is used.");
}

#[cfg(test)]
mod tests {
    use super::parse_options;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn supports_config_and_profile() {
        let opts = parse_options(&args(&["--config", "plant.toml", "--profile", "site.csv"]))
            .expect("parse should succeed");
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("plant.toml")
        );
        assert_eq!(
            opts.profile.as_deref().and_then(|p| p.to_str()),
            Some("site.csv")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn supports_preset_and_json() {
        let opts = parse_options(&args(&["--preset", "pilot", "--json"]))
            .expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("pilot"));
        assert!(opts.json);
    }

    #[test]
    fn config_and_preset_are_exclusive() {
        let err = parse_options(&args(&["--config", "a.toml", "--preset", "baseline"]));
        assert!(err.is_err());
    }

    #[test]
    fn repeated_flag_is_rejected() {
        let err = parse_options(&args(&["--profile", "a.csv", "--profile", "b.csv"]));
        assert_eq!(err.err().as_deref(), Some("--profile provided more than once"));
    }

    #[test]
    fn missing_value_is_reported() {
        let err = parse_options(&args(&["--trajectory-out"]));
        assert!(err.err().is_some_and(|e| e.contains("--trajectory-out")));
    }

    #[test]
    fn sweep_list_parses() {
        let opts = parse_options(&args(&["--sweep-installed", "5000, 11000,"]))
            .expect("parse should succeed");
        assert_eq!(opts.sweep_installed, Some(vec![5000.0, 11000.0]));
    }

    #[test]
    fn sweep_list_rejects_garbage() {
        assert!(parse_options(&args(&["--sweep-installed", "5000,big"])).is_err());
        assert!(parse_options(&args(&["--sweep-installed", ","])).is_err());
    }

    #[test]
    fn unknown_argument_is_rejected() {
        let err = parse_options(&args(&["--bogus"]));
        assert_eq!(err.err().as_deref(), Some("unknown argument: --bogus"));
    }
}
