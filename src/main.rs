//! Sizing CLI entry point: config and profile loading, run, report, export.

mod cli;

use std::io;
use std::process;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use h2_sizing::config::SizingConfig;
use h2_sizing::io::export::export_trajectory;
use h2_sizing::profile::{self, HourlyProfile};
use h2_sizing::sim::engine::{Engine, simulate_checked};
use h2_sizing::sim::sizing::SizingResult;
use h2_sizing::sim::sweep::{grid, sweep};

use cli::CliOptions;

/// One row of a capacity sweep.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SweepRow {
    installed_capacity: f64,
    #[serde(flatten)]
    result: SizingResult,
}

fn init_tracing() {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_inputs(cli: &CliOptions) -> Result<(SizingConfig, HourlyProfile), String> {
    // --config takes priority, then --preset, then the baseline preset
    let config = if let Some(path) = &cli.config {
        SizingConfig::from_toml_file(path)
    } else {
        SizingConfig::from_preset(cli.preset.as_deref().unwrap_or("baseline"))
    }
    .map_err(|e| e.to_string())?;

    let profile = match &cli.profile {
        Some(path) => profile::load_from_path(path),
        None => config.load_profile(),
    }
    .map_err(|e| e.to_string())?;

    tracing::info!(
        hours = profile.len(),
        installed_capacity = config.dispatch.installed_capacity,
        "inputs loaded"
    );
    Ok((config, profile))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to encode JSON: {e}"))
}

fn run_sweep(
    cli: &CliOptions,
    config: &SizingConfig,
    profile: &HourlyProfile,
    capacities: &[f64],
) -> Result<(), String> {
    let configs = grid(&config.dispatch, capacities, |c, v| c.installed_capacity = v);
    let mut rows = Vec::with_capacity(configs.len());
    for (capacity, result) in capacities.iter().zip(sweep(profile, &configs)) {
        let result = result.map_err(|e| format!("installed capacity {capacity}: {e}"))?;
        rows.push(SweepRow {
            installed_capacity: *capacity,
            result,
        });
    }

    if cli.json {
        println!("{}", to_json(&rows)?);
    } else {
        println!("installed  peak_stock  cylinders  capital_cost  vented  zero_supply_days");
        for row in &rows {
            let r = &row.result;
            println!(
                "{:>9.0}  {:>10.0}  {:>9}  {:>12.2}  {:>6.0}  {:>16}",
                row.installed_capacity,
                r.peak_stock,
                r.number_of_cylinders,
                r.capital_cost,
                r.total_hydrogen_vented,
                r.zero_supply_days
            );
        }
    }
    Ok(())
}

fn run_single(
    cli: &CliOptions,
    config: &SizingConfig,
    profile: &HourlyProfile,
) -> Result<(), String> {
    let result = if let Some(path) = &cli.trajectory_out {
        config.dispatch.validate().map_err(|e| e.to_string())?;
        let mut engine = Engine::new(profile, config.dispatch);
        let records = engine.run();
        export_trajectory(&records, path)
            .map_err(|e| format!("failed to write trajectory CSV: {e}"))?;
        tracing::info!(path = %path.display(), "trajectory written");
        engine.result()
    } else {
        simulate_checked(profile, &config.dispatch).map_err(|e| e.to_string())?
    };

    if cli.json {
        println!("{}", to_json(&result)?);
    } else {
        println!("{result}");
    }
    Ok(())
}

fn run(cli: &CliOptions) -> Result<(), String> {
    let (config, profile) = load_inputs(cli)?;

    if let Some(path) = &cli.template_out {
        profile::export_profile(&profile, path)
            .map_err(|e| format!("failed to write profile template: {e}"))?;
        tracing::info!(path = %path.display(), "profile template written");
    }

    match &cli.sweep_installed {
        Some(capacities) => run_sweep(cli, &config, &profile, capacities)?,
        None => run_single(cli, &config, &profile)?,
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(h2_sizing::api::AppState::new(profile));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port.unwrap_or(3000)));
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| format!("failed to create tokio runtime: {e}"))?;
        rt.block_on(h2_sizing::api::serve(state, addr))
            .map_err(|e| format!("API server error: {e}"))?;
    }

    Ok(())
}

fn main() {
    init_tracing();

    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    if cli.help {
        cli::print_usage();
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
