use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use droplet_sim_core::{
    simulate, Celsius, LookupRule, Meters, MetersPerSecond, Phase, RunOutcome, RunSummary,
    Seconds, SimulationConfig, SimulationError, SimulationRun, UninitializedEfficiencyPolicy,
};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Single-droplet cloud microphysics demo
#[derive(Parser, Debug)]
#[command(name = "droplet-demo")]
#[command(about = "Trace a droplet through a convective cloud to the ground", long_about = None)]
struct Args {
    /// Starting constants
    #[arg(short, long, value_enum, default_value_t = Preset::Reference)]
    preset: Preset,

    /// JSON file overriding preset values (missing fields keep the preset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Efficiency table comparison rule
    #[arg(long, value_enum)]
    lookup: Option<Lookup>,

    /// Halt instead of using zero growth before the first efficiency row is active
    #[arg(long)]
    halt_on_uninitialized: bool,

    /// Updraft speed in m/s
    #[arg(short, long)]
    updraft: Option<f64>,

    /// Initial droplet radius in µm
    #[arg(short, long)]
    radius: Option<f64>,

    /// Liquid water content in kg/m³
    #[arg(long)]
    liquid_water_content: Option<f64>,

    /// Density of liquid water in kg/m³
    #[arg(long)]
    liquid_density: Option<f64>,

    /// Coalescence efficiency (0-1)
    #[arg(long)]
    coalescence: Option<f64>,

    /// Cloud base height in m
    #[arg(long)]
    cloud_base: Option<f64>,

    /// Cloud depth in m
    #[arg(long)]
    cloud_depth: Option<f64>,

    /// Release height above cloud base in m
    #[arg(long)]
    offset: Option<f64>,

    /// In-cloud height step in m
    #[arg(long)]
    dz: Option<f64>,

    /// Below-cloud time step in s
    #[arg(long)]
    dt: Option<f64>,

    /// Diffusivity of the below-cloud growth law in m²/s
    #[arg(long)]
    diffusivity: Option<f64>,

    /// Cloud base temperature in °C
    #[arg(short, long)]
    temperature: Option<f64>,

    /// Temperature lapse rate in K/m
    #[arg(long)]
    lapse_rate: Option<f64>,

    /// Maximum number of recorded samples
    #[arg(long)]
    max_steps: Option<usize>,

    /// Print this many evenly spaced samples of the trajectory
    #[arg(long, default_value_t = 0)]
    profile: usize,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Enable debug logging (otherwise RUST_LOG, defaulting to info)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Case-study constants with the upper-bound efficiency lookup
    Reference,
    /// Case-study constants with the threshold efficiency lookup
    Strict,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Lookup {
    Threshold,
    UpperBound,
}

impl From<Lookup> for LookupRule {
    fn from(lookup: Lookup) -> Self {
        match lookup {
            Lookup::Threshold => LookupRule::Threshold,
            Lookup::UpperBound => LookupRule::UpperBound,
        }
    }
}

const RULE: &str = "-----------------------------------------------------";

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&args)?;
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("=== Droplet Microphysics Demo ===\n");
    println!(
        "Cloud: base {:.0}, top {:.0}, updraft {:.2}",
        config.cloud_base,
        config.cloud_top(),
        config.updraft_speed
    );
    println!(
        "Droplet: {:.1} µm released at {:.0}, dz = {}, dt = {}",
        config.initial_radius.as_micrometres(),
        config.start_height(),
        config.height_step,
        config.time_step
    );
    println!(
        "Lookup: {:?}, before first row: {:?}\n",
        config.lookup_rule, config.uninitialized_efficiency
    );

    let run = simulate(&config)?;
    let summary = run.summary();
    info!("Recorded {} samples", summary.samples);

    print_report(&run, &summary);
    if args.profile > 0 {
        print_profile(&run, args.profile);
    }

    Ok(())
}

/// Preset, then JSON file, then individual flags
fn resolve_config(args: &Args) -> Result<SimulationConfig, Box<dyn Error>> {
    let preset = match args.preset {
        Preset::Reference => SimulationConfig::reference(),
        Preset::Strict => SimulationConfig::default(),
    };

    let mut config = match &args.config {
        Some(path) => {
            debug!("Reading configuration from {}", path.display());
            let text = fs::read_to_string(path)?;
            let overlay: Value = serde_json::from_str(&text)?;
            let mut base = serde_json::to_value(&preset)?;
            merge(&mut base, overlay);
            serde_json::from_value(base)?
        }
        None => preset,
    };

    if let Some(lookup) = args.lookup {
        config.lookup_rule = lookup.into();
    }
    if args.halt_on_uninitialized {
        config.uninitialized_efficiency = UninitializedEfficiencyPolicy::Halt;
    }
    if let Some(v) = args.updraft {
        config.updraft_speed = MetersPerSecond::new(v);
    }
    if let Some(v) = args.radius {
        config.initial_radius = Meters::from_micrometres(v);
    }
    if let Some(v) = args.liquid_water_content {
        config.liquid_water_content = v;
    }
    if let Some(v) = args.liquid_density {
        config.liquid_density = v;
    }
    if let Some(v) = args.coalescence {
        config.coalescence_efficiency = v;
    }
    if let Some(v) = args.cloud_base {
        config.cloud_base = Meters::new(v);
    }
    if let Some(v) = args.cloud_depth {
        config.cloud_depth = Meters::new(v);
    }
    if let Some(v) = args.offset {
        config.initial_offset = Meters::new(v);
    }
    if let Some(v) = args.dz {
        config.height_step = Meters::new(v);
    }
    if let Some(v) = args.dt {
        config.time_step = Seconds::new(v);
    }
    if let Some(v) = args.diffusivity {
        config.diffusivity = v;
    }
    if let Some(v) = args.temperature {
        config.cloud_base_temperature = Celsius::from(v.max(*Celsius::ABSOLUTE_ZERO));
    }
    if let Some(v) = args.lapse_rate {
        config.lapse_rate = v;
    }
    if let Some(v) = args.max_steps {
        config.max_steps = v;
    }

    Ok(config)
}

/// Overlay `patch` onto `base`, recursing into objects
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

fn print_report(run: &SimulationRun, summary: &RunSummary) {
    println!("Initial temperature = {:.2}", summary.initial_temperature);

    if let RunOutcome::Halted {
        phase: Phase::Ascent,
        error: SimulationError::CloudTopExceeded { height, .. },
    } = run.outcome()
    {
        println!("The droplet has exceeded the cloud!");
        println!("{:.3}", height);
    }

    if let Some(ascent) = summary.ascent {
        println!("{RULE}");
        println!("Maximum height from starting point = {:.3}", ascent.rise_from_start);
        println!("Maximum height from ground = {:.3}", ascent.max_height);
        println!("Time of ascent = {:.3} min", ascent.duration.as_minutes());
        println!(
            "Size of droplet at maximum height = {:.4} mm",
            ascent.radius_at_max_height.as_millimetres()
        );
        println!("{RULE}");
    }

    if let Some(descent) = summary.descent {
        println!("Time of descent = {:.3} min", descent.duration.as_minutes());
        println!(
            "Size of droplet at cloud base = {:.4} mm",
            descent.radius_at_cloud_base.as_millimetres()
        );
        println!("{RULE}");
        println!(
            "Total time inside cloud = {:.3} min",
            descent.total_in_cloud_time.as_minutes()
        );
        println!("{RULE}");
    }

    if let Some(fall) = summary.fall {
        println!("Time of fall = {:.3} min", fall.duration.as_minutes());
        println!(
            "Time of fall (base height / exit speed) = {:.3} min",
            fall.duration_estimate.as_minutes()
        );
        println!("Total time of rain process = {:.3} min", fall.total_time.as_minutes());
        println!("{RULE}");
        println!(
            "Size of droplet at ground = {:.4} mm",
            fall.radius_at_ground.as_millimetres()
        );
        println!(
            "Difference between the raindrop at cloud base and raindrop at ground = {:.4} microns",
            fall.size_change_from_cloud_base.as_micrometres()
        );
    }

    if summary.evaporated() {
        println!("The droplet evaporated before reaching the ground.");
    }
    println!("\nOutcome: {} ({} samples)", run.outcome(), summary.samples);
}

/// Print `count` samples spread evenly from seed to final state
fn print_profile(run: &SimulationRun, count: usize) {
    let series = run.series();
    let last = series.len().saturating_sub(1);
    let count = count.min(series.len());

    println!("\n  Time(min) |  Height(m) | Radius(mm) | Speed(m/s)");
    println!("------------|------------|------------|-----------");
    for i in 0..count {
        let index = if count == 1 { last } else { i * last / (count - 1) };
        let s = series[index];
        println!(
            "{:11.3} | {:10.2} | {:10.4} | {:10.3}",
            s.time.as_minutes(),
            *s.height,
            s.radius.as_millimetres(),
            *s.velocity
        );
    }
}
