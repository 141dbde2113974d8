use clap::Parser;
use hub_allocation::allocation::DemandMap;
use hub_allocation::config::Config;
use hub_allocation::records::{load_coordinates, load_facilities, load_population};
use hub_allocation::utils::{format_bottlenecks, format_plan, format_recommendations, save_plan_json};
use hub_allocation::SupplyChainPlanner;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Plan supply distribution across a national -> regional -> district hub network.
#[derive(Debug, Parser)]
#[command(name = "hub-allocation", version)]
struct Args {
    /// JSON array of facility records
    #[arg(long)]
    facilities: PathBuf,

    /// JSON object mapping district to {"lat", "lon"}
    #[arg(long)]
    coordinates: PathBuf,

    /// JSON object mapping district to requested units
    #[arg(long, conflicts_with = "population")]
    demand: Option<PathBuf>,

    /// JSON array of population records, used instead of --demand
    #[arg(long, requires = "units_per_capita")]
    population: Option<PathBuf>,

    /// Units requested per person when deriving demand from population
    #[arg(long)]
    units_per_capita: Option<f64>,

    /// Distribution budget
    #[arg(long)]
    budget: f64,

    /// Districts served before all others
    #[arg(long, num_args = 1..)]
    priority: Vec<String>,

    /// Budget for network improvements
    #[arg(long, default_value_t = 0.0)]
    improvement_budget: f64,

    /// JSON configuration overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the plan as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::new(),
    };

    let facilities = load_facilities(&args.facilities)?;
    let coordinates = load_coordinates(&args.coordinates)?;
    info!(
        "loaded {} facility records and {} coordinates",
        facilities.len(),
        coordinates.len()
    );

    let demand = match (&args.demand, &args.population) {
        (Some(path), _) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        (None, Some(path)) => {
            let population = load_population(path)?;
            DemandMap::from_population(&population, args.units_per_capita.unwrap_or(0.0))
        }
        (None, None) => return Err("either --demand or --population is required".into()),
    };

    let planner = SupplyChainPlanner::new(config, &facilities, &coordinates)?;

    let plan = planner.allocate(&demand, args.budget, args.priority.as_slice());
    println!("{}", format_plan(&plan));

    let report = planner.analyze_bottlenecks();
    println!("{}", format_bottlenecks(&report));

    let recommendations = planner.recommend_improvements(args.improvement_budget);
    println!("{}", format_recommendations(&recommendations));

    if let Some(path) = &args.output {
        save_plan_json(&plan, path)?;
        info!("plan written to {}", path.display());
    }

    Ok(())
}
