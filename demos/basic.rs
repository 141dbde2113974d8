//! Basic example of planning a distribution run with the library.

use hub_allocation::allocation::DemandMap;
use hub_allocation::config::Config;
use hub_allocation::records::{FacilityRecord, StaticCoordinates};
use hub_allocation::utils::{format_bottlenecks, format_plan, format_recommendations};
use hub_allocation::SupplyChainPlanner;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // District, clinic, HC II, HC III, HC IV, hospital
    let facilities = vec![
        FacilityRecord::new("KAMPALA", 15, 30, 20, 10, 5),
        FacilityRecord::new("WAKISO", 12, 25, 15, 8, 3),
        FacilityRecord::new("MUKONO", 10, 20, 12, 5, 2),
        FacilityRecord::new("JINJA", 8, 15, 10, 4, 2),
        FacilityRecord::new("GULU", 5, 12, 8, 3, 1),
        FacilityRecord::new("KOTIDO", 1, 1, 1, 0, 0),
    ];

    let coordinates = StaticCoordinates::new()
        .with("KAMPALA", 0.3476, 32.5825)
        .with("WAKISO", 0.4044, 32.4594)
        .with("MUKONO", 0.3533, 32.7553)
        .with("JINJA", 0.4479, 33.2026)
        .with("GULU", 2.7809, 32.2995)
        .with("KOTIDO", 3.0106, 34.1126);

    let planner = SupplyChainPlanner::new(Config::new(), &facilities, &coordinates)?;
    println!("{:#?}", planner.network.summary());

    let demand = DemandMap::new()
        .with("KAMPALA", 10000)
        .with("WAKISO", 15000)
        .with("MUKONO", 5000)
        .with("JINJA", 4000)
        .with("GULU", 3000);

    let plan = planner.allocate(&demand, 5000.0, &["KAMPALA", "GULU"]);
    println!("{}", format_plan(&plan));

    println!("{}", format_bottlenecks(&planner.analyze_bottlenecks()));
    println!(
        "{}",
        format_recommendations(&planner.recommend_improvements(100_000.0))
    );

    Ok(())
}
