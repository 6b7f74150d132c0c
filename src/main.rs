use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[macro_use]
extern crate tracing;

#[macro_use]
extern crate prettytable;

use recording_route::Plan;

#[derive(Debug, Parser)]
struct MainArgs {
    /// The path to the plan file to load
    #[clap(long, short)]
    plan: PathBuf,

    /// Leave the recording action sequence exactly as the plan states it
    #[clap(long)]
    no_repair: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = MainArgs::parse();

    debug!("reading plan from {:?}", &args.plan);
    let text = std::fs::read_to_string(&args.plan).context("failed to read plan file")?;
    let plan: Plan = serde_json::from_str(&text).context("failed to parse plan file")?;

    let mut route = plan.build().context("failed to build route")?;
    if !args.no_repair {
        route.fix_actions();
    }

    let mut table = prettytable::Table::new();
    table.add_row(row![
        "#", "latitude", "longitude", "height", "travel", "hold", "pitch", "bearing", "action"
    ]);
    for (index, waypoint) in route.route_points().enumerate() {
        table.add_row(row![
            index,
            format!("{:.6}", waypoint.latitude()),
            format!("{:.6}", waypoint.longitude()),
            format!("{:.1} m", waypoint.height()),
            format!("{:.1} s", waypoint.travel_time()),
            format!("{:.1} s", waypoint.active_time()),
            format!("{:.1} deg", waypoint.pitch()),
            format!("{:.1} deg", waypoint.bearing()),
            format!("{:?}", waypoint.action()),
        ]);
    }
    table.printstd();

    info!(
        "{} waypoints over {} techniques, {:.1} s of flight",
        route.route_points().count(),
        route.techniques().len(),
        route.total_duration()
    );

    Ok(())
}
