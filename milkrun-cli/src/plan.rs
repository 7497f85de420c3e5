//! Plan command implementation.
//!
//! Loads stops from CSV, fetches a travel-cost matrix, solves the visiting
//! order, and (unless told otherwise) maps the order onto real roads
//! before emitting a JSON plan document.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use geo::{Coord, Distance, Haversine, Point};
use log::info;
use milkrun_core::{
    CostMatrix, CostMatrixProvider, LegSummary, MatrixError, RoadGraph, RoadNetworkError,
    RoadNetworkProvider, RouteOptimizer, Stop, StopMarker,
};
use milkrun_data::{
    HttpCostMatrixProvider, HttpCostMatrixProviderConfig, OverpassRoadNetworkProvider,
    OverpassRoadNetworkProviderConfig,
};
use milkrun_reconstruct::reconstruct;
use milkrun_solver_greedy::{GreedySolver, GreedySolverConfig};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Smallest road-network radius ever requested, in metres.
const MIN_RADIUS_M: f64 = 500.0;

/// Margin applied to the bounding-box radius so roads near the hull of the
/// stops are still covered.
const RADIUS_MARGIN: f64 = 1.25;

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser)]
#[command(
    long_about = "Plan the cheapest route through every stop in a CSV file. \
                 Travel costs come from an OSRM table service and road \
                 geometry from an Overpass instance; pass --skip-roads to \
                 emit the visiting order without road reconstruction.",
    about = "Plan a route over stops listed in a CSV file"
)]
pub(crate) struct PlanArgs {
    /// Path to a CSV file with `lat`, `lng`, and optional `name` columns.
    #[arg(value_name = "stops.csv")]
    pub(crate) stops_path: PathBuf,
    /// Base URL of the OSRM server used for the travel-cost matrix.
    #[arg(
        long,
        value_name = "url",
        default_value_t = HttpCostMatrixProviderConfig::default().base_url
    )]
    pub(crate) osrm_base_url: String,
    /// Overpass interpreter URL used for road geometry.
    #[arg(
        long,
        value_name = "url",
        default_value_t = OverpassRoadNetworkProviderConfig::default().base_url
    )]
    pub(crate) overpass_url: String,
    /// Index of the stop the route starts from.
    #[arg(long, value_name = "index", default_value_t = 0)]
    pub(crate) depot: usize,
    /// Road-network radius in metres; derived from the stop bounding box
    /// when omitted.
    #[arg(long, value_name = "metres")]
    pub(crate) radius: Option<f64>,
    /// Skip road reconstruction and emit the visiting order only.
    #[arg(long)]
    pub(crate) skip_roads: bool,
    /// Skip the 2-opt improvement pass after greedy construction.
    #[arg(long)]
    pub(crate) no_two_opt: bool,
    /// Write the plan JSON to a file instead of stdout.
    #[arg(long, value_name = "path")]
    pub(crate) output: Option<PathBuf>,
    /// Maximum number of stops accepted from the file.
    #[arg(long, value_name = "count", default_value_t = 100)]
    pub(crate) max_stops: usize,
}

/// External collaborators of the plan pipeline.
///
/// Factored out of the HTTP providers so tests can drive the pipeline with
/// in-memory fixtures.
pub(crate) trait PlanBackend {
    /// Fetch the travel-cost matrix for the stops.
    fn cost_matrix(&self, stops: &[Stop]) -> Result<CostMatrix, MatrixError>;
    /// Fetch the road network around the centre point.
    fn road_graph(&self, center: Coord<f64>, radius_m: f64)
        -> Result<RoadGraph, RoadNetworkError>;
}

struct HttpPlanBackend {
    matrix: HttpCostMatrixProvider,
    network: OverpassRoadNetworkProvider,
}

impl HttpPlanBackend {
    fn build(args: &PlanArgs) -> Result<Self, CliError> {
        let matrix = HttpCostMatrixProvider::new(args.osrm_base_url.clone()).map_err(|source| {
            CliError::BuildProvider {
                base_url: args.osrm_base_url.clone(),
                source,
            }
        })?;
        let network =
            OverpassRoadNetworkProvider::new(args.overpass_url.clone()).map_err(|source| {
                CliError::BuildProvider {
                    base_url: args.overpass_url.clone(),
                    source,
                }
            })?;
        Ok(Self { matrix, network })
    }
}

impl PlanBackend for HttpPlanBackend {
    fn cost_matrix(&self, stops: &[Stop]) -> Result<CostMatrix, MatrixError> {
        self.matrix.get_matrix(stops)
    }

    fn road_graph(
        &self,
        center: Coord<f64>,
        radius_m: f64,
    ) -> Result<RoadGraph, RoadNetworkError> {
        self.network.get_graph(center, radius_m)
    }
}

/// A stop in solved visiting order, ready for serialisation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PlannedStop {
    /// Zero-based index of the stop in the input file.
    pub(crate) index: usize,
    /// Display name from the input file, if any.
    pub(crate) name: Option<String>,
    /// Latitude in decimal degrees.
    pub(crate) lat: f64,
    /// Longitude in decimal degrees.
    pub(crate) lng: f64,
    /// Role of the stop within the route.
    pub(crate) marker: StopMarker,
}

/// Road-following geometry of the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ItineraryDocument {
    /// Polyline of `[lng, lat]` pairs following the road network.
    pub(crate) geometry: Vec<[f64; 2]>,
    /// Per-leg summaries, in visiting order.
    pub(crate) legs: Vec<LegSummary>,
    /// Road-following length of the whole route in metres.
    pub(crate) total_length_m: f64,
}

/// The emitted plan: stops in visiting order plus optional road geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PlanDocument {
    /// Stops in solved visiting order.
    pub(crate) stops: Vec<PlannedStop>,
    /// Sum of the matrix costs along the visiting order, in metres.
    pub(crate) total_cost_m: f64,
    /// Road geometry; absent when reconstruction was skipped.
    pub(crate) itinerary: Option<ItineraryDocument>,
}

pub(super) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let backend = HttpPlanBackend::build(&args)?;
    let document = execute_plan(&args, &backend)?;
    match &args.output {
        Some(path) => {
            let mut file = File::create(path).map_err(CliError::WriteOutput)?;
            write_plan(&mut file, &document)
        }
        None => write_plan(&mut std::io::stdout().lock(), &document),
    }
}

fn execute_plan(args: &PlanArgs, backend: &dyn PlanBackend) -> Result<PlanDocument, CliError> {
    let stops = load_stops(&args.stops_path, args.max_stops)?;
    plan_route(&stops, args, backend)
}

/// Solve the visiting order and, unless skipped, reconstruct it over roads.
fn plan_route(
    stops: &[Stop],
    args: &PlanArgs,
    backend: &dyn PlanBackend,
) -> Result<PlanDocument, CliError> {
    if args.depot >= stops.len() {
        return Err(CliError::DepotOutOfRange {
            depot: args.depot,
            count: stops.len(),
        });
    }

    let matrix = backend.cost_matrix(stops)?;
    let solver = GreedySolver::with_config(GreedySolverConfig {
        two_opt: !args.no_two_opt,
        ..GreedySolverConfig::default()
    });
    let solution = solver.optimize(&matrix, args.depot)?;
    info!(
        "solved {} stops, total cost {:.0} m",
        solution.len(),
        solution.total_cost()
    );

    let ordered: Vec<&Stop> = solution.order().iter().map(|&i| &stops[i]).collect();
    let planned = solution
        .order()
        .iter()
        .enumerate()
        .map(|(position, &index)| PlannedStop {
            index,
            name: stops[index].name.clone(),
            lat: stops[index].location.y,
            lng: stops[index].location.x,
            marker: StopMarker::for_position(position, stops.len()),
        })
        .collect();

    let itinerary = if args.skip_roads {
        None
    } else {
        Some(reconstruct_roads(&ordered, args, backend)?)
    };

    Ok(PlanDocument {
        stops: planned,
        total_cost_m: solution.total_cost(),
        itinerary,
    })
}

fn reconstruct_roads(
    ordered: &[&Stop],
    args: &PlanArgs,
    backend: &dyn PlanBackend,
) -> Result<ItineraryDocument, CliError> {
    let coords: Vec<Coord<f64>> = ordered.iter().map(|stop| stop.location).collect();
    let radius_m = args.radius.unwrap_or_else(|| default_radius(&coords));
    let graph = backend.road_graph(bbox_center(&coords), radius_m)?;
    info!(
        "fetched road graph with {} nodes for radius {radius_m:.0} m",
        graph.len()
    );

    let itinerary = reconstruct(&coords, &graph)?;
    Ok(ItineraryDocument {
        geometry: itinerary
            .points
            .iter()
            .map(|point| [point.x, point.y])
            .collect(),
        legs: itinerary.legs,
        total_length_m: itinerary.total_length_m,
    })
}

/// One row of the stops file.
#[derive(Debug, Deserialize)]
struct StopRecord {
    lat: f64,
    lng: f64,
    #[serde(default)]
    name: Option<String>,
}

/// Load stops from a CSV file with `lat`, `lng`, and optional `name`
/// columns.
fn load_stops(path: &Path, max_stops: usize) -> Result<Vec<Stop>, CliError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| CliError::ReadStops {
        path: path.to_path_buf(),
        source,
    })?;

    let mut stops = Vec::new();
    for (index, record) in reader.deserialize::<StopRecord>().enumerate() {
        let record = record.map_err(|source| CliError::ReadStops {
            path: path.to_path_buf(),
            source,
        })?;
        let mut stop = Stop::from_lat_lng(record.lat, record.lng).map_err(|source| {
            CliError::InvalidStop {
                path: path.to_path_buf(),
                row: index + 1,
                source,
            }
        })?;
        if let Some(name) = record.name.filter(|name| !name.is_empty()) {
            stop = stop.with_name(name);
        }
        stops.push(stop);
    }

    if stops.is_empty() {
        return Err(CliError::NoStops {
            path: path.to_path_buf(),
        });
    }
    if stops.len() > max_stops {
        return Err(CliError::TooManyStops {
            path: path.to_path_buf(),
            count: stops.len(),
            limit: max_stops,
        });
    }
    Ok(stops)
}

/// Centre of the stops' bounding box.
fn bbox_center(coords: &[Coord<f64>]) -> Coord<f64> {
    let (min, max) = bbox(coords);
    Coord {
        x: (min.x + max.x) / 2.0,
        y: (min.y + max.y) / 2.0,
    }
}

/// Radius covering every stop: half the bounding-box diagonal plus a 25%
/// margin, never below [`MIN_RADIUS_M`].
fn default_radius(coords: &[Coord<f64>]) -> f64 {
    let (min, max) = bbox(coords);
    let diagonal_m = Haversine.distance(Point::new(min.x, min.y), Point::new(max.x, max.y));
    (diagonal_m / 2.0 * RADIUS_MARGIN).max(MIN_RADIUS_M)
}

fn bbox(coords: &[Coord<f64>]) -> (Coord<f64>, Coord<f64>) {
    let mut min = Coord {
        x: f64::INFINITY,
        y: f64::INFINITY,
    };
    let mut max = Coord {
        x: f64::NEG_INFINITY,
        y: f64::NEG_INFINITY,
    };
    for coord in coords {
        min.x = min.x.min(coord.x);
        min.y = min.y.min(coord.y);
        max.x = max.x.max(coord.x);
        max.y = max.y.max(coord.y);
    }
    (min, max)
}

fn write_plan(writer: &mut dyn Write, document: &PlanDocument) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(document).map_err(CliError::SerialisePlan)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
