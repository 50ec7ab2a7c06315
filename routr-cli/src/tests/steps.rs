//! Behaviour-driven step definitions driving the compute CLI scenarios.

use super::helpers::{INPUT_HEADER, Workspace};
use super::*;
use routr_core::test_support::{CountingThrottle, StubRoutingClient};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use std::cell::RefCell;

/// Aggregates compute scenario state behind a single world fixture.
#[derive(Debug)]
struct ComputeWorld {
    workspace: Workspace,
    source: RefCell<Option<Utf8PathBuf>>,
    client: StubRoutingClient,
    table: RefCell<Option<Result<Vec<OutputRow>, CliError>>>,
    config: RefCell<Option<Result<ComputeConfig, CliError>>>,
}

impl ComputeWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            source: RefCell::new(None),
            client: StubRoutingClient::default(),
            table: RefCell::new(None),
            config: RefCell::new(None),
        }
    }
}

#[fixture]
fn world() -> ComputeWorld {
    ComputeWorld::new()
}

#[given("an input table with two rows sharing an origin")]
fn table_sharing_origin(#[from(world)] world: &ComputeWorld) {
    let path = world.workspace.write_table(
        "rows.csv",
        &[INPUT_HEADER, "13.38,52.51,13.42,52.50", "13.38,52.51,13.45,52.49"],
    );
    world.source.replace(Some(path));
}

#[given("an input table missing the destination columns")]
fn table_without_destinations(#[from(world)] world: &ComputeWorld) {
    let path = world
        .workspace
        .write_table("rows.csv", &["origin_long,origin_lat", "13.38,52.51"]);
    world.source.replace(Some(path));
}

#[given("a routing service returning a distance of 1500 for every request")]
fn service_returns_distance(#[from(world)] world: &ComputeWorld) {
    for _ in 0..2 {
        world
            .client
            .push_response(json!({"code": "Ok", "routes": [{"distance": 1500}]}));
    }
}

#[given("no source path is configured")]
fn no_source(#[from(world)] world: &ComputeWorld) {
    world.source.replace(None);
}

#[when("I compute the distance table")]
fn compute_table(#[from(world)] world: &ComputeWorld) {
    let source = world.source.borrow().clone().expect("source table written");
    let outcome = execute_compute(&source, &world.client, CountingThrottle::default());
    world.table.replace(Some(outcome));
}

#[when("I resolve the compute configuration")]
fn resolve_configuration(#[from(world)] world: &ComputeWorld) {
    let args = ComputeArgs {
        source: world.source.borrow().clone(),
        urlbase: Some("http://localhost:5000".to_owned()),
        ..ComputeArgs::default()
    };
    world.config.replace(Some(ComputeConfig::try_from(args)));
}

#[then("the table lists both destinations with distance 15.0")]
fn table_lists_destinations(#[from(world)] world: &ComputeWorld) {
    let borrowed = world.table.borrow();
    let table = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("expected success");
    let destinations: Vec<(&str, &str, String)> = table
        .iter()
        .map(|row| {
            (
                row.dest_lat.as_str(),
                row.dest_long.as_str(),
                row.distance.to_string(),
            )
        })
        .collect();
    assert_eq!(
        destinations,
        [
            ("52.50", "13.42", "15.0".to_owned()),
            ("52.49", "13.45", "15.0".to_owned()),
        ]
    );
}

#[then("the CLI reports that the input table could not be parsed")]
fn reports_unparseable_table(#[from(world)] world: &ComputeWorld) {
    let borrowed = world.table.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::ReadSource { .. } => {}
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("no request reaches the routing service")]
fn no_requests(#[from(world)] world: &ComputeWorld) {
    assert!(world.client.requests().is_empty());
}

#[then("the CLI reports that the \"source\" argument is missing")]
fn reports_missing_source(#[from(world)] world: &ComputeWorld) {
    let borrowed = world.config.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_SOURCE),
        other => panic!("unexpected error {other:?}"),
    }
}

macro_rules! register_compute_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/compute_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ComputeWorld) {
            let _ = world;
        }
    };
}

register_compute_scenario!(computing_from_csv, "computing distances from a CSV file");
register_compute_scenario!(
    rejecting_missing_columns,
    "rejecting a table without destination columns"
);
register_compute_scenario!(rejecting_missing_source, "rejecting a missing source argument");
