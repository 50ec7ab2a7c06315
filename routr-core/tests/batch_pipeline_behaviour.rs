//! Behavioural tests for [`BatchPipeline`] driven by a scripted client.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use routr_core::test_support::{CountingThrottle, StubRoutingClient};
use routr_core::{
    BatchPipeline, Distance, InputRow, OutputRow, RoutingError, TransportError,
};
use serde_json::json;
use std::cell::RefCell;

/// Result cell holding the outcome of a batch run.
type ResultCell = RefCell<Option<Result<Vec<OutputRow>, RoutingError>>>;

#[fixture]
fn rows() -> RefCell<Vec<InputRow>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn client() -> StubRoutingClient {
    StubRoutingClient::default()
}

#[fixture]
fn result() -> ResultCell {
    RefCell::new(None)
}

fn row(origin: (&str, &str), dest: (&str, &str)) -> InputRow {
    InputRow {
        origin_long: origin.0.to_owned(),
        origin_lat: origin.1.to_owned(),
        dest_long: dest.0.to_owned(),
        dest_lat: dest.1.to_owned(),
    }
}

// --- Given steps ---

#[given("three rows with two distinct origins")]
fn three_rows(#[from(rows)] rows: &RefCell<Vec<InputRow>>) {
    *rows.borrow_mut() = vec![
        row(("10", "20"), ("11", "21")),
        row(("30", "40"), ("31", "41")),
        row(("10", "20"), ("12", "22")),
    ];
}

#[given("a routing service returning a distance of 1000 for every request")]
fn service_ok(#[from(client)] client: &StubRoutingClient) {
    for _ in 0..3 {
        client.push_response(json!({"code": "Ok", "routes": [{"distance": 1000}]}));
    }
}

#[given("a routing service returning an error code for every request")]
fn service_error_code(#[from(client)] client: &StubRoutingClient) {
    for _ in 0..3 {
        client.push_response(json!({"code": "NoRoute", "message": "Impossible route"}));
    }
}

#[given("a routing service that is unreachable")]
fn service_unreachable(#[from(client)] client: &StubRoutingClient) {
    client.push_error(TransportError::Network {
        url: "http://localhost:5000/route/v1/car/10,20;11,21.json".to_owned(),
        message: "connection refused".to_owned(),
    });
}

// --- When steps ---

#[when("I run the batch")]
fn run_batch(
    #[from(rows)] rows: &RefCell<Vec<InputRow>>,
    #[from(client)] client: &StubRoutingClient,
    #[from(result)] result: &ResultCell,
) {
    let throttle = CountingThrottle::default();
    let pipeline = BatchPipeline::new(client).with_throttle(&throttle);
    *result.borrow_mut() = Some(pipeline.run(rows.borrow().clone()));
}

// --- Then steps ---

#[then("three rows are returned in two contiguous origin blocks")]
fn then_blocks(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    let output = borrowed
        .as_ref()
        .expect("batch must have run")
        .as_ref()
        .expect("expected Ok result");
    let origins: Vec<_> = output.iter().map(|r| r.origin_long.as_str()).collect();
    assert_eq!(origins, ["10", "10", "30"]);
    let destinations: Vec<_> = output.iter().map(|r| r.dest_long.as_str()).collect();
    assert_eq!(destinations, ["11", "12", "31"]);
}

#[then("every distance is 10.0")]
fn then_ten(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    let output = borrowed
        .as_ref()
        .expect("batch must have run")
        .as_ref()
        .expect("expected Ok result");
    assert!(output.iter().all(|r| r.distance == Distance::Metres(10.0)));
}

#[then("every distance is unknown")]
fn then_unknown(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    let output = borrowed
        .as_ref()
        .expect("batch must have run")
        .as_ref()
        .expect("expected Ok result");
    assert!(output.iter().all(|r| r.distance == Distance::Unknown));
}

#[then("the batch fails with a transport error")]
fn then_transport_error(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(
            &*borrowed,
            Some(Err(RoutingError::Transport(TransportError::Network { .. })))
        ),
        "expected a transport error, got {borrowed:?}"
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/batch_pipeline.feature", name = $title)]
        fn $fn_name(rows: RefCell<Vec<InputRow>>, client: StubRoutingClient, result: ResultCell) {
            let _ = (rows, client, result);
        }
    };
}

register_scenario!(
    grouping_destinations,
    "grouping destinations that share an origin"
);
register_scenario!(degrading_unusable_responses, "degrading unusable responses");
register_scenario!(aborting_on_transport_failure, "aborting on a transport failure");
