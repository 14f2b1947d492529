use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use holdem_trainer::deck::Deck;
use holdem_trainer::game::{Actor, HandSetup, HandState};
use holdem_trainer::oracle::policy::{HeuristicPolicy, PolicyProfile};
use holdem_trainer::oracle::{server, MoveCode, OracleRequest, OracleResponse, Snapshot, StrategyPolicy};
use holdem_trainer::solver::{Edge, StrategyTable};
use serde_json::json;

fn fallback() -> HeuristicPolicy {
    HeuristicPolicy::with_seed(PolicyProfile::default(), 12)
}

fn policy() -> web::Data<StrategyPolicy> {
    web::Data::new(StrategyPolicy::heuristic(fallback()))
}

fn flop_request() -> OracleRequest {
    let state = HandState::start(&HandSetup::heads_up(800), Deck::shuffled_seeded(31)).unwrap();
    let state = state.check(Actor::Ai).unwrap().place_bet(Actor::Player, 30).unwrap();
    let state = state.call_bet(Actor::Ai).unwrap();
    OracleRequest::from_state(&state, Actor::Ai)
}

async fn status_for(body: serde_json::Value) -> StatusCode {
    let app = test::init_service(App::new().app_data(policy()).configure(server::configure)).await;
    let req = test::TestRequest::post().uri("/ai-move").set_json(body).to_request();
    test::call_service(&app, req).await.status()
}

#[actix_web::test]
async fn minimal_original_style_body_is_accepted() {
    // the same fields the solver backend reads; no stacks
    let body = json!({
        "deck": (10u8..48).collect::<Vec<_>>(),
        "board": [],
        "hole_cards": [[0, 1], [2, 3]],
        "player": 1,
        "dealer": 0,
        "stage": 0,
        "pot": 2,
        "to_call": 0,
        "checked": false,
        "history": "",
    });
    assert_eq!(status_for(body).await, StatusCode::OK);
}

#[actix_web::test]
async fn move_is_returned_as_json() {
    let app = test::init_service(App::new().app_data(policy()).configure(server::configure)).await;
    let req = test::TestRequest::post().uri("/ai-move").set_json(flop_request()).to_request();
    let resp: OracleResponse = test::call_and_read_body_json(&app, req).await;
    assert!(resp.parse_move().is_ok());
}

#[actix_web::test]
async fn missing_fields_are_a_bad_request() {
    assert_eq!(status_for(json!({"deck": []})).await, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn impossible_snapshots_are_unprocessable() {
    let mut dup = flop_request();
    dup.hole_cards[0] = dup.hole_cards[1].clone();
    assert_eq!(status_for(serde_json::to_value(dup).unwrap()).await, StatusCode::UNPROCESSABLE_ENTITY);

    let mut seat = flop_request();
    seat.dealer = 3;
    assert_eq!(status_for(serde_json::to_value(seat).unwrap()).await, StatusCode::UNPROCESSABLE_ENTITY);

    let mut code = flop_request();
    code.board[0] = 52;
    assert_eq!(status_for(serde_json::to_value(code).unwrap()).await, StatusCode::UNPROCESSABLE_ENTITY);

    let mut short = flop_request();
    short.board.pop();
    assert_eq!(status_for(serde_json::to_value(short).unwrap()).await, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn overflowing_chip_counts_are_unprocessable() {
    let mut req = flop_request();
    req.pot = u64::MAX;
    req.to_call = 1;
    assert_eq!(status_for(serde_json::to_value(req).unwrap()).await, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn trained_info_sets_answer_from_the_table() {
    let req = flop_request();
    let key = Snapshot::try_from(&req).unwrap().info_key();
    let mut table = StrategyTable::default();
    table.insert(key, &[(Edge::Call, 0.0), (Edge::Raise, 1.0)]);
    let policy = web::Data::new(StrategyPolicy::with_seed(table, fallback(), 5));

    let app = test::init_service(App::new().app_data(policy).configure(server::configure)).await;
    let http = test::TestRequest::post().uri("/ai-move").set_json(&req).to_request();
    let resp: OracleResponse = test::call_and_read_body_json(&app, http).await;
    assert_eq!(resp.mv, MoveCode::Name("bet".into()));
    assert_eq!(resp.amount, Some(req.pot));
}
