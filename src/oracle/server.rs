//! Reference `POST /ai-move` service backed by a [`StrategyPolicy`]: trained
//! decisions where the table has them, the heuristic everywhere else.

use super::{OracleRequest, OracleResponse, Snapshot, StrategyPolicy};
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Register the oracle routes on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ai-move", web::post().to(ai_move)).route("/health", web::get().to(health));
}

async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// 400 when the body is not a snapshot at all, 422 when it is one but
/// describes an impossible or finished hand.
async fn ai_move(policy: web::Data<StrategyPolicy>, body: web::Bytes) -> HttpResponse {
    let request: OracleRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            debug!(error = %e, "unparseable oracle request");
            return HttpResponse::BadRequest().json(ErrorBody { error: e.to_string() });
        }
    };
    let snapshot = match Snapshot::try_from(&request) {
        Ok(snap) => snap,
        Err(e) => {
            warn!(error = %e, "rejected oracle snapshot");
            return HttpResponse::UnprocessableEntity().json(ErrorBody { error: e.to_string() });
        }
    };
    let mv = policy.choose(&snapshot);
    debug!(stage = ?snapshot.stage, to_call = snapshot.to_call, ?mv, "oracle move");
    HttpResponse::Ok().json(OracleResponse::from(mv))
}

#[rustfmt::skip]
pub async fn run(bind: &str, policy: StrategyPolicy) -> std::io::Result<()> {
    let policy = web::Data::new(policy);
    info!(%bind, "starting oracle server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(policy.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::game::{Actor, HandSetup, HandState};
    use crate::oracle::policy::PolicyProfile;
    use crate::oracle::HeuristicPolicy;
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn app_policy() -> web::Data<StrategyPolicy> {
        let fallback = HeuristicPolicy::with_seed(PolicyProfile::default(), 1);
        web::Data::new(StrategyPolicy::heuristic(fallback))
    }

    fn live_request() -> OracleRequest {
        let state = HandState::start(&HandSetup::heads_up(1000), Deck::shuffled_seeded(4)).unwrap();
        OracleRequest::from_state(&state, Actor::Ai)
    }

    #[actix_web::test]
    async fn answers_a_live_snapshot() {
        let app = test::init_service(App::new().app_data(app_policy()).configure(configure)).await;
        let req = test::TestRequest::post().uri("/ai-move").set_json(live_request()).to_request();
        let resp: OracleResponse = test::call_and_read_body_json(&app, req).await;
        assert!(resp.parse_move().is_ok());
    }

    #[actix_web::test]
    async fn garbage_body_is_bad_request() {
        let app = test::init_service(App::new().app_data(app_policy()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/ai-move")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn finished_hand_is_unprocessable() {
        let app = test::init_service(App::new().app_data(app_policy()).configure(configure)).await;
        let mut body = live_request();
        body.terminal = true;
        let req = test::TestRequest::post().uri("/ai-move").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn health_is_ok() {
        let app = test::init_service(App::new().app_data(app_policy()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
