//! REST API over the bracket engine. Mutating routes need the `X-Admin-Token` header.
//!
//! Handlers live in the library so integration tests can mount them with `configure`.

use crate::auth::{AdminCapability, AdminKey};
use crate::error::{BracketError, BracketResult};
use crate::logic::{
    assign_participants, create_tournament, generate_bracket, get_bracket_view, get_match_view,
    get_tournament, mark_live, register_participant, reset_bracket, update_score,
    withdraw_participant,
};
use crate::models::{MatchId, ParticipantId, TournamentId};
use crate::store::MemoryStore;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    HttpRequest, HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Header carrying the admin secret.
pub const ADMIN_HEADER: &str = "X-Admin-Token";

/// Shared server state: one store (single writer) and the admin key.
pub struct BracketState {
    pub store: RwLock<MemoryStore>,
    pub admin: AdminKey,
}

impl BracketState {
    pub fn new(store: MemoryStore, admin: AdminKey) -> Self {
        Self {
            store: RwLock::new(store),
            admin,
        }
    }
}

type AppState = Data<BracketState>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    participant_count: u32,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
    #[serde(default)]
    seed: Option<u32>,
}

#[derive(Deserialize)]
struct ScoreBody {
    score1: i64,
    score2: i64,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

fn error_response(e: &BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.client_message() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else if e.is_internal() {
        log::error!("Internal error: {e}");
        HttpResponse::InternalServerError().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn authorize(state: &BracketState, req: &HttpRequest) -> Result<AdminCapability, HttpResponse> {
    req.headers()
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|token| state.admin.authorize(token))
        .ok_or_else(|| {
            HttpResponse::Unauthorized()
                .json(serde_json::json!({ "error": "Admin token required" }))
        })
}

/// Flush the store after a successful mutation and render the result.
fn respond_written<T: Serialize>(store: &MemoryStore, result: BracketResult<T>) -> HttpResponse {
    match result {
        Ok(value) => match store.flush() {
            Ok(()) => HttpResponse::Ok().json(value),
            Err(e) => error_response(&BracketError::Store(e)),
        },
        Err(e) => error_response(&e),
    }
}

fn respond_read<T: Serialize>(result: BracketResult<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

/// Run `f` against the store under the write lock after checking the admin token.
/// A failed `f` leaves the store as it was before the request.
fn with_write<T, F>(state: &AppState, req: &HttpRequest, f: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&mut MemoryStore, &AdminCapability) -> BracketResult<T>,
{
    let admin = match authorize(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let mut store = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    // Roll back anything a failed operation wrote so memory matches the file.
    let before = store.clone();
    let result = f(&mut *store, &admin);
    if result.is_err() {
        *store = before;
    }
    respond_written(&*store, result)
}

fn with_read<T, F>(state: &AppState, f: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&MemoryStore) -> BracketResult<T>,
{
    match state.store.read() {
        Ok(store) => respond_read(f(&*store)),
        Err(_) => lock_error(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-tournament-web",
    })
}

/// Create a tournament in Draft.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    req: HttpRequest,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    with_write(&state, &req, |store, admin| {
        create_tournament(store, admin, &body.name, body.participant_count)
    })
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_read(&state, |store| get_tournament(store, path.id))
}

/// Register a participant (Draft or Registration).
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    with_write(&state, &req, |store, admin| {
        register_participant(store, admin, path.id, &body.name, body.seed)
    })
}

/// Remove a participant before the tournament starts.
#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_remove_participant(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentParticipantPath>,
) -> HttpResponse {
    with_write(&state, &req, |store, admin| {
        withdraw_participant(store, admin, path.id, path.participant_id)
    })
}

/// Generate the empty bracket (Draft -> Registration).
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
) -> HttpResponse {
    with_write(&state, &req, |store, admin| {
        generate_bracket(store, admin, path.id)?;
        get_bracket_view(store, path.id)
    })
}

#[get("/api/tournaments/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_read(&state, |store| get_bracket_view(store, path.id))
}

/// Seed round 1 and start the tournament (Registration -> Ongoing).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
) -> HttpResponse {
    with_write(&state, &req, |store, admin| {
        assign_participants(store, admin, path.id)?;
        get_bracket_view(store, path.id)
    })
}

/// Drop the bracket and go back to Draft (not allowed once completed).
#[post("/api/tournaments/{id}/reset")]
async fn api_reset_bracket(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
) -> HttpResponse {
    with_write(&state, &req, |store, admin| reset_bracket(store, admin, path.id))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_read(&state, |store| get_match_view(store, path.id))
}

/// Report a decisive score; advances the winner or finalizes the tournament.
#[put("/api/matches/{id}/score")]
async fn api_update_score(
    state: AppState,
    req: HttpRequest,
    path: Path<MatchPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    with_write(&state, &req, |store, admin| {
        update_score(store, admin, path.id, body.score1, body.score2)
    })
}

#[post("/api/matches/{id}/live")]
async fn api_mark_live(state: AppState, req: HttpRequest, path: Path<MatchPath>) -> HttpResponse {
    with_write(&state, &req, |store, admin| mark_live(store, admin, path.id))
}

/// Register every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_add_participant)
        .service(api_remove_participant)
        .service(api_generate_bracket)
        .service(api_get_bracket)
        .service(api_start_tournament)
        .service(api_reset_bracket)
        .service(api_get_match)
        .service(api_update_score)
        .service(api_mark_live);
}
