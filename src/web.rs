use actix_web::{web, App, HttpServer, HttpResponse, Result, HttpRequest, middleware};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};
use crate::config::RunInputs;
use crate::display::EMPTY_DAY_PLACEHOLDER;
use crate::parser::read_roster;
use crate::schedule::{schedule, DayRules, Parent, RunOutcome, ScheduleRun};

/// Shared server state. The roster is only ever cloned into the engine,
/// so requests never touch each other's assignment history.
pub struct AppState {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub closed_days: HashSet<NaiveDate>,
    pub rules: Option<DayRules>,
    pub roster: Mutex<Vec<Parent>>,
    pub last_run: Mutex<Option<ScheduleRun>>,
    pub admin_password: String,
}

impl AppState {
    pub fn new(inputs: RunInputs, admin_password: String) -> Self {
        Self {
            start: inputs.start,
            end: inputs.end,
            closed_days: inputs.closed_days,
            rules: inputs.rules,
            roster: Mutex::new(inputs.parents),
            last_run: Mutex::new(None),
            admin_password,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("state lock poisoned"))
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub outcome: RunOutcome,
    pub days: Vec<ScheduleDay>,
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub weekday: String,
    pub parents: Vec<String>,
    pub display: String,
    pub is_empty: bool,
}

#[derive(Serialize, Deserialize)]
pub struct ParentStats {
    pub name: String,
    pub quota: u32,
    pub assigned: usize,
    pub remaining: u32,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub parents: Vec<ParentStats>,
    pub total_assignments: usize,
}

fn schedule_response(state: &AppState, run: &ScheduleRun) -> ScheduleResponse {
    let days = run
        .schedule
        .iter()
        .map(|(day, names)| ScheduleDay {
            date: *day,
            weekday: day.format("%A").to_string(),
            parents: names.clone(),
            display: if names.is_empty() {
                EMPTY_DAY_PLACEHOLDER.to_string()
            } else {
                names.join(", ")
            },
            is_empty: names.is_empty(),
        })
        .collect();

    ScheduleResponse {
        start: state.start,
        end: state.end,
        outcome: run.outcome,
        days,
    }
}

fn is_admin(req: &HttpRequest, state: &AppState) -> bool {
    req.headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|password| password == state.admin_password)
}

// Replace the roster with an uploaded CSV sheet
async fn admin_upload(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"})));
    }

    match read_roster(body.as_ref()) {
        Ok(parents) => {
            let count = parents.len();
            *lock(&state.roster)? = parents;
            *lock(&state.last_run)? = None;
            info!(parents = count, "roster replaced from upload");

            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "parents": count
            })))
        }
        Err(e) => {
            warn!(error = %e, "rejected roster upload");
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to process CSV: {}", e)
            })))
        }
    }
}

// Run the engine on a fresh copy of the roster
async fn generate(state: web::Data<AppState>) -> Result<HttpResponse> {
    let parents = lock(&state.roster)?.clone();
    let run = schedule(
        parents,
        state.start,
        state.end,
        state.rules.as_ref(),
        Some(&state.closed_days),
    );
    let response = schedule_response(&state, &run);
    *lock(&state.last_run)? = Some(run);
    Ok(HttpResponse::Ok().json(response))
}

async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let last_run = lock(&state.last_run)?;
    match last_run.as_ref() {
        Some(run) => Ok(HttpResponse::Ok().json(schedule_response(&state, run))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Schedule not available"}))),
    }
}

async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let last_run = lock(&state.last_run)?;
    let Some(run) = last_run.as_ref() else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No data available"})));
    };

    let parents = run
        .parents
        .iter()
        .map(|p| ParentStats {
            name: p.name.clone(),
            quota: p.quota,
            assigned: p.assigned.len(),
            remaining: p.remaining_quota(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(StatsResponse {
        parents,
        total_assignments: run.total_assignments(),
    }))
}

async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Registers the page and API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/upload", web::post().to(admin_upload))
        .route("/api/generate", web::post().to(generate))
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/stats", web::get().to(get_stats));
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
