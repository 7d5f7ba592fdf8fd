use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use actix_files::Files;
use actix_web::{error, middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::parser::{decode_text, parse_capacity_bytes, read_jobs};
use crate::report::{validate_roster_request, write_capacity_reports, write_roster_reports, RosterRequest, ValidateRequest};
use crate::schedule::{
    aggregate_to_matrix, assign_jobs_greedy, generate_roster, overloads, planning_horizon, validate_schedule, Conflict,
    JobAllocation, RosterPlan, UtilizationRow,
};

/// Latest utilization matrix. Job and roster runs build fresh state per request.
pub struct AppState {
    pub utilization: Mutex<Option<Vec<UtilizationRow>>>,
    pub config: PlannerConfig,
    pub admin_password: String,
}

impl AppState {
    pub fn new(config: PlannerConfig, admin_password: String) -> Self {
        Self {
            utilization: Mutex::new(None),
            config,
            admin_password,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Serialize)]
pub struct CapacityResponse {
    success: bool,
    rows: usize,
    overloads: usize,
    files: Vec<PathBuf>,
}

#[derive(Serialize)]
pub struct JobsResponse {
    success: bool,
    #[serde(flatten)]
    allocation: JobAllocation,
    files: Vec<PathBuf>,
}

#[derive(Serialize)]
pub struct RosterResponse {
    success: bool,
    unfilled: usize,
    #[serde(flatten)]
    plan: RosterPlan,
    conflicts: Vec<Conflict>,
    files: Vec<PathBuf>,
}

fn is_admin(req: &HttpRequest, state: &AppState) -> bool {
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    password == state.admin_password
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"}))
}

fn bad_request(err: impl Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": err.to_string()}))
}

fn state_error<T>(_: PoisonError<T>) -> error::Error {
    error::ErrorInternalServerError("application state unavailable")
}

fn report_error(err: impl Display) -> error::Error {
    warn!(error = %err, "report export failed");
    error::ErrorInternalServerError(format!("Failed to write reports: {}", err))
}

async fn admin_login(req: web::Json<LoginRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    if req.password == state.admin_password {
        Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
    } else {
        Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Invalid password"})))
    }
}

// Capacity table upload; replaces the current utilization matrix
async fn upload_capacity(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }
    let config = &state.config;

    let table = match parse_capacity_bytes(&body, config.capacity_delimiter_byte(), &config.area_catalog()) {
        Ok(table) => table,
        Err(e) => return Ok(bad_request(format!("Failed to process capacity table: {}", e))),
    };
    let matrix = aggregate_to_matrix(&table.capacities, &table.demands);
    let files = write_capacity_reports(&config.output_dir, &matrix, None, config.table_delimiter_byte())
        .map_err(report_error)?;

    let response = CapacityResponse {
        success: true,
        rows: matrix.len(),
        overloads: overloads(&matrix).len(),
        files: files.written,
    };
    info!(rows = response.rows, overloads = response.overloads, "utilization matrix replaced");
    *state.utilization.lock().map_err(state_error)? = Some(matrix);

    Ok(HttpResponse::Ok().json(response))
}

async fn get_utilization(state: web::Data<AppState>) -> Result<HttpResponse> {
    let utilization = state.utilization.lock().map_err(state_error)?;
    match *utilization {
        Some(ref matrix) => Ok(HttpResponse::Ok().json(matrix)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No capacity table loaded"}))),
    }
}

async fn get_overloads(state: web::Data<AppState>) -> Result<HttpResponse> {
    let utilization = state.utilization.lock().map_err(state_error)?;
    match *utilization {
        Some(ref matrix) => Ok(HttpResponse::Ok().json(overloads(matrix))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No capacity table loaded"}))),
    }
}

// Job list upload; allocates against a fresh pool built from the current matrix
async fn allocate_jobs(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }
    let config = &state.config;

    let matrix = match state.utilization.lock().map_err(state_error)?.clone() {
        Some(matrix) => matrix,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No capacity table loaded"})));
        }
    };

    let jobs = match read_jobs(&decode_text(&body), config.table_delimiter_byte()) {
        Ok(jobs) => jobs,
        Err(e) => return Ok(bad_request(format!("Failed to process job list: {}", e))),
    };
    let allocation = assign_jobs_greedy(&matrix, &jobs);
    let files = write_capacity_reports(&config.output_dir, &matrix, Some(&allocation), config.table_delimiter_byte())
        .map_err(report_error)?;

    Ok(HttpResponse::Ok().json(JobsResponse {
        success: true,
        allocation,
        files: files.written,
    }))
}

async fn create_roster(
    req: HttpRequest,
    body: web::Json<RosterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }
    if let Err(message) = validate_roster_request(&body) {
        return Ok(bad_request(message));
    }
    let config = &state.config;
    let rules = config.rule_set();
    let shifts = body.shifts.as_ref().unwrap_or(&config.shifts);
    let dates = planning_horizon(body.start, body.days);

    let plan = match generate_roster(&body.workers, shifts, &body.demand, &dates, &rules) {
        Ok(plan) => plan,
        Err(e) => return Ok(bad_request(e)),
    };
    let conflicts = validate_schedule(&plan.entries, rules.max_hours_per_day, rules.max_consecutive_days);
    let files = write_roster_reports(&config.output_dir, &plan, &conflicts, config.table_delimiter_byte())
        .map_err(report_error)?;

    Ok(HttpResponse::Ok().json(RosterResponse {
        success: true,
        unfilled: plan.unfilled(),
        plan,
        conflicts,
        files: files.written,
    }))
}

async fn check_roster(body: web::Json<ValidateRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let max_hours = body.max_hours_per_day.unwrap_or(state.config.max_hours_per_day);
    let max_days = body.max_consecutive_days.unwrap_or(state.config.max_consecutive_days);
    let conflicts = validate_schedule(&body.entries, max_hours, max_days);
    Ok(HttpResponse::Ok().json(conflicts))
}

/// API routes, without the report file service
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(admin_login))
        .route("/api/capacity", web::post().to(upload_capacity))
        .route("/api/utilization", web::get().to(get_utilization))
        .route("/api/overloads", web::get().to(get_overloads))
        .route("/api/jobs", web::post().to(allocate_jobs))
        .route("/api/roster", web::post().to(create_roster))
        .route("/api/roster/validate", web::post().to(check_roster));
}

pub async fn start_server(port: u16, config: PlannerConfig, admin_password: String) -> std::io::Result<()> {
    let reports_dir = config.output_dir.clone();
    std::fs::create_dir_all(&reports_dir)?;
    let app_state = web::Data::new(AppState::new(config, admin_password));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
            .service(Files::new("/reports", reports_dir.clone()).show_files_listing())
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    const CAPACITY: &str = "bodega;;6;7;8\ncapacidad;;10;10;10\ncapacidad job;;3;0;12\n";

    fn state(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let config = PlannerConfig {
            output_dir: dir.path().to_path_buf(),
            ..PlannerConfig::default()
        };
        web::Data::new(AppState::new(config, "secret".to_string()))
    }

    fn upload(uri: &str, body: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header(("X-Admin-Password", "secret"))
            .set_payload(body.to_string())
    }

    #[actix_web::test]
    async fn test_capacity_requires_password() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(&dir)).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/capacity").set_payload(CAPACITY).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_capacity_then_overloads() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(&dir)).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/utilization").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let body: Value = test::call_and_read_body_json(&app, upload("/api/capacity", CAPACITY).to_request()).await;
        assert_eq!(body["rows"], 3);
        assert_eq!(body["overloads"], 1);
        assert!(dir.path().join("ResumenHorario.csv").exists());

        let req = test::TestRequest::get().uri("/api/overloads").to_request();
        let rows: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(rows.as_array().map(Vec::len), Some(1));
        assert_eq!(rows[0]["Hour"], 8);
        assert_eq!(rows[0]["Status"], "OVERLOAD");
    }

    #[actix_web::test]
    async fn test_jobs_use_fresh_pool_each_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(&dir)).configure(routes)).await;

        let resp = test::call_service(&app, upload("/api/jobs", "area,starthour,duration,quantity\n").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        test::call_service(&app, upload("/api/capacity", CAPACITY).to_request()).await;

        let jobs = "JobID,Area,StartHour,Duration,Quantity\nJ1,bodega,6,1,7\n";
        for _ in 0..2 {
            let body: Value = test::call_and_read_body_json(&app, upload("/api/jobs", jobs).to_request()).await;
            assert_eq!(body["results"][0]["Status"], "Assigned");
            assert_eq!(body["results"][0]["AssignedTotal"], 7.0);
        }
    }

    #[actix_web::test]
    async fn test_jobs_missing_column_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(&dir)).configure(routes)).await;
        test::call_service(&app, upload("/api/capacity", CAPACITY).to_request()).await;

        let resp = test::call_service(&app, upload("/api/jobs", "Area,StartHour\nbodega,6\n").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_roster_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(&dir)).configure(routes)).await;

        let request = serde_json::json!({
            "workers": [{"name": "Ana", "areas": ["hc"], "contract_hours": 40, "availability": ["Mon", "Tue"]}],
            "demand": [{"shift_id": "M", "area": "hc", "needed": 1}],
            "start": "2025-01-06",
            "days": 2
        });
        let req = test::TestRequest::post()
            .uri("/api/roster")
            .insert_header(("X-Admin-Password", "secret"))
            .set_json(&request)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["unfilled"], 0);
        assert_eq!(body["entries"][1]["Worker"], "Ana");
        assert!(dir.path().join("Schedule.csv").exists());

        let check = serde_json::json!({"entries": body["entries"].clone(), "max_hours_per_day": 4});
        let req = test::TestRequest::post().uri("/api/roster/validate").set_json(&check).to_request();
        let conflicts: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(conflicts.as_array().map(Vec::len), Some(2));
        assert_eq!(conflicts[0]["Kind"], "DailyHoursExceeded");
    }

    #[actix_web::test]
    async fn test_roster_unknown_shift() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(&dir)).configure(routes)).await;

        let request = serde_json::json!({
            "workers": [{"name": "Ana", "contract_hours": 40, "availability": ["Mon"]}],
            "demand": [{"shift_id": "X", "area": "hc", "needed": 1}],
            "start": "2025-01-06",
            "days": 1
        });
        let req = test::TestRequest::post()
            .uri("/api/roster")
            .insert_header(("X-Admin-Password", "secret"))
            .set_json(&request)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
