use actix_web::{web, HttpResponse, Responder};
use humantime::format_duration;
use once_cell::sync::Lazy;
use chrono::Utc;
use std::{
    time::Duration,
    sync::{atomic::{AtomicI64, Ordering}, RwLock},
};
use sysinfo::System;
use serde::Serialize;
use tracing::instrument;

use crate::{constants::START_TIME, use_cases::extractors::AdminClaims, AppState};

const CACHE_SECONDS: i64 = 5;

#[derive(Serialize, Clone, Default)]
struct SystemInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
}

#[derive(Serialize, Clone, Default)]
struct DependencyStatus {
    database: String,
    storage: String,
    mail: String,
}

#[derive(Serialize, Clone, Default)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    version: String,
    memory_usage: String,
    dependencies: DependencyStatus,
    system: SystemInfo,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> = Lazy::new(||
    RwLock::new(HealthCheckResponse::default())
);

async fn dependency_status(state: &AppState) -> DependencyStatus {
    let database = match state.auth_handler.user_repo.check_connection().await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "Unavailable"
        }
    };

    let storage = match state.media_handler.store.list_objects().await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            "Unavailable"
        }
    };

    let mail = if state.notifier.is_configured() { "Configured" } else { "Not configured" };

    DependencyStatus {
        database: database.to_string(),
        storage: storage.to_string(),
        mail: mail.to_string(),
    }
}

async fn build_health_response(state: &AppState) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime_duration = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime_duration.num_seconds().max(0) as u64));

    let mut sys = System::new_all();
    sys.refresh_all();

    let system_info = SystemInfo {
        os: System::name().unwrap_or_else(|| "Unknown".to_string()),
        kernel: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
    };

    let memory_usage = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or("Unknown".to_string(), |p| format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0));

    let dependencies = dependency_status(state).await;
    let status = if dependencies.database == "OK" { "healthy" } else { "degraded" };

    HealthCheckResponse {
        status: status.to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        memory_usage,
        dependencies,
        system: system_info,
    }
}

#[instrument(skip(_claims, state))]
pub async fn admin_health_check(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> impl Responder {
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last > CACHE_SECONDS {
        let response = build_health_response(&state).await;

        if let Ok(mut cache) = CACHED_STATUS.write() {
            *cache = response.clone();
            LAST_CHECK.store(now, Ordering::Relaxed);
        }

        return HttpResponse::Ok().json(response);
    }

    let cached = CACHED_STATUS
        .read()
        .map(|response| response.clone())
        .map_err(|e| e.to_string());
    match cached {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::warn!("HealthCheck cache lock poisoned: {}", e);
            HttpResponse::Ok().json(build_health_response(&state).await)
        }
    }
}
