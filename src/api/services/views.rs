//! View counter HTTP API
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | POST | `/register` | `{"url": ...}` |
//! | GET | `/view/{url_id}` | |
//! | POST | `/view` | `{"url": ...}` |
//! | GET | `/stats/{url_id}` | |
//! | POST | `/stats` | `{"url": ...}` |

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::errors::ViewCounterError;
use crate::services::{UrlStats, ViewOutcome, ViewService};
use crate::utils::client_key;

pub const MSG_REGISTERED: &str = "URL registered successfully.";
pub const MSG_VIEW_COUNTED: &str = "View counted successfully.";
pub const MSG_VIEW_NOT_COUNTED: &str = "View count not incremented (Session active)";

#[derive(Debug, Clone, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    pub message: String,
    pub views: u64,
    pub counted: bool,
}

impl From<ViewOutcome> for ViewResponse {
    fn from(outcome: ViewOutcome) -> Self {
        let message = if outcome.counted {
            MSG_VIEW_COUNTED
        } else {
            MSG_VIEW_NOT_COUNTED
        };
        Self {
            message: message.to_string(),
            views: outcome.views,
            counted: outcome.counted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub url: String,
    pub views: u64,
}

impl From<UrlStats> for StatsResponse {
    fn from(stats: UrlStats) -> Self {
        Self {
            url: stats.url,
            views: stats.views,
        }
    }
}

type HandlerResult = Result<HttpResponse, ViewCounterError>;

pub struct ViewHandlers;

impl ViewHandlers {
    pub async fn register(
        service: web::Data<Arc<ViewService>>,
        body: web::Json<UrlRequest>,
    ) -> HandlerResult {
        let id = service
            .register(&body.url)
            .await
            .inspect_err(|e| log_failure("register", e))?;

        Ok(HttpResponse::Ok().json(RegisterResponse {
            id,
            message: MSG_REGISTERED.to_string(),
        }))
    }

    pub async fn view_by_id(
        req: HttpRequest,
        service: web::Data<Arc<ViewService>>,
        path: web::Path<String>,
    ) -> HandlerResult {
        let url_id = path.into_inner();
        let client = client_key(&req);
        trace!("View request for {} from {}", url_id, client);

        let outcome = service
            .increment_view(&url_id, &client, Utc::now())
            .await
            .inspect_err(|e| log_failure("view", e))?;

        Ok(HttpResponse::Ok().json(ViewResponse::from(outcome)))
    }

    pub async fn view_by_url(
        req: HttpRequest,
        service: web::Data<Arc<ViewService>>,
        body: web::Json<UrlRequest>,
    ) -> HandlerResult {
        let client = client_key(&req);

        let outcome = service
            .increment_view_by_url(&body.url, &client, Utc::now())
            .await
            .inspect_err(|e| log_failure("view_by_url", e))?;

        Ok(HttpResponse::Ok().json(ViewResponse::from(outcome)))
    }

    pub async fn stats_by_id(
        service: web::Data<Arc<ViewService>>,
        path: web::Path<String>,
    ) -> HandlerResult {
        let stats = service
            .get_stats(&path.into_inner())
            .await
            .inspect_err(|e| log_failure("stats", e))?;

        Ok(HttpResponse::Ok().json(StatsResponse::from(stats)))
    }

    pub async fn stats_by_url(
        service: web::Data<Arc<ViewService>>,
        body: web::Json<UrlRequest>,
    ) -> HandlerResult {
        let stats = service
            .get_stats_by_url(&body.url)
            .await
            .inspect_err(|e| log_failure("stats_by_url", e))?;

        Ok(HttpResponse::Ok().json(StatsResponse::from(stats)))
    }
}

fn log_failure(operation: &str, err: &ViewCounterError) {
    if err.is_not_found() {
        debug!("{} failed: {}", operation, err);
    } else {
        error!("{} failed: {}", operation, err.format_simple());
    }
}

/// View counter 路由配置
pub fn view_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(ViewHandlers::register))
        .route("/view/{url_id}", web::get().to(ViewHandlers::view_by_id))
        .route("/view", web::post().to(ViewHandlers::view_by_url))
        .route("/stats/{url_id}", web::get().to(ViewHandlers::stats_by_id))
        .route("/stats", web::post().to(ViewHandlers::stats_by_url));
}
