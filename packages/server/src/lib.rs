#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web host for the accident dashboard.
//!
//! Serves the dashboard page, the two CSV downloads, and a small JSON API.
//! Every request reloads the dataset and recomputes the views from
//! scratch; the only state kept between requests is the uploaded file.

mod handlers;
pub mod interactive;
pub mod pages;

use std::sync::{Mutex, MutexGuard, PoisonError};

use accident_dashboard_config::DashboardConfig;
use accident_dashboard_dataset::{DatasetError, Upload};
use actix_cors::Cors;
use actix_web::{App, HttpServer, error::BlockingError, middleware, web};
use thiserror::Error;

/// Largest CSV body accepted by the upload endpoint.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Errors raised while serving a request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The dataset could not be loaded or exported.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The blocking worker running the load was cancelled.
    #[error("Blocking task failed: {0}")]
    Blocking(#[from] BlockingError),
}

/// Shared application state.
pub struct AppState {
    /// Resolved configuration.
    pub config: DashboardConfig,
    /// The file picked in the upload widget, if any.
    pub upload: Mutex<Option<Upload>>,
}

impl AppState {
    /// State with no active upload.
    #[must_use]
    pub const fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            upload: Mutex::new(None),
        }
    }

    /// Locks the upload slot. A poisoned lock still holds a consistent
    /// `Option`, so it is recovered rather than propagated.
    pub fn lock_upload(&self) -> MutexGuard<'_, Option<Upload>> {
        self.upload.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registers every dashboard route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .route("/", web::get().to(handlers::dashboard))
        .route("/upload", web::post().to(handlers::upload))
        .route("/upload/clear", web::post().to(handlers::clear_upload))
        .route(
            "/download/filtered.csv",
            web::get().to(handlers::download_filtered),
        )
        .route(
            "/download/original.csv",
            web::get().to(handlers::download_original),
        )
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/dashboard", web::get().to(handlers::api_dashboard)),
        );
}

/// Starts the dashboard host.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DashboardConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let port = config.port;

    log::info!("Default dataset: {}", config.default_dataset.display());
    let state = web::Data::new(AppState::new(config));

    log::info!("Starting server on http://{bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use actix_web::{http::StatusCode, test};

    use super::*;

    const CSV: &str = "\
dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType
2023-01-01,08:00:00,A,Collision,Reckless driving,Traffic
2023-01-02,12:15:00,B,Self accident,Speeding,Traffic
2023-01-03,22:40:00,A,Collision,Drunk driving,Criminal
";

    const UPLOAD: &str = "\
dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType
2024-05-01,09:30:00,C,Collision,Speeding,Traffic
";

    fn fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "accident_dashboard_server_{}_{name}.csv",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn state(default_dataset: PathBuf) -> web::Data<AppState> {
        web::Data::new(AppState::new(DashboardConfig {
            default_dataset,
            ..DashboardConfig::default()
        }))
    }

    #[actix_web::test]
    async fn dashboard_page_renders() {
        let app = test::init_service(
            App::new()
                .app_data(state(fixture("page", CSV)))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Imus City Vehicle Accident Dashboard"));
        assert!(body.contains("incidents-by-barangay"));
    }

    #[actix_web::test]
    async fn inverted_range_shows_message_and_blocks_download() {
        let app = test::init_service(
            App::new()
                .app_data(state(fixture("range", CSV)))
                .configure(configure),
        )
        .await;

        let page = test::TestRequest::get()
            .uri("/?start=2023-01-03&end=2023-01-01")
            .to_request();
        let body = test::call_and_read_body(&app, page).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Start date must be earlier than or equal to end date."));
        assert!(!body.contains("echarts.init"));

        let download = test::TestRequest::get()
            .uri("/download/filtered.csv?start=2023-01-03&end=2023-01-01")
            .to_request();
        let resp = test::call_service(&app, download).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn filtered_download_is_csv_attachment() {
        let app = test::init_service(
            App::new()
                .app_data(state(fixture("filtered", CSV)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/download/filtered.csv?barangay=A")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/csv; charset=utf-8"
        );
        assert!(
            resp.headers()
                .get("content-disposition")
                .unwrap()
                .to_str()
                .unwrap()
                .contains("filtered_data.csv")
        );
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert_eq!(body.lines().count(), 3);
        assert!(!body.contains(",B,"));
    }

    #[actix_web::test]
    async fn upload_replaces_dataset_but_not_original_download() {
        let app = test::init_service(
            App::new()
                .app_data(state(fixture("upload", CSV)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/upload?name=may.csv")
            .set_payload(UPLOAD)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let page = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request())
            .await;
        let page = String::from_utf8(page.to_vec()).unwrap();
        assert!(page.contains("Uploaded File: may.csv"));

        let original = test::call_and_read_body(
            &app,
            test::TestRequest::get()
                .uri("/download/original.csv")
                .to_request(),
        )
        .await;
        let original = String::from_utf8(original.to_vec()).unwrap();
        assert_eq!(original.lines().count(), 4);
        assert!(!original.contains("2024-05-01"));

        let clear = test::TestRequest::post().uri("/upload/clear").to_request();
        let resp = test::call_service(&app, clear).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let page = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request())
            .await;
        let page = String::from_utf8(page.to_vec()).unwrap();
        assert!(!page.contains("Uploaded File:"));
    }

    #[actix_web::test]
    async fn bad_upload_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(state(fixture("bad_upload", CSV)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/upload?name=bad.csv")
            .set_payload("barangay,offense\nA,Speeding\n")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn missing_default_dataset_is_a_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(state(PathBuf::from("/no/such/accidents.csv")))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn api_dashboard_returns_outputs() {
        let app = test::init_service(
            App::new()
                .app_data(state(fixture("api", CSV)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard?start=2023-01-01&end=2023-01-02")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["outputs"]["filteredRows"], 2);
        assert_eq!(body["outputs"]["totalRows"], 3);
        assert_eq!(body["outputs"]["incidentsByBarangay"][0]["count"], 1);

        let health = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, health).await;
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn original_download_is_the_file_as_stored() {
        let stored = "\
dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType
01/05/2023,08:00:00,A,Collision,Speeding,Traffic
2023-01-06,noon,B,Collision,Speeding,Traffic
";
        let app = test::init_service(
            App::new()
                .app_data(state(fixture("as_stored", stored)))
                .configure(configure),
        )
        .await;

        let upload = test::TestRequest::post()
            .uri("/upload?name=may.csv")
            .set_payload(UPLOAD)
            .to_request();
        assert_eq!(test::call_service(&app, upload).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/download/original.csv")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert_eq!(body, stored);
    }

    #[actix_web::test]
    async fn selection_containing_a_comma_is_one_value() {
        let csv = "\
dateCommitted,timeCommitted,barangay,incidentType,offense,offenseType
2023-01-01,08:00:00,A,Collision,\"Reckless Imprudence Resulting in Homicide, Physical Injuries\",Criminal
2023-01-02,09:00:00,B,Collision,Speeding,Traffic
";
        let app = test::init_service(
            App::new()
                .app_data(state(fixture("comma", csv)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(
                "/download/filtered.csv?offense=\
                 Reckless%20Imprudence%20Resulting%20in%20Homicide%2C%20Physical%20Injuries",
            )
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body.lines().count(), 2);
        assert!(body.contains(",A,"));
    }
}
