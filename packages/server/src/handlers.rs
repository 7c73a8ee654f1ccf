//! HTTP handler functions for the dashboard host.

use accident_dashboard_accident_models::Dataset;
use accident_dashboard_analytics::{filters, render};
use accident_dashboard_dataset::{
    DatasetSource, Upload, load, load_bytes, original_csv_bytes, to_csv_bytes,
};
use accident_dashboard_server_models::{
    ApiDashboard, ApiError, ApiHealth, ApiUpload, UploadParams, parse_filter_query,
};
use actix_web::{
    HttpResponse,
    http::header::{self, ContentType},
    web,
};

use crate::pages::{DashboardPage, PageMode, failure_page};
use crate::{AppState, ServerError};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Name given to uploads posted without one.
const UNNAMED_UPLOAD: &str = "upload.csv";

type FilterQuery = web::Query<Vec<(String, String)>>;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /`
///
/// Renders the dashboard for the filter state in the query string.
pub async fn dashboard(state: web::Data<AppState>, query: FilterQuery) -> HttpResponse {
    let filter = match parse_filter_query(&query) {
        Ok(filter) => filter,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };

    let (dataset, upload_name) = match load_current(&state).await {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("Failed to load dataset: {e}");
            return HttpResponse::InternalServerError()
                .content_type(ContentType::html())
                .body(failure_page(&state.config.title).into_string());
        }
    };

    let rendered = render(&dataset, &filter);
    let options = match &rendered {
        Ok(rendered) => rendered.options.clone(),
        Err(_) => filters::options_ignoring_dates(&dataset, &filter),
    };

    let page = DashboardPage {
        title: &state.config.title,
        mode: PageMode::Live,
        upload_name: upload_name.as_deref(),
        filter: &filter,
        options: &options,
        outcome: rendered.as_ref().map(|r| &r.outputs),
    };

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page.render().into_string())
}

/// `GET /api/dashboard`
///
/// Returns every view for the filter state in the query string as JSON.
pub async fn api_dashboard(state: web::Data<AppState>, query: FilterQuery) -> HttpResponse {
    let filter = match parse_filter_query(&query) {
        Ok(filter) => filter,
        Err(e) => return bad_request(&e),
    };

    let source = current_source(&state);
    let label = source.label();
    let dataset = match load_blocking(source).await {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load dataset: {e}");
            return HttpResponse::InternalServerError().json(ApiError {
                error: "Failed to load dataset".to_string(),
            });
        }
    };

    match render(&dataset, &filter) {
        Ok(rendered) => HttpResponse::Ok().json(ApiDashboard {
            source: label,
            filter,
            options: rendered.options,
            outputs: rendered.outputs,
        }),
        Err(e) => bad_request(&e),
    }
}

/// `POST /upload?name=<file>`
///
/// Makes the request body the active dataset. The body is loaded first and
/// rejected if it isn't a usable accident CSV.
pub async fn upload(
    state: web::Data<AppState>,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> HttpResponse {
    let name = params
        .into_inner()
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNNAMED_UPLOAD.to_string());
    let bytes = body.to_vec();

    let checked = web::block({
        let bytes = bytes.clone();
        move || load_bytes(&bytes)
    })
    .await;

    match checked {
        Ok(Ok(dataset)) => {
            log::info!("Accepted upload '{name}' with {} rows", dataset.len());
            let rows = dataset.len() as u64;
            *state.lock_upload() = Some(Upload {
                name: name.clone(),
                bytes,
            });
            HttpResponse::Ok().json(ApiUpload { name, rows })
        }
        Ok(Err(e)) => {
            log::warn!("Rejected upload '{name}': {e}");
            bad_request(&e)
        }
        Err(e) => {
            log::error!("Upload check failed: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: "Failed to read upload".to_string(),
            })
        }
    }
}

/// `POST /upload/clear`
///
/// Drops the active upload and sends the browser back to the dashboard.
pub async fn clear_upload(state: web::Data<AppState>) -> HttpResponse {
    if let Some(upload) = state.lock_upload().take() {
        log::info!("Cleared upload '{}'", upload.name);
    }
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// `GET /download/filtered.csv`
///
/// The filtered view for the filter state in the query string.
pub async fn download_filtered(state: web::Data<AppState>, query: FilterQuery) -> HttpResponse {
    let filter = match parse_filter_query(&query) {
        Ok(filter) => filter,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };

    let dataset = match load_blocking(current_source(&state)).await {
        Ok(dataset) => dataset,
        Err(e) => return download_failed(&e),
    };

    let view = match filters::apply(&dataset, &filter) {
        Ok(view) => view,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };

    match to_csv_bytes(&view) {
        Ok(bytes) => csv_attachment("filtered_data.csv", bytes),
        Err(e) => download_failed(&e.into()),
    }
}

/// `GET /download/original.csv`
///
/// The default dataset as stored on disk, cells unparsed. Any upload is
/// ignored.
pub async fn download_original(state: web::Data<AppState>) -> HttpResponse {
    let path = state.config.default_dataset.clone();
    let exported = web::block(move || original_csv_bytes(&path)).await;

    match exported {
        Ok(Ok(bytes)) => csv_attachment("original_data.csv", bytes),
        Ok(Err(e)) => download_failed(&ServerError::Dataset(e)),
        Err(e) => download_failed(&ServerError::Blocking(e)),
    }
}

fn current_source(state: &AppState) -> DatasetSource {
    let upload = state.lock_upload().clone();
    DatasetSource::resolve(upload, &state.config.default_dataset)
}

async fn load_blocking(source: DatasetSource) -> Result<Dataset, ServerError> {
    Ok(web::block(move || load(&source)).await??)
}

/// Loads the active dataset and returns it with the upload's name.
async fn load_current(state: &AppState) -> Result<(Dataset, Option<String>), ServerError> {
    let source = current_source(state);
    let upload_name = match &source {
        DatasetSource::Upload(upload) => Some(upload.name.clone()),
        DatasetSource::Path(_) => None,
    };
    Ok((load_blocking(source).await?, upload_name))
}

fn csv_attachment(file_name: &str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(CSV_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(bytes)
}

fn download_failed(e: &ServerError) -> HttpResponse {
    log::error!("Failed to export dataset: {e}");
    HttpResponse::InternalServerError().body("Failed to export dataset")
}

fn bad_request(e: &impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError {
        error: e.to_string(),
    })
}
