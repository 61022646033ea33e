use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use homex_core::Error;
use homex_similarity::{DEFAULT_K, DEFAULT_RADIUS_KM};
use homex_storage::CatalogManager;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Results shown per nearby search unless the caller asks for more
pub const DEFAULT_NEARBY_LIMIT: usize = 10;

#[derive(Deserialize)]
struct RecommendQuery {
    property: String,
    k: Option<usize>,
}

#[derive(Deserialize)]
struct NearbyQuery {
    landmark: String,
    radius_km: Option<f64>,
    limit: Option<usize>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(catalog: Arc<CatalogManager>, port: u16) -> std::io::Result<()> {
        info!(port, "starting REST API");
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(catalog.clone()))
                .configure(routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/properties", web::get().to(list_properties))
        .route("/landmarks", web::get().to(list_landmarks))
        .route("/recommend", web::get().to(recommend))
        .route("/nearby", web::get().to(nearby))
        .route("/reload", web::post().to(reload));
}

fn error_response(err: &Error) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    if err.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else if matches!(err, Error::InvalidArgument(_)) {
        HttpResponse::BadRequest().json(body)
    } else {
        warn!("request failed: {}", err);
        HttpResponse::InternalServerError().json(body)
    }
}

async fn list_properties(catalog: web::Data<Arc<CatalogManager>>) -> ActixResult<HttpResponse> {
    let names = catalog.facade().property_names();
    Ok(HttpResponse::Ok().json(json!({ "result": names })))
}

async fn list_landmarks(catalog: web::Data<Arc<CatalogManager>>) -> ActixResult<HttpResponse> {
    let names = catalog.facade().landmarks();
    Ok(HttpResponse::Ok().json(json!({ "result": names })))
}

async fn recommend(
    catalog: web::Data<Arc<CatalogManager>>,
    query: web::Query<RecommendQuery>,
) -> ActixResult<HttpResponse> {
    let k = query.k.unwrap_or(DEFAULT_K);
    match catalog.facade().recommend(&query.property, k) {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "result": result }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn nearby(
    catalog: web::Data<Arc<CatalogManager>>,
    query: web::Query<NearbyQuery>,
) -> ActixResult<HttpResponse> {
    let radius_km = query.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    let limit = query.limit.unwrap_or(DEFAULT_NEARBY_LIMIT);

    match catalog.facade().search_nearby(&query.landmark, radius_km) {
        Ok(mut result) => {
            let total = result.len();
            result.truncate(limit);
            Ok(HttpResponse::Ok().json(json!({ "result": result, "total": total })))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn reload(catalog: web::Data<Arc<CatalogManager>>) -> ActixResult<HttpResponse> {
    let manager = catalog.get_ref().clone();
    // Rebuilding is CPU-bound; keep it off the async workers
    let outcome = web::block(move || manager.reload().map(|s| (manager.generation(), s.len())))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    match outcome {
        Ok((generation, properties)) => Ok(HttpResponse::Ok().json(json!({
            "result": { "generation": generation, "properties": properties }
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}
