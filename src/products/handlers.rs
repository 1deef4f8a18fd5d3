use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateProduct, ProductForm, UpdateProduct};
use super::repo_types::Product;
use super::services;
use crate::{
    auth::require_access_token,
    error::{AppError, AppResult},
    images::services::{upload_image, UploadItem},
    state::AppState,
    validation::Validate,
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/product", get(find_all))
        .route("/product/:id", get(find_one))
}

/// Write routes sit behind the access-token guard when the deployment asks for it.
pub fn write_routes(state: &AppState) -> Router<AppState> {
    let routes = Router::new()
        .route("/product", post(create_product))
        .route("/product/:id", put(update_product).delete(remove_product))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));
    if state.config.products_require_auth {
        routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token,
        ))
    } else {
        routes
    }
}

fn malformed(e: MultipartError) -> AppError {
    AppError::InvalidRequest(format!("Malformed multipart body: {e}"))
}

/// Splits a product multipart body into its text fields and the optional `file` part.
async fn read_form(mut mp: Multipart) -> AppResult<(ProductForm, Option<UploadItem>)> {
    let mut form = ProductForm::default();
    let mut file = None;
    while let Some(field) = mp.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field.bytes().await.map_err(malformed)?;
                // browsers send an empty part for an untouched file input
                if !body.is_empty() {
                    file = Some(UploadItem { body, content_type });
                }
            }
            "name" => form.name = Some(field.text().await.map_err(malformed)?),
            "price" => form.price = Some(field.text().await.map_err(malformed)?),
            "description" => form.description = Some(field.text().await.map_err(malformed)?),
            "category" => form.category = Some(field.text().await.map_err(malformed)?),
            _ => {}
        }
    }
    Ok((form, file))
}

async fn upload_if_present(st: &AppState, file: Option<UploadItem>) -> AppResult<Option<String>> {
    match file {
        Some(item) => Ok(Some(upload_image(st, item).await?)),
        None => Ok(None),
    }
}

#[instrument(skip(state, mp))]
pub async fn create_product(
    State(state): State<AppState>,
    mp: Multipart,
) -> AppResult<(StatusCode, Json<Product>)> {
    let (form, file) = read_form(mp).await?;
    let input = CreateProduct(form).validated()?;
    let image = upload_if_present(&state, file).await?;
    let product = services::create(&state, input.into_new_product(image)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state))]
pub async fn find_all(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(services::find_all(&state).await?))
}

#[instrument(skip(state))]
pub async fn find_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    Ok(Json(services::find_one(&state, &id).await?))
}

#[instrument(skip(state, mp))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mp: Multipart,
) -> AppResult<Json<Product>> {
    let (form, file) = read_form(mp).await?;
    let input = UpdateProduct(form).validated()?;
    // unknown ids are rejected before anything is uploaded
    services::find_one(&state, &id).await?;
    let image = upload_if_present(&state, file).await?;
    Ok(Json(services::update(&state, &id, input.into_changes(image)).await?))
}

#[instrument(skip(state))]
pub async fn remove_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    services::remove(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
