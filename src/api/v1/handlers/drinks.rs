/*
 * Responsibility
 * - /drinks 系 CRUD handler
 * - 認可は route 側の guard で済んでいる前提 (Caller で Claims を受け取れる)
 * - JSON validation → DrinkRepo 呼び出し → short/long 形式で返す
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::drinks::{
            CreateDrinkRequest, DeleteDrinkResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::{Caller, DeferredJson, DrinkId, JsonBody},
    },
    error::AppError,
    state::AppState,
};

/// GET /drinks (public)
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<Vec<DrinkShort>>>, AppError> {
    let drinks = state.drinks.list().await?;
    if drinks.is_empty() {
        return Err(AppError::NotFound);
    }

    let res = drinks.into_iter().map(DrinkShort::from).collect();
    Ok(Json(DrinksResponse::new(res)))
}

/// GET /drinks-detail (get:drinks-detail)
pub async fn list_drinks_detail(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<Vec<DrinkLong>>>, AppError> {
    let drinks = state.drinks.list().await?;
    if drinks.is_empty() {
        return Err(AppError::NotFound);
    }

    let res = drinks.into_iter().map(DrinkLong::from).collect();
    Ok(Json(DrinksResponse::new(res)))
}

/// POST /drinks (post:drinks)
pub async fn create_drink(
    State(state): State<AppState>,
    Caller(claims): Caller,
    JsonBody(req): JsonBody<CreateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let (title, recipe) = req.validate().map_err(AppError::unprocessable)?;

    let drink = state.drinks.create(&title, &recipe).await?;
    tracing::info!(
        drink_id = drink.id,
        sub = claims.sub.as_deref().unwrap_or("-"),
        "drink created"
    );

    Ok(Json(DrinksResponse::new(DrinkLong::from(drink))))
}

/// PATCH /drinks/{drink_id} (patch:drinks)
pub async fn update_drink(
    State(state): State<AppState>,
    DrinkId(drink_id): DrinkId,
    body: DeferredJson<UpdateDrinkRequest>,
) -> Result<Json<DrinksResponse<Vec<DrinkLong>>>, AppError> {
    // 存在しない id は body の parse / validation より先に 404
    if state.drinks.get(drink_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let changes = body.parse()?.validate().map_err(AppError::unprocessable)?;

    let drink = state
        .drinks
        .update(drink_id, changes)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(drink)])))
}

/// DELETE /drinks/{drink_id} (delete:drinks)
pub async fn delete_drink(
    State(state): State<AppState>,
    DrinkId(drink_id): DrinkId,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    if !state.drinks.delete(drink_id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: drink_id,
    }))
}
