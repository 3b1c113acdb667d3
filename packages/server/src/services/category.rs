use chrono::Utc;
use sea_orm::*;

use crate::entity::category;
use crate::error::AppError;
use crate::models::category::CreateCategoryRequest;
use crate::models::shared::normalize_description;

pub async fn find_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<category::Model, AppError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))
}

pub async fn create_category<C: ConnectionTrait>(
    db: &C,
    payload: CreateCategoryRequest,
) -> Result<category::Model, AppError> {
    let model = category::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(normalize_description(payload.description)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

pub async fn list_categories<C: ConnectionTrait>(db: &C) -> Result<Vec<category::Model>, AppError> {
    Ok(category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?)
}
