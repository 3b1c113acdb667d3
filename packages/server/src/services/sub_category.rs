//! Sub-category persistence behind the [`SubCategoryService`] trait.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use crate::entity::sub_category;
use crate::error::AppError;
use crate::models::sub_category::{SubCategoryDraft, SubCategoryResponse};

use super::category::find_category;

/// Owns sub-category records: validates, persists and returns representations.
#[async_trait]
pub trait SubCategoryService: Send + Sync {
    /// Create a sub-category under `category_id`. Fails with `NotFound` when the
    /// category does not exist.
    async fn create(
        &self,
        draft: SubCategoryDraft,
        category_id: i32,
    ) -> Result<SubCategoryResponse, AppError>;

    /// Replace the name and description of `id`. The image reference is only
    /// replaced when the draft carries one.
    async fn update(&self, draft: SubCategoryDraft, id: i32)
    -> Result<SubCategoryResponse, AppError>;

    async fn delete(&self, id: i32) -> Result<(), AppError>;

    async fn get_by_id(&self, id: i32) -> Result<SubCategoryResponse, AppError>;

    /// All sub-categories, ordered by id.
    async fn list(&self) -> Result<Vec<SubCategoryResponse>, AppError>;

    /// Sub-categories of one category, ordered by id.
    async fn list_by_category(&self, category_id: i32)
    -> Result<Vec<SubCategoryResponse>, AppError>;
}

/// [`SubCategoryService`] backed by a SeaORM connection.
pub struct SeaOrmSubCategoryService {
    db: DatabaseConnection,
}

impl SeaOrmSubCategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn find_sub_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<sub_category::Model, AppError> {
    sub_category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("SubCategory not found".into()))
}

#[async_trait]
impl SubCategoryService for SeaOrmSubCategoryService {
    async fn create(
        &self,
        draft: SubCategoryDraft,
        category_id: i32,
    ) -> Result<SubCategoryResponse, AppError> {
        draft.validate()?;
        find_category(&self.db, category_id).await?;

        let now = Utc::now();
        let model = sub_category::ActiveModel {
            name: Set(draft.name),
            description: Set(draft.description),
            image_url: Set(draft.image_url),
            category_id: Set(category_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(id = model.id, category_id, "Created sub-category");
        Ok(model.into())
    }

    async fn update(
        &self,
        draft: SubCategoryDraft,
        id: i32,
    ) -> Result<SubCategoryResponse, AppError> {
        draft.validate()?;

        let txn = self.db.begin().await?;

        let existing = find_sub_category(&txn, id).await?;
        let mut active: sub_category::ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.description = Set(draft.description);
        if let Some(image_url) = draft.image_url {
            active.image_url = Set(Some(image_url));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&txn).await?;
        txn.commit().await?;

        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sub_category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("SubCategory not found".into()));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: i32) -> Result<SubCategoryResponse, AppError> {
        Ok(find_sub_category(&self.db, id).await?.into())
    }

    async fn list(&self) -> Result<Vec<SubCategoryResponse>, AppError> {
        let models = sub_category::Entity::find()
            .order_by_asc(sub_category::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(SubCategoryResponse::from).collect())
    }

    async fn list_by_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<SubCategoryResponse>, AppError> {
        find_category(&self.db, category_id).await?;

        let models = sub_category::Entity::find()
            .filter(sub_category::Column::CategoryId.eq(category_id))
            .order_by_asc(sub_category::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(SubCategoryResponse::from).collect())
    }
}
