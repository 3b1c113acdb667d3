use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Create categories.
pub const CATEGORY_MANAGE: &str = "category:manage";
/// Create, update and delete sub-categories and attach their images.
pub const SUB_CATEGORY_MANAGE: &str = "sub_category:manage";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role_permission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub role: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub permission: String,
    #[sea_orm(belongs_to, from = "role", to = "name")]
    pub role_ref: HasOne<super::role::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
