//! Category registry per user.
//!
//! Categories are pure labels (name, color, icon). Budgets and expenses keep
//! category ids without a foreign key: deleting a category never touches the
//! records referencing it.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_COLOR: &str = "#3b82f6";
pub const DEFAULT_ICON: &str = "\u{1f4c1}";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Category {
    pub fn new(owner_id: String, name: String, color: Option<String>, icon: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            color: color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            icon: icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub name_norm: String,
    pub color: String,
    pub icon: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            color: model.color,
            icon: model.icon,
        }
    }
}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Set(category.id),
            owner_id: ActiveValue::Set(category.owner_id.clone()),
            name: ActiveValue::Set(category.name.clone()),
            name_norm: ActiveValue::NotSet,
            color: ActiveValue::Set(category.color.clone()),
            icon: ActiveValue::Set(category.icon.clone()),
        }
    }
}
