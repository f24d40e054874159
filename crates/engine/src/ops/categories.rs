//! Category operations.
//!
//! Deletion is unconditional: allocations and expenses referencing the
//! category are left untouched, so dangling category ids are possible by
//! design. The ledger treats those pairs as "no allocation" and skips them.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, CategoryNewCmd, CategoryUpdateCmd, EngineError, ResultEngine, categories,
    util::{normalize_display_name, normalize_name_key},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a category. The normalized name must be unique per owner.
    pub async fn create_category(&self, cmd: CategoryNewCmd) -> ResultEngine<Category> {
        let name = normalize_display_name(&cmd.name, "category")?;
        let name_norm = normalize_name_key(&name);
        let category = Category::new(cmd.user_id.clone(), name, cmd.color, cmd.icon);

        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::OwnerId.eq(cmd.user_id.as_str()))
                .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::DuplicateCategory(category.name.clone()));
            }

            let mut active = categories::ActiveModel::from(&category);
            active.name_norm = ActiveValue::Set(name_norm);
            active.insert(&db_tx).await?;

            Ok(category)
        })
    }

    /// List the requester's categories, sorted by name.
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::OwnerId.eq(user_id))
            .order_by_asc(categories::Column::NameNorm)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Patch an owned category.
    pub async fn update_category(
        &self,
        category_id: Uuid,
        user_id: &str,
        cmd: CategoryUpdateCmd,
    ) -> ResultEngine<Category> {
        let renamed = cmd
            .name
            .as_deref()
            .map(|name| normalize_display_name(name, "category"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_category_owned(&db_tx, category_id, user_id)
                .await?;
            let mut active: categories::ActiveModel = model.into();

            if let Some(name) = renamed {
                let name_norm = normalize_name_key(&name);
                let clash = categories::Entity::find()
                    .filter(categories::Column::OwnerId.eq(user_id))
                    .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                    .filter(categories::Column::Id.ne(category_id))
                    .one(&db_tx)
                    .await?;
                if clash.is_some() {
                    return Err(EngineError::DuplicateCategory(name));
                }
                active.name = ActiveValue::Set(name);
                active.name_norm = ActiveValue::Set(name_norm);
            }
            if let Some(color) = cmd.color {
                active.color = ActiveValue::Set(color);
            }
            if let Some(icon) = cmd.icon {
                active.icon = ActiveValue::Set(icon);
            }

            let updated = active.update(&db_tx).await?;
            Ok(Category::from(updated))
        })
    }

    /// Delete an owned category. No validation or repair of budgets and
    /// expenses that still reference it.
    pub async fn delete_category(&self, category_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_category_owned(&db_tx, category_id, user_id)
                .await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
