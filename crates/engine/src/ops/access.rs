//! Ownership checks shared by every operation that accepts a record id.
//!
//! Existence is checked before ownership: an absent record is `KeyNotFound`,
//! a record owned by someone else is `Forbidden`. Both checks run against
//! the same transaction as the mutation they guard.

use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, budgets, categories, expenses};

use super::Engine;

/// Generates a `require_<record>_owned` lookup for a target entity.
macro_rules! impl_require_owned {
    ($fn_name:ident, $entity:path, $model:ty, $label:literal) => {
        pub(super) async fn $fn_name(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<$model> {
            let model = <$entity>::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(concat!($label, " not exists").to_string()))?;
            if model.owner_id != user_id {
                return Err(EngineError::Forbidden(
                    concat!($label, " not owned by requester").to_string(),
                ));
            }
            Ok(model)
        }
    };
}

impl Engine {
    impl_require_owned!(require_budget_owned, budgets::Entity, budgets::Model, "budget");

    impl_require_owned!(
        require_category_owned,
        categories::Entity,
        categories::Model,
        "category"
    );

    impl_require_owned!(
        require_expense_owned,
        expenses::Entity,
        expenses::Model,
        "expense"
    );
}
