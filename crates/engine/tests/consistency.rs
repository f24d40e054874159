use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Budget, BudgetNewCmd, CategoryAttachCmd, CategoryNewCmd, Engine, EngineError, ExpenseListFilter,
    ExpenseNewCmd, ExpenseUpdateCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password, name, currency, theme) \
             VALUES (?, ?, ?, ?, ?)",
            vec![
                username.into(),
                "password".into(),
                username.into(),
                "USD".into(),
                "light".into(),
            ],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn new_budget(engine: &Engine, user: &str, name: &str) -> Budget {
    engine
        .create_budget(BudgetNewCmd {
            user_id: user.to_string(),
            name: name.to_string(),
            description: None,
            total_minor: 100_000,
            period: None,
            start_date: Utc::now(),
            end_date: Utc::now() + Duration::days(30),
        })
        .await
        .unwrap()
}

async fn new_category(engine: &Engine, user: &str, name: &str) -> Uuid {
    engine
        .create_category(CategoryNewCmd {
            user_id: user.to_string(),
            name: name.to_string(),
            color: None,
            icon: None,
        })
        .await
        .unwrap()
        .id
}

async fn attach(engine: &Engine, user: &str, budget_id: Uuid, category_id: Uuid) {
    engine
        .add_category_to_budget(CategoryAttachCmd {
            budget_id,
            category_id,
            allocated_minor: 10_000,
            user_id: user.to_string(),
        })
        .await
        .unwrap();
}

async fn spent_for(engine: &Engine, user: &str, budget_id: Uuid, category_id: Uuid) -> i64 {
    let budget = engine.budget(budget_id, user).await.unwrap();
    budget
        .categories
        .iter()
        .find(|a| a.category_id == category_id)
        .map(|a| a.spent_minor)
        .unwrap_or_else(|| panic!("allocation missing for {category_id}"))
}

#[tokio::test]
async fn expenses_accumulate_into_spent() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    attach(&engine, "alice", budget.id, food).await;

    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 50))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 25))
        .await
        .unwrap();

    assert_eq!(spent_for(&engine, "alice", budget.id, food).await, 75);
}

#[tokio::test]
async fn deleting_expense_debits_spent() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    attach(&engine, "alice", budget.id, food).await;

    let keep = engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 25))
        .await
        .unwrap();
    let gone = engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 50))
        .await
        .unwrap();

    engine.delete_expense(gone.id, "alice").await.unwrap();

    assert_eq!(spent_for(&engine, "alice", budget.id, food).await, 25);
    assert!(engine.expense(keep.id, "alice").await.is_ok());
}

#[tokio::test]
async fn updating_amount_reconciles_spent() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    attach(&engine, "alice", budget.id, food).await;

    let expense = engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 50))
        .await
        .unwrap();

    engine
        .update_expense(
            expense.id,
            "alice",
            ExpenseUpdateCmd {
                amount_minor: Some(80),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(spent_for(&engine, "alice", budget.id, food).await, 80);
}

#[tokio::test]
async fn reassigning_category_moves_spend() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    let fun = new_category(&engine, "alice", "Fun").await;
    attach(&engine, "alice", budget.id, food).await;
    attach(&engine, "alice", budget.id, fun).await;

    let expense = engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 40))
        .await
        .unwrap();

    engine
        .update_expense(
            expense.id,
            "alice",
            ExpenseUpdateCmd {
                category_id: Some(fun),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(spent_for(&engine, "alice", budget.id, food).await, 0);
    assert_eq!(spent_for(&engine, "alice", budget.id, fun).await, 40);
}

#[tokio::test]
async fn untouched_fields_do_not_move_spend() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    attach(&engine, "alice", budget.id, food).await;

    let expense = engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 40))
        .await
        .unwrap();

    let updated = engine
        .update_expense(
            expense.id,
            "alice",
            ExpenseUpdateCmd {
                description: Some("lunch".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.description, "lunch");
    assert_eq!(spent_for(&engine, "alice", budget.id, food).await, 40);
}

#[tokio::test]
async fn unattached_category_expense_is_stored_without_spent_adjustment() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    let travel = new_category(&engine, "alice", "Travel").await;
    attach(&engine, "alice", budget.id, food).await;

    // travel is never attached to the budget
    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, travel, 500))
        .await
        .unwrap();

    assert_eq!(spent_for(&engine, "alice", budget.id, food).await, 0);
    let loaded = engine.budget(budget.id, "alice").await.unwrap();
    assert_eq!(loaded.expenses.len(), 1);
}

#[tokio::test]
async fn debit_floors_at_zero() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let travel = new_category(&engine, "alice", "Travel").await;

    // Expense lands before the allocation exists, so the credit is skipped.
    let expense = engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, travel, 300))
        .await
        .unwrap();
    attach(&engine, "alice", budget.id, travel).await;
    assert_eq!(spent_for(&engine, "alice", budget.id, travel).await, 0);

    // Deleting it now debits an amount that was never credited.
    engine.delete_expense(expense.id, "alice").await.unwrap();
    assert_eq!(spent_for(&engine, "alice", budget.id, travel).await, 0);
}

#[tokio::test]
async fn recompute_repairs_drift() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let travel = new_category(&engine, "alice", "Travel").await;

    // Two expenses recorded before the allocation existed.
    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, travel, 120))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, travel, 80))
        .await
        .unwrap();
    attach(&engine, "alice", budget.id, travel).await;
    assert_eq!(spent_for(&engine, "alice", budget.id, travel).await, 0);

    let repaired = engine
        .recompute_budget_spent(budget.id, "alice")
        .await
        .unwrap();
    let allocation = repaired
        .categories
        .iter()
        .find(|a| a.category_id == travel)
        .unwrap();
    assert_eq!(allocation.spent_minor, 200);
}

#[tokio::test]
async fn deleting_budget_removes_its_expenses() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    attach(&engine, "alice", budget.id, food).await;
    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 50))
        .await
        .unwrap();

    engine.delete_budget(budget.id, "alice").await.unwrap();

    let err = engine.budget(budget.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let leftovers = engine
        .list_expenses("alice", &ExpenseListFilter::default())
        .await
        .unwrap();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn attaching_same_category_twice_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    attach(&engine, "alice", budget.id, food).await;

    let err = engine
        .add_category_to_budget(CategoryAttachCmd {
            budget_id: budget.id,
            category_id: food,
            allocated_minor: 5_000,
            user_id: "alice".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateCategory(_)));
}

#[tokio::test]
async fn category_names_are_unique_per_owner() {
    let (engine, _db) = engine_with_db().await;
    new_category(&engine, "alice", "Food").await;

    let err = engine
        .create_category(CategoryNewCmd {
            user_id: "alice".to_string(),
            name: "  FOOD ".to_string(),
            color: None,
            icon: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateCategory(_)));

    // Same name under a different owner is fine.
    new_category(&engine, "bob", "Food").await;
}

#[tokio::test]
async fn other_users_records_are_forbidden() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    attach(&engine, "alice", budget.id, food).await;
    let expense = engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 50))
        .await
        .unwrap();

    let err = engine.budget(budget.id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.delete_category(food, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.delete_expense(expense.id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // And unknown ids stay distinguishable from foreign ones.
    let err = engine.budget(Uuid::new_v4(), "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn deleting_category_leaves_budget_and_expenses_alone() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    attach(&engine, "alice", budget.id, food).await;
    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 50))
        .await
        .unwrap();

    engine.delete_category(food, "alice").await.unwrap();

    // The allocation row and the expense survive with a dangling id.
    assert_eq!(spent_for(&engine, "alice", budget.id, food).await, 50);
    let loaded = engine.budget(budget.id, "alice").await.unwrap();
    assert_eq!(loaded.expenses.len(), 1);

    // Further writes against the dangling pair keep working.
    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 10))
        .await
        .unwrap();
    assert_eq!(spent_for(&engine, "alice", budget.id, food).await, 60);
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;

    let err = engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, -1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn breakdown_reflects_expense_list_not_accumulators() {
    let (engine, _db) = engine_with_db().await;
    let budget = new_budget(&engine, "alice", "Groceries").await;
    let food = new_category(&engine, "alice", "Food").await;
    let travel = new_category(&engine, "alice", "Travel").await;
    attach(&engine, "alice", budget.id, food).await;
    // travel stays unattached: its expenses never hit an accumulator but
    // must still show up in the derived breakdown.

    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, food, 75))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseNewCmd::new("alice", budget.id, travel, 25))
        .await
        .unwrap();

    let breakdown = engine.budget_breakdown(budget.id, "alice").await.unwrap();
    assert_eq!(breakdown.total_spent_minor, 100);
    assert_eq!(breakdown.categories.len(), 2);

    let food_share = breakdown
        .categories
        .iter()
        .find(|c| c.category_id == food)
        .unwrap();
    assert_eq!(food_share.spent_minor, 75);
    assert!((food_share.share_pct - 75.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn expense_filters_narrow_by_budget_and_category() {
    let (engine, _db) = engine_with_db().await;
    let groceries = new_budget(&engine, "alice", "Groceries").await;
    let holiday = new_budget(&engine, "alice", "Holiday").await;
    let food = new_category(&engine, "alice", "Food").await;
    let travel = new_category(&engine, "alice", "Travel").await;

    engine
        .create_expense(ExpenseNewCmd::new("alice", groceries.id, food, 10))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseNewCmd::new("alice", holiday.id, travel, 20))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseNewCmd::new("alice", holiday.id, food, 30))
        .await
        .unwrap();

    let all = engine
        .list_expenses("alice", &ExpenseListFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let holiday_only = engine
        .list_expenses(
            "alice",
            &ExpenseListFilter {
                budget_id: Some(holiday.id),
                category_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(holiday_only.len(), 2);

    let holiday_food = engine
        .list_expenses(
            "alice",
            &ExpenseListFilter {
                budget_id: Some(holiday.id),
                category_id: Some(food),
            },
        )
        .await
        .unwrap();
    assert_eq!(holiday_food.len(), 1);
    assert_eq!(holiday_food[0].amount_minor, 30);
}
