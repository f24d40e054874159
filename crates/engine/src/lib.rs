pub use allocations::CategoryAllocation;
pub use breakdown::{CategorySpend, SpendingBreakdown, spending_breakdown};
pub use budgets::{Budget, BudgetPeriod};
pub use categories::Category;
pub use commands::{
    BudgetNewCmd, BudgetUpdateCmd, CategoryAttachCmd, CategoryNewCmd, CategoryUpdateCmd,
    ExpenseListFilter, ExpenseNewCmd, ExpenseUpdateCmd,
};
pub use error::EngineError;
pub use expenses::Expense;
pub use ops::{Engine, EngineBuilder};

mod allocations;
mod breakdown;
mod budgets;
mod categories;
mod commands;
mod error;
mod expenses;
mod ops;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
