pub mod attribution;

pub use attribution::{
    expense_categories, CategoryExpense, ExpenseLedger, ExpenseTotal,
};
