use super::{ActionContext, ActionResponse};
use crate::db::log::ttlog_quiet;
use crate::models::expense::ExpenseItem;
use crate::store;

/// The caller's expenses in stored order.
pub fn get_expenses(ctx: &ActionContext) -> ActionResponse<Vec<ExpenseItem>> {
    let Some(user) = ctx.user() else {
        return ActionResponse::unauthorized();
    };

    match store::open::<ExpenseItem>(ctx.conn, ctx.cfg.storage.expenses, &user.id).list() {
        Ok(items) if items.is_empty() => ActionResponse::ok("No expenses found", items),
        Ok(items) => ActionResponse::ok("Expenses fetched successfully", items),
        Err(e) => {
            ttlog_quiet(ctx.conn, "error", "expenses", &e.to_string());
            ActionResponse::failure("Failed to get expenses")
        }
    }
}
