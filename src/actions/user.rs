use super::{ActionContext, ActionResponse};
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::models::expense::ExpenseItem;
use crate::models::income::IncomeItem;
use crate::models::savings::SavingsItem;
use crate::models::user::User;
use crate::store;
use serde::Serialize;

/// A user together with everything they have recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(flatten)]
    pub user: User,
    pub incomes: Vec<IncomeItem>,
    pub expenses: Vec<ExpenseItem>,
    pub savings: Vec<SavingsItem>,
}

fn load(ctx: &ActionContext, user: User) -> AppResult<UserInfo> {
    let storage = &ctx.cfg.storage;
    Ok(UserInfo {
        incomes: store::open::<IncomeItem>(ctx.conn, storage.income, &user.id).list()?,
        expenses: store::open::<ExpenseItem>(ctx.conn, storage.expenses, &user.id).list()?,
        savings: store::open::<SavingsItem>(ctx.conn, storage.savings, &user.id).list()?,
        user,
    })
}

pub fn get_user_info(ctx: &ActionContext) -> ActionResponse<UserInfo> {
    let Some(user) = ctx.user() else {
        return ActionResponse::unauthorized();
    };

    match load(ctx, user) {
        Ok(info) => ActionResponse::ok("User info fetched successfully", info),
        Err(e) => {
            ttlog_quiet(ctx.conn, "error", "user", &e.to_string());
            ActionResponse::failure("Failed to get user info")
        }
    }
}
