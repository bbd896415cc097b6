use super::{ActionContext, ActionResponse};
use crate::core::validation::IncomeForm;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::models::income::IncomeItem;
use crate::store;
use chrono::Utc;

fn repo<'a>(ctx: &ActionContext<'a>, user_id: &str) -> Box<dyn store::Repository<IncomeItem> + 'a> {
    store::open::<IncomeItem>(ctx.conn, ctx.cfg.storage.income, user_id)
}

fn newest_first(mut items: Vec<IncomeItem>) -> Vec<IncomeItem> {
    items.sort_by_key(|i| std::cmp::Reverse(i.created_at));
    items
}

/// The caller's income, newest first.
pub fn get_income(ctx: &ActionContext) -> ActionResponse<Vec<IncomeItem>> {
    let Some(user) = ctx.user() else {
        return ActionResponse::unauthorized();
    };

    match repo(ctx, &user.id).list() {
        Ok(items) => ActionResponse::ok("Income fetched successfully", newest_first(items)),
        Err(e) => {
            ttlog_quiet(ctx.conn, "error", "income", &e.to_string());
            ActionResponse::failure("Failed to get income")
        }
    }
}

pub fn submit_new_income(ctx: &ActionContext, form: &IncomeForm) -> ActionResponse<IncomeItem> {
    let Some(user) = ctx.user() else {
        return ActionResponse::unauthorized();
    };

    let valid = match form.parse() {
        Ok(v) => v,
        Err(issues) => return ActionResponse::invalid("Failed to submit new income", issues),
    };

    let now = Utc::now();
    let item = IncomeItem {
        id: uuid::Uuid::new_v4().to_string(),
        amount: valid.amount,
        source: valid.source,
        frequency: valid.frequency,
        income_name: valid.income_name,
        created_at: now,
        updated_at: now,
        user_id: user.id.clone(),
    };

    let stored: AppResult<()> = repo(ctx, &user.id).insert(&item);
    match stored {
        Ok(()) => {
            ttlog_quiet(ctx.conn, "add", &item.id, &format!("income '{}'", item.income_name));
            ActionResponse::ok("New income submitted successfully", item)
        }
        Err(e) => {
            ttlog_quiet(ctx.conn, "error", "income", &e.to_string());
            ActionResponse::failure("Failed to submit new income")
        }
    }
}

/// Replace the stored fields of one income. The creation time is kept.
pub fn edit_income(ctx: &ActionContext, form: &IncomeForm, id: &str) -> ActionResponse<IncomeItem> {
    let Some(user) = ctx.user() else {
        return ActionResponse::unauthorized();
    };

    if id.trim().is_empty() {
        return ActionResponse::failure("Income ID is required");
    }

    let valid = match form.parse() {
        Ok(v) => v,
        Err(issues) => return ActionResponse::invalid("Invalid data", issues),
    };

    let repo = repo(ctx, &user.id);
    let result = repo.get(id).and_then(|existing| {
        let updated = IncomeItem {
            amount: valid.amount,
            source: valid.source,
            frequency: valid.frequency,
            income_name: valid.income_name,
            updated_at: Utc::now(),
            ..existing
        };
        repo.update(&updated).map(|_| updated)
    });

    match result {
        Ok(updated) => {
            ttlog_quiet(ctx.conn, "edit", &updated.id, &format!("income '{}'", updated.income_name));
            ActionResponse::ok("Income updated successfully", updated)
        }
        Err(e) => {
            ttlog_quiet(ctx.conn, "error", id, &e.to_string());
            ActionResponse::failure("Failed to update income")
        }
    }
}

pub fn delete_income(ctx: &ActionContext, id: &str) -> ActionResponse<IncomeItem> {
    let Some(user) = ctx.user() else {
        return ActionResponse::unauthorized();
    };

    match repo(ctx, &user.id).delete(id) {
        Ok(removed) => {
            ttlog_quiet(ctx.conn, "del", &removed.id, &format!("income '{}'", removed.income_name));
            ActionResponse::ok("Income deleted successfully", removed)
        }
        Err(e) => {
            ttlog_quiet(ctx.conn, "error", id, &e.to_string());
            ActionResponse::failure("Failed to delete income")
        }
    }
}
