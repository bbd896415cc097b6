use crate::actions::income::{delete_income, edit_income, get_income, submit_new_income};
use crate::actions::{ActionContext, ActionResponse};
use crate::core::optimistic::{Optimistic, OptimisticAction};
use crate::core::validation::IncomeForm;
use crate::errors::{AppError, AppResult};
use crate::models::frequency::Frequency;
use crate::models::income::IncomeItem;
use crate::ui::messages::{ToastKind, field_errors, toast};
use chrono::Utc;

/// Outcome of one mutation: the server's answer and the list shown afterwards.
pub struct Settled {
    pub response: ActionResponse<IncomeItem>,
    pub view: Vec<IncomeItem>,
}

/// Income list with optimistic add/edit/delete on top of the income actions.
pub struct IncomeManager<'a> {
    ctx: ActionContext<'a>,
    state: Optimistic<IncomeItem>,
}

impl<'a> IncomeManager<'a> {
    /// Load the confirmed list. `Unauthorized` when nobody is signed in.
    pub fn load(ctx: ActionContext<'a>) -> AppResult<Self> {
        let confirmed = get_income(&ctx).into_result()?.unwrap_or_default();
        Ok(Self {
            ctx,
            state: Optimistic::new(confirmed),
        })
    }

    pub fn items(&self) -> Vec<IncomeItem> {
        self.state.view()
    }

    pub fn add(&mut self, form: &IncomeForm) -> AppResult<Settled> {
        let valid = form.parse()?;
        let now = Utc::now();
        let provisional = IncomeItem {
            id: format!("pending-{}", uuid::Uuid::new_v4()),
            amount: valid.amount,
            source: valid.source,
            frequency: valid.frequency,
            income_name: valid.income_name,
            created_at: now,
            updated_at: now,
            user_id: String::new(),
        };

        let ticket = self.state.push(OptimisticAction::Add(provisional));
        let response = submit_new_income(&self.ctx, form);
        self.settle(ticket, response, "Income added", "Failed to add income")
    }

    pub fn edit(&mut self, id: &str, form: &IncomeForm) -> AppResult<Settled> {
        let valid = form.parse()?;
        let current = self
            .state
            .confirmed()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound {
                kind: "Income",
                id: id.to_string(),
            })?;

        let patched = IncomeItem {
            amount: valid.amount,
            source: valid.source,
            frequency: valid.frequency,
            income_name: valid.income_name,
            updated_at: Utc::now(),
            ..current
        };

        let ticket = self.state.push(OptimisticAction::Edit(patched));
        let response = edit_income(&self.ctx, form, id);
        self.settle(ticket, response, "Income updated", "Failed to update income")
    }

    pub fn delete(&mut self, id: &str) -> AppResult<Settled> {
        let ticket = self.state.push(OptimisticAction::Delete(id.to_string()));
        let response = delete_income(&self.ctx, id);
        self.settle(ticket, response, "Income deleted", "Failed to delete income")
    }

    /// Success refreshes the confirmed list from storage; failure rolls the
    /// pending action back so the view returns to the confirmed list.
    fn settle(
        &mut self,
        ticket: crate::core::optimistic::Ticket,
        response: ActionResponse<IncomeItem>,
        ok_title: &str,
        err_title: &str,
    ) -> AppResult<Settled> {
        if response.is_unauthorized() {
            self.state.rollback(ticket);
            return Err(AppError::Unauthorized);
        }

        if response.is_ok() {
            let fresh = get_income(&self.ctx).into_result()?.unwrap_or_default();
            self.state.confirm(ticket, fresh);
            toast(ToastKind::Success, ok_title, &response.message);
        } else {
            self.state.rollback(ticket);
            toast(ToastKind::Error, err_title, &response.message);
            if let Some(issues) = &response.issues {
                field_errors(issues);
            }
        }

        Ok(Settled {
            response,
            view: self.state.view(),
        })
    }
}

/// Parse `AMOUNT:SOURCE:FREQUENCY[:NAME]`. A missing name defaults to the source label.
pub fn parse_quick_entry(raw: &str) -> IncomeForm {
    let mut parts = raw.splitn(4, ':').map(str::trim);
    let amount = parts.next().unwrap_or_default().to_string();
    let source = parts.next().unwrap_or_default().to_lowercase();
    let frequency = parts.next().unwrap_or_default().to_string();
    let income_name = match parts.next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => crate::models::income::source_label(&source),
    };

    IncomeForm {
        amount,
        source,
        frequency,
        income_name,
    }
}

/// Items matching an optional frequency filter, order preserved.
pub fn filter_by_frequency(items: &[IncomeItem], frequency: Option<Frequency>) -> Vec<IncomeItem> {
    items
        .iter()
        .filter(|i| frequency.is_none_or(|f| i.frequency == f))
        .cloned()
        .collect()
}
