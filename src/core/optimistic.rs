//! Optimistic updates.
//!
//! A mutation is first applied to the displayed list as a pending action, then
//! settled once the backing call returns. On success the confirmed state is
//! reloaded from storage and the pending action dropped; on failure the
//! pending action is rolled back and the confirmed state is left as it was.

use crate::models::income::IncomeItem;
use chrono::{DateTime, Utc};

/// Records the reducer can place in a list.
pub trait Keyed: Clone {
    fn key(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Result of editing `self` with `patch`. Default: the patch wins entirely.
    fn merged_with(&self, patch: &Self) -> Self {
        patch.clone()
    }
}

impl Keyed for IncomeItem {
    fn key(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// An edit never moves an item in the newest-first order.
    fn merged_with(&self, patch: &Self) -> Self {
        IncomeItem {
            created_at: self.created_at,
            ..patch.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptimisticAction<T> {
    Add(T),
    Edit(T),
    Delete(String),
}

/// Pure reducer: the list as it looks after `action`.
pub fn apply<T: Keyed>(state: &[T], action: &OptimisticAction<T>) -> Vec<T> {
    match action {
        OptimisticAction::Delete(id) => state.iter().filter(|i| i.key() != id).cloned().collect(),
        OptimisticAction::Add(item) => {
            let mut next = state.to_vec();
            next.push(item.clone());
            next.sort_by_key(|i| std::cmp::Reverse(i.created_at()));
            next
        }
        OptimisticAction::Edit(item) => state
            .iter()
            .map(|existing| {
                if existing.key() == item.key() {
                    existing.merged_with(item)
                } else {
                    existing.clone()
                }
            })
            .collect(),
    }
}

/// Handle returned by `Optimistic::push`, used to settle that one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Confirmed server state plus the actions still waiting for confirmation.
#[derive(Debug, Clone)]
pub struct Optimistic<T> {
    confirmed: Vec<T>,
    pending: Vec<(Ticket, OptimisticAction<T>)>,
    next_ticket: u64,
}

impl<T: Keyed> Optimistic<T> {
    pub fn new(confirmed: Vec<T>) -> Self {
        Self {
            confirmed,
            pending: Vec::new(),
            next_ticket: 0,
        }
    }

    pub fn push(&mut self, action: OptimisticAction<T>) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push((ticket, action));
        ticket
    }

    /// What the user sees: every pending action folded over the confirmed state.
    pub fn view(&self) -> Vec<T> {
        self.pending
            .iter()
            .fold(self.confirmed.clone(), |state, (_, action)| apply(&state, action))
    }

    /// The backing call succeeded: replace confirmed state with the fresh
    /// snapshot and drop the pending action.
    pub fn confirm(&mut self, ticket: Ticket, fresh: Vec<T>) {
        self.confirmed = fresh;
        self.pending.retain(|(t, _)| *t != ticket);
    }

    /// The backing call failed: forget the pending action.
    pub fn rollback(&mut self, ticket: Ticket) -> Option<OptimisticAction<T>> {
        let idx = self.pending.iter().position(|(t, _)| *t == ticket)?;
        Some(self.pending.remove(idx).1)
    }

    pub fn confirmed(&self) -> &[T] {
        &self.confirmed
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
