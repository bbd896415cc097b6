use crate::cli::commands::{ask_confirmation, open_signed_in, or_keep, or_keep_optional, print_json};
use crate::cli::parser::{Commands, ExpenseCmd};
use crate::config::Config;
use crate::core::aggregate::{category_breakdown, expense_stats};
use crate::core::expense::{ExpenseFilter, ExpenseLogic};
use crate::core::validation::ExpenseForm;
use crate::errors::AppResult;
use crate::store::Repository;
use crate::models::category::CATALOG;
use crate::models::expense::ExpenseItem;
use crate::ui::chart::{Bar, render_bars};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::formatting::{bold, local_date, local_datetime, money, short_id};
use crate::utils::table::{Column, Table};

fn print_table(items: &[ExpenseItem], symbol: &str) {
    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("Date"),
        Column::left("Category"),
        Column::left("Description").max(32),
        Column::right("Amount"),
    ]);

    for e in items {
        table.add_row(vec![
            short_id(&e.id).to_string(),
            local_date(&e.date),
            format!("{} {}", e.catalog().icon, e.category_name),
            e.description.clone(),
            money(e.amount, symbol),
        ]);
    }
    print!("{}", table.render());
}

fn print_breakdown(items: &[ExpenseItem], symbol: &str) {
    let rows = category_breakdown(items);
    let used = rows.iter().filter(|r| r.transaction_count > 0).count();
    let total: f64 = items.iter().map(|e| e.amount).sum();

    header("Spending by category");
    println!(
        "Total spent: {}   ({} of {} categories used)\n",
        bold(&money(total, symbol)),
        used,
        CATALOG.len()
    );

    let bars: Vec<Bar> = rows
        .iter()
        .map(|r| Bar {
            label: format!("{} {}", r.category.icon, r.category.name),
            value: r.total_amount,
            percentage: r.percentage,
            color: r.category.color.to_string(),
            caption: money(r.total_amount, symbol),
        })
        .collect();
    print!("{}", render_bars(&bars));
    println!();

    let mut table = Table::new(vec![
        Column::left("Category"),
        Column::right("Count"),
        Column::right("Average"),
        Column::left("Last expense"),
        Column::left("Level"),
    ]);
    for r in &rows {
        table.add_row(vec![
            r.category.name.to_string(),
            r.transaction_count.to_string(),
            money(r.average_amount, symbol),
            r.last_expense_date
                .as_ref()
                .map(local_date)
                .unwrap_or_else(|| "-".to_string()),
            if r.transaction_count > 0 {
                r.level().label().to_string()
            } else {
                "-".to_string()
            },
        ]);
    }
    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Expense { action } = cmd else {
        return Ok(());
    };

    let (pool, user) = open_signed_in(cfg)?;
    let logic = ExpenseLogic::new(&pool.conn, cfg, &user.id);
    let symbol = cfg.currency_symbol.as_str();

    match action {
        ExpenseCmd::Add {
            amount,
            category,
            description,
            notes,
        } => {
            let item = logic.add(&ExpenseForm {
                amount: amount.clone().unwrap_or_default(),
                category_id: category.clone().unwrap_or_default(),
                description: description.clone().unwrap_or_default(),
                notes: notes.clone(),
            })?;
            success(format!(
                "Expense added: {} {} ({})",
                item.description,
                money(item.amount, symbol),
                item.category_name
            ));
        }

        ExpenseCmd::Edit {
            id,
            amount,
            category,
            description,
            notes,
        } => {
            let id = logic.repo().resolve_id(id)?;
            let stored = ExpenseLogic::form_for(&logic.repo().get(&id)?);
            let item = logic.edit(
                &id,
                &ExpenseForm {
                    amount: or_keep(amount, stored.amount),
                    category_id: or_keep(category, stored.category_id),
                    description: or_keep(description, stored.description),
                    notes: or_keep_optional(notes, stored.notes),
                },
            )?;
            success(format!("Expense updated: {}", item.description));
        }

        ExpenseCmd::Del { id, yes } => {
            let id = logic.repo().resolve_id(id)?;
            let stored = logic.repo().get(&id)?;

            if !*yes
                && !ask_confirmation(&format!(
                    "Delete expense '{}' ({})?",
                    stored.description,
                    money(stored.amount, symbol)
                ))
            {
                info("Operation cancelled.");
                return Ok(());
            }

            let removed = logic.delete(&id)?;
            success(format!("Expense deleted: {}", removed.description));
        }

        ExpenseCmd::List {
            search,
            category,
            json,
        } => {
            let filter = ExpenseFilter {
                search: search.clone(),
                category_id: *category,
            };
            let items = logic.list(&filter)?;

            if *json {
                return print_json(&items);
            }

            if items.is_empty() {
                if filter.is_active() {
                    warning("No expenses match the filter.");
                } else {
                    warning("No expenses found");
                }
                return Ok(());
            }

            header("Expenses");
            print_table(&items, symbol);

            let stats = expense_stats(&items);
            println!();
            println!("  Total      : {}", bold(&money(stats.total, symbol)));
            if let Some(top) = &stats.top_category {
                println!(
                    "  Top        : {} ({})",
                    top.category_name,
                    money(top.total, symbol)
                );
            }
        }

        ExpenseCmd::Show { id } => {
            let e = logic.repo().get(&logic.repo().resolve_id(id)?)?;

            println!("{}", bold(&e.description));
            println!("  ID        : {}", e.id);
            println!("  Amount    : {}", money(e.amount, symbol));
            println!("  Category  : {} {}", e.catalog().icon, e.category_name);
            println!("  Date      : {}", local_datetime(&e.date));
            if let Some(notes) = &e.notes {
                println!("  Notes     : {}", notes);
            }
        }

        ExpenseCmd::Breakdown { json } => {
            let items = logic.list(&ExpenseFilter::default())?;

            if *json {
                return print_json(&category_breakdown(&items));
            }

            if items.is_empty() {
                warning("No expenses found");
                return Ok(());
            }
            print_breakdown(&items, symbol);
        }
    }

    Ok(())
}
