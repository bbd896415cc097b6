use crate::cli::commands::{ask_confirmation, open_signed_in, or_keep, or_keep_optional, print_json};
use crate::cli::parser::{Commands, SavingsCmd};
use crate::config::Config;
use crate::core::aggregate::savings_totals;
use crate::core::savings::SavingsLogic;
use crate::core::validation::SavingsForm;
use crate::errors::AppResult;
use crate::store::Repository;
use crate::models::savings::SavingsItem;
use crate::ui::chart::progress_bar;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{RESET, color_for_progress};
use crate::utils::formatting::{bold, local_date, local_datetime, money, pct, short_id};
use crate::utils::table::{Column, Table};

fn print_table(items: &[SavingsItem], symbol: &str) {
    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("Name").max(24),
        Column::left("Type"),
        Column::left("Bank").max(20),
        Column::right("Current"),
        Column::right("Goal"),
        Column::right("Progress"),
    ]);

    for s in items {
        table.add_row(vec![
            short_id(&s.id).to_string(),
            s.name.clone(),
            format!("{} {}", s.kind.icon(), s.kind.label()),
            s.bank_name.clone(),
            money(s.current_amount, symbol),
            money(s.goal_amount, symbol),
            pct(s.progress()),
        ]);
    }
    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Savings { action } = cmd else {
        return Ok(());
    };

    let (pool, user) = open_signed_in(cfg)?;
    let logic = SavingsLogic::new(&pool.conn, cfg, &user.id);
    let symbol = cfg.currency_symbol.as_str();

    match action {
        SavingsCmd::Add {
            name,
            kind,
            bank,
            account,
            current,
            goal,
            notes,
        } => {
            let item = logic.add(&SavingsForm {
                name: name.clone().unwrap_or_default(),
                kind: kind.clone().unwrap_or_default(),
                bank_name: bank.clone().unwrap_or_default(),
                account_number: account.clone(),
                current_amount: current.clone().unwrap_or_default(),
                goal_amount: goal.clone().unwrap_or_default(),
                notes: notes.clone(),
            })?;
            success(format!(
                "Savings added: {} ({} of {})",
                item.name,
                money(item.current_amount, symbol),
                money(item.goal_amount, symbol)
            ));
        }

        SavingsCmd::Edit {
            id,
            name,
            kind,
            bank,
            account,
            current,
            goal,
            notes,
        } => {
            let id = logic.repo().resolve_id(id)?;
            let stored = SavingsLogic::form_for(&logic.repo().get(&id)?);
            let item = logic.edit(
                &id,
                &SavingsForm {
                    name: or_keep(name, stored.name),
                    kind: or_keep(kind, stored.kind),
                    bank_name: or_keep(bank, stored.bank_name),
                    account_number: or_keep_optional(account, stored.account_number),
                    current_amount: or_keep(current, stored.current_amount),
                    goal_amount: or_keep(goal, stored.goal_amount),
                    notes: or_keep_optional(notes, stored.notes),
                },
            )?;
            success(format!(
                "Savings updated: {} ({})",
                item.name,
                pct(item.progress())
            ));
        }

        SavingsCmd::Del { id, yes } => {
            let id = logic.repo().resolve_id(id)?;
            let stored = logic.repo().get(&id)?;

            if !*yes && !ask_confirmation(&format!("Delete savings '{}'?", stored.name)) {
                info("Operation cancelled.");
                return Ok(());
            }

            let removed = logic.delete(&id)?;
            success(format!("Savings deleted: {}", removed.name));
        }

        SavingsCmd::List { json } => {
            let items = logic.list()?;

            if *json {
                return print_json(&items);
            }

            if items.is_empty() {
                warning("No savings yet. Add one with `budgety savings add`.");
                return Ok(());
            }

            header("Savings");
            print_table(&items, symbol);

            let t = savings_totals(&items);
            println!();
            println!("  Saved      : {}", bold(&money(t.total_current, symbol)));
            println!("  Goals      : {}", money(t.total_goal, symbol));
            println!("  Remaining  : {}", money(t.total_remaining, symbol));
            println!(
                "  Progress   : {}{} {}{}",
                color_for_progress(t.overall_progress),
                progress_bar(t.overall_progress, 30),
                pct(t.overall_progress),
                RESET
            );
        }

        SavingsCmd::Show { id } => {
            let s = logic.repo().get(&logic.repo().resolve_id(id)?)?;

            println!("{} {}", s.kind.icon(), bold(&s.name));
            println!("  ID        : {}", s.id);
            println!("  Type      : {}", s.kind.label());
            println!("  Bank      : {}", s.bank_name);
            if let Some(account) = &s.account_number {
                println!("  Account   : {}", account);
            }
            println!("  Current   : {}", money(s.current_amount, symbol));
            println!("  Goal      : {}", money(s.goal_amount, symbol));
            println!("  Remaining : {}", money(s.remaining(), symbol));
            println!(
                "  Progress  : {}{} {}{}",
                color_for_progress(s.progress()),
                progress_bar(s.progress(), 30),
                pct(s.progress()),
                RESET
            );
            if let Some(notes) = &s.notes {
                println!("  Notes     : {}", notes);
            }
            println!("  Created   : {}", local_date(&s.date));
            println!("  Updated   : {}", local_datetime(&s.last_updated));
        }
    }

    Ok(())
}
