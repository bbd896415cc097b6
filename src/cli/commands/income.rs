use crate::actions::ActionContext;
use crate::cli::commands::{ask_confirmation, open_signed_in, or_keep, print_json};
use crate::cli::parser::{Commands, IncomeCmd};
use crate::config::Config;
use crate::core::aggregate::income_totals;
use crate::core::income::{IncomeManager, Settled, filter_by_frequency, parse_quick_entry};
use crate::core::validation::IncomeForm;
use crate::errors::{AppError, AppResult};
use crate::models::frequency::Frequency;
use crate::models::income::{IncomeItem, source_label};
use crate::store::{self, Repository};
use crate::ui::messages::{header, info, warning};
use crate::utils::formatting::{bold, local_date, local_datetime, money, short_id};
use crate::utils::table::{Column, Table};

/// Failed actions have already been reported; surface them as an error exit.
fn finish(settled: Settled) -> AppResult<IncomeItem> {
    let Settled { response, .. } = settled;
    response
        .into_result()?
        .ok_or_else(|| AppError::Other("empty response".into()))
}

fn print_table(items: &[IncomeItem], symbol: &str) {
    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("Name").max(28),
        Column::left("Source"),
        Column::left("Frequency"),
        Column::right("Amount"),
        Column::right("Monthly"),
        Column::left("Added"),
    ]);

    for i in items {
        table.add_row(vec![
            short_id(&i.id).to_string(),
            i.income_name.clone(),
            source_label(&i.source),
            i.frequency.label().to_string(),
            money(i.amount, symbol),
            money(i.monthly_amount(), symbol),
            local_date(&i.created_at),
        ]);
    }
    print!("{}", table.render());
}

fn print_totals(items: &[IncomeItem], symbol: &str) {
    let t = income_totals(items);
    println!();
    println!("  Per week     : {}", money(t.per_week, symbol));
    println!("  Per month    : {}", money(t.per_month, symbol));
    println!("  Per year     : {}", money(t.per_year, symbol));
    println!("  {}", bold(&format!("Monthly total: {}", money(t.monthly_equivalent, symbol))));
    println!("  Yearly total : {}", money(t.yearly_equivalent, symbol));
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Income { action } = cmd else {
        return Ok(());
    };

    let (pool, user) = open_signed_in(cfg)?;
    let ctx = ActionContext::new(&pool.conn, cfg);
    let repo = store::open::<IncomeItem>(&pool.conn, cfg.storage.income, &user.id);
    let symbol = cfg.currency_symbol.as_str();

    match action {
        IncomeCmd::Add {
            amount,
            source,
            frequency,
            name,
        } => {
            let source = source.clone().unwrap_or_default().to_lowercase();
            let form = IncomeForm {
                amount: amount.clone().unwrap_or_default(),
                income_name: name.clone().unwrap_or_else(|| source_label(&source)),
                source,
                frequency: frequency.clone().unwrap_or_default(),
            };

            let mut manager = IncomeManager::load(ctx)?;
            let item = finish(manager.add(&form)?)?;
            info(format!(
                "{} {} ({})",
                item.income_name,
                money(item.amount, symbol),
                item.frequency.label()
            ));
        }

        IncomeCmd::QuickAdd { entries } => {
            let mut manager = IncomeManager::load(ctx)?;
            let mut failed = 0;

            for raw in entries {
                let form = parse_quick_entry(raw);
                let added = manager.add(&form).and_then(finish);
                if let Err(e) = added {
                    warning(format!("'{}': {}", raw, e));
                    failed += 1;
                }
            }

            let added = entries.len() - failed;
            println!();
            print_table(&manager.items(), symbol);
            info(format!("Added {} of {} entries", added, entries.len()));

            if failed > 0 {
                return Err(AppError::Other(format!(
                    "{} of {} entries were rejected",
                    failed,
                    entries.len()
                )));
            }
        }

        IncomeCmd::Edit {
            id,
            amount,
            source,
            frequency,
            name,
        } => {
            let id = repo.resolve_id(id)?;
            let stored = repo.get(&id)?;
            let form = IncomeForm {
                amount: or_keep(amount, stored.amount.to_string()),
                source: or_keep(source, stored.source.clone()).to_lowercase(),
                frequency: or_keep(frequency, stored.frequency.as_str().to_string()),
                income_name: or_keep(name, stored.income_name.clone()),
            };

            let mut manager = IncomeManager::load(ctx)?;
            finish(manager.edit(&id, &form)?)?;
        }

        IncomeCmd::Del { id, yes } => {
            let id = repo.resolve_id(id)?;
            let stored = repo.get(&id)?;

            if !*yes
                && !ask_confirmation(&format!(
                    "Delete income '{}' ({})?",
                    stored.income_name,
                    money(stored.amount, symbol)
                ))
            {
                info("Operation cancelled.");
                return Ok(());
            }

            let mut manager = IncomeManager::load(ctx)?;
            finish(manager.delete(&id)?)?;
        }

        IncomeCmd::List { frequency, json } => {
            let filter = match frequency {
                Some(f) => Some(
                    Frequency::from_input(f)
                        .ok_or_else(|| AppError::Other(format!("Unknown frequency: {f}")))?,
                ),
                None => None,
            };

            let manager = IncomeManager::load(ctx)?;
            let items = filter_by_frequency(&manager.items(), filter);

            if *json {
                return print_json(&items);
            }

            if items.is_empty() {
                warning("No income recorded yet. Add one with `budgety income add`.");
                return Ok(());
            }

            header("Income");
            print_table(&items, symbol);
            print_totals(&items, symbol);
        }

        IncomeCmd::Show { id } => {
            let item = repo.get(&repo.resolve_id(id)?)?;

            println!("{}", bold(&item.income_name));
            println!("  ID        : {}", item.id);
            println!("  Source    : {}", source_label(&item.source));
            println!("  Frequency : {}", item.frequency.label());
            println!("  Amount    : {}", money(item.amount, symbol));
            println!("  Monthly   : {}", money(item.monthly_amount(), symbol));
            println!("  Yearly    : {}", money(item.frequency.to_yearly(item.amount), symbol));
            println!("  Created   : {}", local_datetime(&item.created_at));
            println!("  Updated   : {}", local_datetime(&item.updated_at));
        }
    }

    Ok(())
}
