use crate::cli::commands::{open_signed_in, print_json};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dashboard::{Dashboard, DashboardLogic, parse_period};
use crate::errors::AppResult;
use crate::models::income::source_label;
use crate::ui::chart::{Bar, render_bars};
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_balance};
use crate::utils::formatting::{bold, money, pct};

fn print_cards(d: &Dashboard, symbol: &str) {
    let s = &d.summary;
    println!("  Monthly income    : {}", bold(&money(s.income.monthly_equivalent, symbol)));
    println!(
        "  Expenses {}-{:02}  : {}  ({} of income)",
        d.year,
        d.month,
        money(s.month_expenses, symbol),
        pct(s.expense_ratio)
    );
    println!(
        "  Remaining balance : {}{}{}",
        color_for_balance(s.remaining_balance),
        money(s.remaining_balance, symbol),
        RESET
    );
    println!(
        "  Total savings     : {}  ({} of goals)",
        money(s.savings_total, symbol),
        pct(s.savings_ratio)
    );
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Dashboard { period, json } = cmd else {
        return Ok(());
    };

    let period = parse_period(period.as_deref())?;
    let (pool, user) = open_signed_in(cfg)?;
    let dashboard = DashboardLogic::load(&pool.conn, cfg, &user.id, period)?;
    let symbol = cfg.currency_symbol.as_str();

    if *json {
        return print_json(&dashboard);
    }

    header(format!("Welcome back, {}", user.name));
    print_cards(&dashboard, symbol);
    println!();

    header("Income by source (monthly)");
    if dashboard.income_sources.is_empty() {
        info("No income recorded yet.");
    } else {
        let bars: Vec<Bar> = dashboard
            .income_sources
            .iter()
            .map(|s| Bar {
                label: source_label(&s.source),
                value: s.amount,
                percentage: s.percentage,
                color: s.color.to_string(),
                caption: money(s.amount, symbol),
            })
            .collect();
        print!("{}", render_bars(&bars));
    }
    println!();

    header("Your categories");
    if dashboard.categories.is_empty() {
        info("No categories yet. Add one with `budgety category add --catalog <ID>`.");
    } else {
        let bars: Vec<Bar> = dashboard
            .categories
            .iter()
            .map(|c| {
                let catalog = c.category.catalog();
                Bar {
                    label: format!("{} {}", catalog.icon, c.category.category_name),
                    value: c.total,
                    percentage: c.percentage,
                    color: catalog.color.to_string(),
                    caption: money(c.total, symbol),
                }
            })
            .collect();
        print!("{}", render_bars(&bars));
    }

    Ok(())
}
