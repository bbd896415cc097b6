use crate::cli::commands::{ask_confirmation, open_signed_in, or_keep};
use crate::cli::parser::{CategoryCmd, Commands};
use crate::config::Config;
use crate::core::category::CategoryLogic;
use crate::core::validation::CategoryForm;
use crate::errors::AppResult;
use crate::store::Repository;
use crate::models::category::{CATALOG, UserCategory, find_catalog};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::hex_to_colour;
use crate::utils::formatting::short_id;
use crate::utils::table::{Column, Table};

fn print_catalog() {
    header("Category catalog");
    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::left("Category"),
        Column::left("Colour"),
    ]);
    for c in CATALOG.iter() {
        table.add_row(vec![
            c.id.to_string(),
            format!("{} {}", c.icon, c.name),
            c.color.to_string(),
        ]);
    }
    print!("{}", table.render());
}

fn print_table(items: &[UserCategory]) {
    let mut table = Table::new(vec![
        Column::left("ID"),
        Column::left("Name").max(30),
        Column::left("Catalog"),
    ]);
    for c in items {
        let catalog = c.catalog();
        table.add_row(vec![
            short_id(&c.id).to_string(),
            c.category_name.clone(),
            format!("{} {} (#{})", catalog.icon, catalog.name, catalog.id),
        ]);
    }
    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Category { action } = cmd else {
        return Ok(());
    };

    // The catalog is fixed and needs no account.
    if let CategoryCmd::Catalog = action {
        print_catalog();
        return Ok(());
    }

    let (pool, user) = open_signed_in(cfg)?;
    let logic = CategoryLogic::new(&pool.conn, cfg, &user.id);

    match action {
        CategoryCmd::Catalog => {}

        CategoryCmd::Add { category, name } => {
            let category_id = category.clone().unwrap_or_default();
            // The name defaults to the catalog's own name.
            let category_name = name.clone().unwrap_or_else(|| {
                category_id
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .and_then(find_catalog)
                    .map(|c| c.name.to_string())
                    .unwrap_or_default()
            });

            let item = logic.add(&CategoryForm {
                category_id,
                category_name,
            })?;
            success(format!(
                "Category added: {} ({})",
                item.category_name,
                item.catalog().name
            ));
        }

        CategoryCmd::Edit { id, category, name } => {
            let id = logic.repo().resolve_id(id)?;
            let stored = logic.repo().get(&id)?;
            let item = logic.edit(
                &id,
                &CategoryForm {
                    category_id: or_keep(category, stored.category_id.to_string()),
                    category_name: or_keep(name, stored.category_name),
                },
            )?;
            success(format!("Category updated: {}", item.category_name));
        }

        CategoryCmd::Del { id, yes } => {
            let id = logic.repo().resolve_id(id)?;
            let stored = logic.repo().get(&id)?;

            if !*yes && !ask_confirmation(&format!("Delete category '{}'?", stored.category_name)) {
                info("Operation cancelled.");
                return Ok(());
            }

            let removed = logic.delete(&id)?;
            success(format!("Category deleted: {}", removed.category_name));
        }

        CategoryCmd::List => {
            let items = logic.list()?;
            if items.is_empty() {
                warning("No categories yet. Add one with `budgety category add --catalog <ID>`.");
                return Ok(());
            }
            header("Your categories");
            print_table(&items);
        }

        CategoryCmd::Show { id } => {
            let c = logic.repo().get(&logic.repo().resolve_id(id)?)?;
            let catalog = c.catalog();
            let colour = hex_to_colour(catalog.color);

            println!("{} {}", catalog.icon, colour.bold().paint(c.category_name.as_str()));
            println!("  ID        : {}", c.id);
            println!("  Catalog   : {} (#{})", catalog.name, catalog.id);
            println!("  Colour    : {}", catalog.color);
        }
    }

    Ok(())
}
