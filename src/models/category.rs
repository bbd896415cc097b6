use crate::store::Record;
use rusqlite::Row;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Entry of the built-in expense category catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogCategory {
    pub id: u32,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub background_color: &'static str,
}

pub const CATALOG: [CatalogCategory; 6] = [
    CatalogCategory {
        id: 1,
        name: "Food",
        icon: "🍕",
        color: "#1a64db",
        background_color: "#e7effb",
    },
    CatalogCategory {
        id: 2,
        name: "Transportation",
        icon: "🚌",
        color: "#f59e42",
        background_color: "#fff5e6",
    },
    CatalogCategory {
        id: 3,
        name: "Entertainment",
        icon: "🎬",
        color: "#e44e68",
        background_color: "#fde4ec",
    },
    CatalogCategory {
        id: 4,
        name: "Bills",
        icon: "🧾",
        color: "#60b27e",
        background_color: "#e7f7ee",
    },
    CatalogCategory {
        id: 5,
        name: "Savings",
        icon: "💰",
        color: "#ffd600",
        background_color: "#fffbe7",
    },
    CatalogCategory {
        id: 6,
        name: "Other",
        icon: "➕",
        color: "#60b27e",
        background_color: "#e7f7ee",
    },
];

/// Catalog entry used when an id is unknown.
pub const OTHER_CATEGORY: &CatalogCategory = &CATALOG[5];

pub fn find_catalog(id: u32) -> Option<&'static CatalogCategory> {
    CATALOG.iter().find(|c| c.id == id)
}

/// A user-defined label attached to one catalog entry.
///
/// Stored under the `selectedCategory` key. Blobs written before ids existed
/// get a fresh id on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCategory {
    #[serde(default = "new_category_id")]
    pub id: String,
    pub category_id: u32,
    pub category_name: String,
}

fn new_category_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl UserCategory {
    pub fn catalog(&self) -> &'static CatalogCategory {
        find_catalog(self.category_id).unwrap_or(OTHER_CATEGORY)
    }
}

impl Record for UserCategory {
    const KIND: &'static str = "Category";
    const STORAGE_KEY: &'static str = "selectedCategory";
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["category_id", "category_name"];

    fn id(&self) -> &str {
        &self.id
    }

    fn sql_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(i64::from(self.category_id)),
            Value::Text(self.category_name.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(UserCategory {
            id: row.get("id")?,
            category_id: row.get("category_id")?,
            category_name: row.get("category_name")?,
        })
    }
}
