//! Seed the menu from a YAML file.
//!
//! Reads meal definitions from a YAML file and inserts them into the `meal`
//! table. The storefront loads the menu once at startup, so restart it after
//! seeding.
//!
//! # File Format
//!
//! ```yaml
//! meals:
//!   - name: Tomato Basil Soup
//!     price: "4.50"
//!   - name: Caesar Salad
//!     price: "6.00"
//! ```
//!
//! Prices are quoted strings so they parse as exact decimals.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{error, info, warn};

use savory_storefront::db::{self, MealRepository, RepositoryError};

/// Top-level structure of the menu YAML file.
#[derive(Debug, Deserialize)]
struct MenuFile {
    meals: Vec<MenuEntry>,
}

/// A single meal definition.
#[derive(Debug, Deserialize)]
struct MenuEntry {
    name: String,
    price: Decimal,
}

/// Seed the menu from a YAML file. With `replace` set, the existing menu
/// is deleted first.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be
/// read or parsed, or an insert fails.
pub async fn menu(file_path: &str, replace: bool) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SAVORY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "SAVORY_DATABASE_URL not set")?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("menu file not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading menu from file");

    // The whole file is parsed and validated before the first database touch
    let content = tokio::fs::read_to_string(path).await?;
    let menu: MenuFile = serde_yaml::from_str(&content)?;

    info!(meals = menu.meals.len(), "Parsed menu file");

    let errors = validate_menu(&menu);
    if !errors.is_empty() {
        for err in &errors {
            error!("invalid menu entry: {err}");
        }
        return Err(format!("menu file has {} invalid entries", errors.len()).into());
    }

    let pool = db::create_pool(&database_url).await?;
    let repo = MealRepository::new(&pool);

    if replace {
        let deleted = repo.delete_all().await?;
        info!(deleted, "Cleared existing menu");
    }

    let mut inserted = 0u32;
    let mut skipped = 0u32;

    for entry in &menu.meals {
        match repo.create(&entry.name, entry.price).await {
            Ok(meal) => {
                info!(name = %meal.name, price = %meal.price, "Added meal");
                inserted += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                warn!(name = %entry.name, "Meal already on the menu, skipped");
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(inserted, skipped, "Menu seeding complete");

    Ok(())
}

/// Check menu entries for problems before touching the database.
fn validate_menu(menu: &MenuFile) -> Vec<String> {
    let mut errors = Vec::new();

    if menu.meals.is_empty() {
        errors.push("menu contains no meals".to_owned());
    }

    for (i, entry) in menu.meals.iter().enumerate() {
        if entry.name.trim().is_empty() {
            errors.push(format!("meal #{} has an empty name", i + 1));
        }
        if entry.price < Decimal::ZERO {
            errors.push(format!("meal '{}' has a negative price", entry.name));
        }
    }

    let mut seen = HashSet::new();
    for entry in &menu.meals {
        if !seen.insert(entry.name.as_str()) {
            errors.push(format!("duplicate meal name '{}'", entry.name));
        }
    }

    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn menu_file_parses_quoted_prices() {
        let yaml = "meals:\n  - name: Tomato Basil Soup\n    price: \"4.50\"\n";
        let menu: MenuFile = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(menu.meals.len(), 1);
        assert_eq!(menu.meals.first().unwrap().price, Decimal::new(450, 2));
    }

    #[test]
    fn validation_rejects_duplicates_and_negative_prices() {
        let menu = MenuFile {
            meals: vec![
                MenuEntry {
                    name: "Soup".to_owned(),
                    price: Decimal::new(450, 2),
                },
                MenuEntry {
                    name: "Soup".to_owned(),
                    price: Decimal::new(-100, 2),
                },
            ],
        };

        let errors = validate_menu(&menu);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn validation_accepts_a_clean_menu() {
        let menu = MenuFile {
            meals: vec![MenuEntry {
                name: "Caesar Salad".to_owned(),
                price: Decimal::new(600, 2),
            }],
        };

        assert!(validate_menu(&menu).is_empty());
    }
}
