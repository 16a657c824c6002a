use crate::services::taxonomy;
use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;

use super::{CategoryCommand, TagCommand};

fn open(config_path: &Path) -> Result<Database> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;
    db.migrate()?;
    Ok(db)
}

pub async fn run_category(config_path: &Path, command: CategoryCommand) -> Result<()> {
    let db = open(config_path)?;

    match command {
        CategoryCommand::Add {
            name,
            slug,
            description,
        } => {
            let id = taxonomy::create_category(
                &db,
                &name,
                slug.as_deref(),
                description.as_deref(),
            )?;
            tracing::info!("Category '{}' created (id {})", name, id);
        }
        CategoryCommand::List => {
            println!("{:<6} {:<30} {:<30}", "ID", "NAME", "SLUG");
            println!("{}", "-".repeat(66));
            for category in taxonomy::list_categories(&db)? {
                println!("{:<6} {:<30} {:<30}", category.id, category.name, category.slug);
            }
        }
    }

    Ok(())
}

pub async fn run_tag(config_path: &Path, command: TagCommand) -> Result<()> {
    let db = open(config_path)?;

    match command {
        TagCommand::Add { name, slug } => {
            let id = taxonomy::create_tag(&db, &name, slug.as_deref())?;
            tracing::info!("Tag '{}' created (id {})", name, id);
        }
        TagCommand::List => {
            println!("{:<6} {:<30} {:<30}", "ID", "NAME", "SLUG");
            println!("{}", "-".repeat(66));
            for tag in taxonomy::list_tags(&db)? {
                println!("{:<6} {:<30} {:<30}", tag.id, tag.name, tag.slug);
            }
        }
    }

    Ok(())
}
