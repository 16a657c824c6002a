use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf, name: Option<String>) -> Result<()> {
    let site_name = name.unwrap_or_else(|| "Portfolio Blog".to_string());

    let config_path = path.join("folio.toml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    std::fs::create_dir_all(path.join("data"))?;

    let config = format!(
        r#"[site]
title = "{}"
description = "A personal blog"

[server]
host = "127.0.0.1"
port = 8000
request_timeout_secs = 30

[database]
path = "./data/folio.db"
pool_size = 10

[auth]
session_lifetime = "7d"
secure_cookies = false
"#,
        site_name.replace('"', "\\\"")
    );

    std::fs::write(&config_path, config)?;

    tracing::info!("Created new site at {:?}", path);
    tracing::info!("Run 'folio migrate' to set up the database");
    tracing::info!("Run 'folio user add' to create the first account");
    tracing::info!("Run 'folio serve' to start the server");

    Ok(())
}
