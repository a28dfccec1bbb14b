use std::path::Path;

use anyhow::Context;
use stride_core::artifact;
use stride_core::config::UsersConfig;
use stride_core::paths;
use stride_core::types::FileKind;

use crate::output::{print_json, print_table};

/// Offline artifact rebuild: re-catalog whatever raw files the workspaces
/// already hold. Credentials are not required.
pub fn run(
    root: &Path,
    config: &Path,
    only: Option<&str>,
    kind: FileKind,
    json: bool,
) -> anyhow::Result<i32> {
    let cfg = UsersConfig::load(config).context("failed to load accounts config")?;

    let mut built = Vec::new();
    let mut matched = false;
    for user in &cfg.users {
        if let Some(name) = only {
            if user.name != name {
                continue;
            }
        }
        matched = true;
        if paths::validate_account_name(&user.name).is_err() {
            tracing::warn!(account = %user.name, "skipping account with unsafe name");
            continue;
        }
        let workspace = paths::workspace_dir(root, &user.name, kind);
        let set = artifact::build(
            &workspace,
            &paths::database_path(root, &user.name),
            &paths::export_path(root, &user.name),
            kind,
            &user.name,
        )
        .with_context(|| format!("failed to build artifacts for '{}'", user.name))?;
        built.push((user.name.clone(), set));
    }

    if let Some(name) = only {
        if !matched {
            anyhow::bail!("no account named '{name}' in config");
        }
    }

    if json {
        let value: Vec<serde_json::Value> = built
            .iter()
            .map(|(name, set)| {
                serde_json::json!({
                    "account": name,
                    "cataloged": set.activity_count,
                    "database": set.database,
                    "export": set.export,
                })
            })
            .collect();
        print_json(&value)?;
    } else {
        let rows = built
            .iter()
            .map(|(name, set)| {
                vec![
                    name.clone(),
                    set.activity_count.to_string(),
                    set.database.display().to_string(),
                ]
            })
            .collect();
        print_table(&["ACCOUNT", "ACTIVITIES", "DATABASE"], rows);
    }

    Ok(0)
}
