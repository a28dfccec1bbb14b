use std::path::Path;

use anyhow::Context;
use coros_client::CorosClient;
use stride_core::config::UsersConfig;
use stride_core::sync::{self, BatchReport, SyncOptions};
use stride_core::types::FileKind;

use crate::output::{print_json, print_table};

/// Exit codes above this would collide with shell conventions.
const MAX_EXIT_CODE: usize = 100;

pub fn run(
    root: &Path,
    config: &Path,
    only_run: bool,
    kind: FileKind,
    json: bool,
) -> anyhow::Result<i32> {
    let cfg = UsersConfig::load(config).context("failed to load accounts config")?;
    for warning in cfg.validate() {
        tracing::warn!("{}", warning.message);
    }

    let connector = CorosClient::new().context("failed to build http client")?;
    let opts = SyncOptions {
        kind,
        only_run,
        ..Default::default()
    };

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let report = rt.block_on(sync::sync_accounts(&connector, &cfg, root, &opts));

    if json {
        print_json(&report_json(&report))?;
    } else {
        render(&report);
    }

    // The batch always attempts every account; the exit code carries the
    // aggregate failure count so operators can alert on partial runs.
    Ok(report.failed_accounts().min(MAX_EXIT_CODE) as i32)
}

fn report_json(report: &BatchReport) -> serde_json::Value {
    let accounts: Vec<serde_json::Value> = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(s) => serde_json::json!({
                "account": outcome.account,
                "status": "ok",
                "remote": s.remote,
                "pending": s.pending,
                "saved": s.saved,
                "skipped": s.skipped,
                "download_failures": s
                    .fetch_failures
                    .iter()
                    .map(|f| serde_json::json!({
                        "activity": f.activity_id,
                        "error": f.error.to_string(),
                    }))
                    .collect::<Vec<_>>(),
                "cataloged": s.artifacts.activity_count,
            }),
            Err(f) => serde_json::json!({
                "account": outcome.account,
                "status": "failed",
                "stage": f.stage.as_str(),
                "error": f.source.to_string(),
            }),
        })
        .collect();

    serde_json::json!({
        "accounts": accounts,
        "failed": report.failed_accounts(),
    })
}

fn render(report: &BatchReport) {
    let rows: Vec<Vec<String>> = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(s) => vec![
                outcome.account.clone(),
                "ok".to_string(),
                s.remote.to_string(),
                s.saved.to_string(),
                s.fetch_failures.len().to_string(),
            ],
            Err(f) => vec![
                outcome.account.clone(),
                format!("failed ({})", f.stage),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ],
        })
        .collect();

    print_table(&["ACCOUNT", "STATUS", "REMOTE", "NEW", "DL-ERRORS"], rows);

    let failed = report.failed_accounts();
    if failed > 0 {
        println!("\n{failed} of {} accounts failed", report.outcomes.len());
    }
}
