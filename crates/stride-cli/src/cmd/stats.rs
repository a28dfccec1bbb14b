use std::path::Path;

use anyhow::Context;
use stride_core::stats;

use crate::output::{print_json, print_table};

pub fn run(dir: &Path, json: bool) -> anyhow::Result<i32> {
    let stats = stats::scan(dir).with_context(|| format!("failed to scan {}", dir.display()))?;

    if json {
        print_json(&stats)?;
        return Ok(0);
    }

    println!("Scanned {} files ({} bytes)", stats.total, stats.total_bytes);

    let rows: Vec<Vec<String>> = stats
        .by_extension
        .iter()
        .map(|(ext, count)| vec![ext.clone(), count.to_string()])
        .collect();
    print_table(&["EXTENSION", "FILES"], rows);

    if stats.empty_files > 0 {
        println!("\n{} empty files (failed or truncated downloads?)", stats.empty_files);
    }
    if !stats.unparsable.is_empty() {
        println!(
            "\n{} files without a recoverable activity id:",
            stats.unparsable.len()
        );
        for name in &stats.unparsable {
            println!("  {name}");
        }
    }

    Ok(0)
}
