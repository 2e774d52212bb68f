use etacast_common::config::Config;
use etacast_common::delivery::record::DeliveryRecord;
use etacast_common::store::RecordStore;

use crate::commands::open_store;
use crate::etaprint;
use crate::terminal::{format, print};

pub fn records(limit: Option<usize>, cfg: &Config) -> anyhow::Result<()> {
    let store = open_store(cfg);
    let records = store.find_all()?;
    let shown = most_recent(&records, limit);

    if cfg.json {
        print::print(&serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    if records.is_empty() {
        print::header("empty store", cfg.quiet);
        print::no_results("delivery records");
        return Ok(());
    }

    print::header("delivery records", cfg.quiet);
    if shown.is_empty() {
        print::no_results("delivery records");
        return Ok(());
    }
    for (idx, record) in shown.iter().enumerate() {
        let name = match record.id {
            Some(id) => format!("delivery {id}"),
            None => "unsaved delivery".to_string(),
        };
        print::tree_head(idx, &name);
        if cfg.quiet < 2 {
            print::as_tree_one_level(format::record_details(record));
        }
        if idx + 1 != shown.len() && cfg.quiet < 2 {
            etaprint!();
        }
    }
    Ok(())
}

/// The last `limit` records, or all of them.
fn most_recent(records: &[DeliveryRecord], limit: Option<usize>) -> &[DeliveryRecord] {
    match limit {
        Some(limit) => &records[records.len().saturating_sub(limit)..],
        None => records,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
