use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use etacast_common::config::Config;
use etacast_common::info;

use crate::commands::{load_registry, open_store};
use crate::etaprint;
use crate::terminal::{format, print};

pub fn train(retrain: bool, cfg: &Config) -> anyhow::Result<()> {
    if retrain {
        if let Some(path) = &cfg.snapshot_path {
            discard_snapshot(path)?;
        }
    }

    let store = open_store(cfg);
    let registry = load_registry(store.as_ref(), cfg)?;
    let summaries = registry.describe();

    if cfg.json {
        print::print(&serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    print::header("trained models", cfg.quiet);
    let count = summaries.iter().count();
    for (idx, (kind, summary)) in summaries.iter().enumerate() {
        print::tree_head(idx, &kind.to_string());
        print::as_tree_one_level(format::summary_details(summary));
        if idx + 1 != count {
            etaprint!();
        }
    }
    Ok(())
}

fn discard_snapshot(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Discarded snapshot {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("could not remove {}", path.display())),
    }
}
