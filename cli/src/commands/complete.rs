use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use etacast_common::config::Config;
use etacast_core::service;

use crate::commands::open_store;
use crate::terminal::{format, print};

pub fn complete(id: u64, at: Option<NaiveDateTime>, cfg: &Config) -> anyhow::Result<()> {
    let store = open_store(cfg);
    let at = at.unwrap_or_else(|| Local::now().naive_local());

    let record = service::complete_delivery(store.as_ref(), id, at)
        .with_context(|| format!("could not complete delivery {id}"))?;

    if cfg.json {
        print::print(&serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    print::tree_head(id, "completed delivery");
    print::as_tree_one_level(format::record_details(&record));
    Ok(())
}
