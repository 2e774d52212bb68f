use std::path::PathBuf;

pub const DEFAULT_STORE_PATH: &str = "data/deliveries.jsonl";
pub const DEFAULT_SNAPSHOT_PATH: &str = "model/simple_regression.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-lines file holding every delivery record.
    pub store_path: PathBuf,

    /// Where the fitted simple regression is persisted between runs.
    ///
    /// `None` disables persistence: the simple model is refit on every start.
    pub snapshot_path: Option<PathBuf>,

    /// 0 prints everything, 1 drops headers and decorations, 2 prints results only.
    pub quiet: u8,

    /// Emit reports as JSON instead of the terminal layout.
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            snapshot_path: Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            quiet: 0,
            json: false,
        }
    }
}
