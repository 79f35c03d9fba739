mod label;
mod parse;

pub use label::*;
pub use parse::*;

use portflow_config::PortflowConfig;
use std::path::Path;
use tracing::debug;

/// 設定ファイルとコマンドライン指定をマージ
pub fn load_config(
    path: Option<&Path>,
    max_auto_range: Option<usize>,
) -> anyhow::Result<PortflowConfig> {
    let mut config = match path {
        Some(path) => portflow_config::load_config_from(path)?,
        None => portflow_config::load_config()?,
    };

    // コマンドライン指定が最優先
    if let Some(max) = max_auto_range {
        config.publish.max_auto_range = max;
        config.validate()?;
    }

    debug!("Effective config: {:?}", config);
    Ok(config)
}
