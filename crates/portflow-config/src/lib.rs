pub mod error;

pub use error::*;

use portflow_core::{
    DEFAULT_AUTO_PORT_END, DEFAULT_AUTO_PORT_START, DEFAULT_MAX_AUTO_RANGE, ParseOptions,
    SequentialAllocator,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 設定ファイルのパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "PORTFLOW_CONFIG_PATH";

const LOCAL_CANDIDATES: [&str; 2] = ["portflow.yaml", ".portflow.yaml"];

/// PortFlowの設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortflowConfig {
    #[serde(default)]
    pub publish: PublishConfig,
}

/// ポート公開に関する設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// ホストポート自動割り当てで一度に展開できる最大ポート数
    #[serde(default = "default_max_auto_range")]
    pub max_auto_range: usize,
    /// 自動割り当てに使うホストポートのプール
    #[serde(default)]
    pub auto_port_range: AutoPortRange,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            max_auto_range: default_max_auto_range(),
            auto_port_range: AutoPortRange::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPortRange {
    pub start: u16,
    pub end: u16,
}

impl Default for AutoPortRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_AUTO_PORT_START,
            end: DEFAULT_AUTO_PORT_END,
        }
    }
}

fn default_max_auto_range() -> usize {
    DEFAULT_MAX_AUTO_RANGE
}

impl PortflowConfig {
    pub fn validate(&self) -> Result<()> {
        if self.publish.max_auto_range == 0 {
            return Err(ConfigError::InvalidValue(
                "publish.max_auto_range は1以上を指定してください".to_string(),
            ));
        }

        let range = self.publish.auto_port_range;
        if range.start == 0 || range.start > range.end {
            return Err(ConfigError::InvalidValue(format!(
                "publish.auto_port_range が不正です: {}-{}",
                range.start, range.end
            )));
        }

        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_auto_range: self.publish.max_auto_range,
        }
    }

    pub fn allocator(&self) -> Result<SequentialAllocator> {
        let range = self.publish.auto_port_range;
        SequentialAllocator::new(range.start, range.end)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

/// グローバル設定ファイルのパス (~/.config/portflow/config.yaml)
pub fn global_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("portflow");
    Ok(config_dir.join("config.yaml"))
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 PORTFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: portflow.yaml, .portflow.yaml
/// 3. ~/.config/portflow/config.yaml (グローバル設定)
///
/// どれも見つからない場合は `None`。
/// 環境変数で指定したファイルが存在しない場合は他の候補を探さずエラーにする。
pub fn find_config_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定
    if let Some(config_path) = std::env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
        let path = PathBuf::from(config_path);
        if !path.exists() {
            return Err(ConfigError::ConfigFileNotFound(path));
        }
        return Ok(Some(path));
    }

    // 2. カレントディレクトリで検索
    let current_dir = std::env::current_dir()?;
    for filename in &LOCAL_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 3. グローバル設定
    Ok(global_config_path().ok().filter(|path| path.exists()))
}

/// 設定を読み込む（ファイルがなければ既定値）
pub fn load_config() -> Result<PortflowConfig> {
    match find_config_file()? {
        Some(path) => load_config_from(&path),
        None => {
            debug!("No config file found, using defaults");
            Ok(PortflowConfig::default())
        }
    }
}

/// 指定したファイルから設定を読み込む
pub fn load_config_from(path: &Path) -> Result<PortflowConfig> {
    debug!("Loading config from {}", path.display());
    if !path.exists() {
        return Err(ConfigError::ConfigFileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let config: PortflowConfig =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
