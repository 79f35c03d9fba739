use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error("設定ファイルが見つかりません: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("設定ファイルのパースエラー: {path}\n理由: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("無効な設定値: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
