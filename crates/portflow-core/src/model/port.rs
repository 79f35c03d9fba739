//! ポートマッピング定義

use crate::error::PortSpecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ホストIP省略時のバインド先
pub const DEFAULT_HOST_IP: &str = "0.0.0.0";

/// 自動割り当て待ちのホストポート
pub const AUTO_HOST_PORT: u16 = 0;

/// ポートマッピング
///
/// ラベルには `HostPort` / `ContainerPort` / `Protocol` / `HostIP` の
/// 4フィールドで保存されます。4フィールドとも必須です。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortMapping {
    #[serde(rename = "HostPort")]
    pub host_port: u16,
    #[serde(rename = "ContainerPort")]
    pub container_port: u16,
    #[serde(rename = "Protocol")]
    pub protocol: Protocol,
    #[serde(rename = "HostIP")]
    pub host_ip: String,
}

impl PortMapping {
    /// ホストポートが自動割り当て待ちかどうか
    pub fn is_auto_host_port(&self) -> bool {
        self.host_port == AUTO_HOST_PORT
    }
}

impl fmt::Display for PortMapping {
    /// `port` コマンドの一覧形式: `80/tcp -> 0.0.0.0:8080`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} -> ", self.container_port, self.protocol)?;
        if self.host_ip.contains(':') {
            write!(f, "[{}]:{}", self.host_ip, self.host_port)
        } else {
            write!(f, "{}:{}", self.host_ip, self.host_port)
        }
    }
}

/// プロトコル種別
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
    Sctp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Sctp => "sctp",
        }
    }
}

impl FromStr for Protocol {
    type Err = PortSpecError;

    /// 書かれたままの小文字表記のみ受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "sctp" => Ok(Protocol::Sctp),
            _ => Err(PortSpecError::InvalidProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
