use thiserror::Error;

use crate::model::Protocol;

#[derive(Error, Debug)]
pub enum PortSpecError {
    #[error(
        "ポート指定の構文エラー: '{spec}'\n理由: {reason}\n\nヒント:\n  • 書式: [HOSTIP:]HOSTPORT[-HOSTPORT2][:CONTAINERPORT[-CONTAINERPORT2]][/PROTO]\n  • IPv6アドレスは [::1] のように角括弧で囲んでください"
    )]
    Syntax { spec: String, reason: String },

    #[error("無効なプロトコル: '{0}'（tcp, udp, sctp のいずれかを指定してください）")]
    InvalidProtocol(String),

    #[error("無効なIPアドレス: '{0}'")]
    InvalidIp(String),

    #[error("ポート番号が範囲外です: {0}（0〜65535 で指定してください）")]
    PortOutOfRange(String),

    #[error(
        "ホストポートとコンテナポートの範囲が一致しません: {host} と {container}\n\nヒント:\n  • 両方の範囲を同じ長さにしてください（例: 3000-3001:8080-8081）"
    )]
    RangeMismatch { host: String, container: String },

    #[error(
        "自動割り当てするポート範囲が大きすぎます: {requested} ポート（上限 {max}）\n\nヒント:\n  • ホストポートを明示的に指定してください\n  • 上限は --max-auto-range で変更できます"
    )]
    RangeTooLarge { requested: usize, max: usize },

    #[error("ポートラベルの形式が不正です: {0}")]
    MalformedLabel(#[source] serde_json::Error),

    #[error("ポートラベルのエンコードに失敗しました: {0}")]
    LabelEncode(#[source] serde_json::Error),

    #[error("ホストポートを割り当てられません: {protocol} で連続した {count} ポートの空きがありません")]
    AllocationExhausted { protocol: Protocol, count: usize },

    #[error("割り当て用ポート範囲が不正です: {start}-{end}")]
    InvalidAllocatorRange { start: u16, end: u16 },
}

impl PortSpecError {
    pub(crate) fn syntax(spec: &str, reason: impl Into<String>) -> Self {
        PortSpecError::Syntax {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortSpecError>;
