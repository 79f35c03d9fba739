//! ポートラベルのエンコード/デコード
//!
//! 作成済みコンテナのポート公開情報は、コンテナのラベル
//! [`PORTS_LABEL`] に JSON 配列として保存されます。

use crate::error::{PortSpecError, Result};
use crate::model::PortMapping;
use std::collections::HashMap;
use tracing::{debug, warn};

/// ポート情報を保存するラベルキー
pub const PORTS_LABEL: &str = "portflow/ports";

/// マッピングのリストをラベル値にエンコード
pub fn encode_ports_label(mappings: &[PortMapping]) -> Result<String> {
    serde_json::to_string(mappings).map_err(PortSpecError::LabelEncode)
}

/// ラベルからマッピングのリストを復元
///
/// キーが存在しない場合や値が空文字列の場合は空のリストを返します。
/// 値はエンコード時のまま返し、ポート指定としての再検証は行いません。
pub fn parse_ports_label(labels: &HashMap<String, String>) -> Result<Vec<PortMapping>> {
    match labels.get(PORTS_LABEL) {
        Some(value) => decode_ports_label(value),
        None => Ok(Vec::new()),
    }
}

/// ラベル値を直接デコード
pub fn decode_ports_label(value: &str) -> Result<Vec<PortMapping>> {
    if value.is_empty() {
        return Ok(Vec::new());
    }

    let mappings: Vec<PortMapping> = serde_json::from_str(value)
        .inspect_err(|e| warn!("Failed to decode {} label: {}", PORTS_LABEL, e))
        .map_err(PortSpecError::MalformedLabel)?;
    debug!("Decoded {} mapping(s) from {} label", mappings.len(), PORTS_LABEL);
    Ok(mappings)
}
