//! モデル定義
//!
//! ポート公開指定のパース結果として扱うデータモデルを定義します。

mod port;
mod range;

// Re-exports
pub use port::*;
pub use range::*;
