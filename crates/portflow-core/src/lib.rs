//! PortFlow Core
//!
//! `-p` / `--publish` 形式のポート公開指定をパースし、
//! コンテナラベルに保存するポート情報をエンコード/デコードします。

pub mod allocator;
pub mod error;
pub mod expander;
pub mod label;
pub mod model;
pub mod parser;

pub use allocator::*;
pub use error::*;
pub use expander::*;
pub use label::*;
pub use model::*;
pub use parser::*;
