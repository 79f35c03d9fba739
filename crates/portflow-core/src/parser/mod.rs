//! ポート公開指定のパース
//!
//! `-p` / `--publish` に渡される
//! `[HOSTIP:]HOSTPORT[-HOSTPORT2][:CONTAINERPORT[-CONTAINERPORT2]][/PROTO]`
//! 形式の文字列をポートマッピングのリストに変換します。

mod split;

pub use split::*;

use crate::allocator::{HostPortAllocator, SequentialAllocator, assign_host_ports};
use crate::error::Result;
use crate::expander::expand_ranges;
use crate::model::{DEFAULT_HOST_IP, PortMapping};
use tracing::debug;

/// ホストポート自動割り当て時に一度に要求できるポート数の既定上限
///
/// 既定の割り当てプール（49153〜60999）の大きさと同じ。
pub const DEFAULT_MAX_AUTO_RANGE: usize = 11847;

/// パース時のポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// ホストポート自動割り当てで展開できる最大ポート数
    pub max_auto_range: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_auto_range: DEFAULT_MAX_AUTO_RANGE,
        }
    }
}

/// 既定のポリシーで1つのポート指定をパースし、ホストポートまで確定させる
///
/// 自動割り当てのホストポートは既定のプール（49153〜60999）から割り当てます。
/// 複数の指定で割り当てを重複させたくない場合は [`PublishParser`] を使ってください。
pub fn parse_flag_p(spec: &str) -> Result<Vec<PortMapping>> {
    PublishParser::new(ParseOptions::default()).parse(spec)
}

/// 1つのポート指定をパースし、ホストポートを確定させずに返す
///
/// ホストポートを省略した指定（`"3000"`, `"127.0.0.1::80"` など）では
/// `HostPort` は [`crate::AUTO_HOST_PORT`] のまま返ります。
/// 実際のポートは [`assign_host_ports`] で割り当ててください。
pub fn parse_publish_raw(spec: &str, options: &ParseOptions) -> Result<Vec<PortMapping>> {
    let parsed = split_spec(spec)?;
    let host_ip = parsed.host_ip.as_deref().unwrap_or(DEFAULT_HOST_IP);

    let mappings = expand_ranges(
        parsed.host_ports,
        parsed.container_ports,
        host_ip,
        parsed.protocol,
        options,
    )?;

    debug!("Parsed publish spec '{}' into {} mapping(s)", spec, mappings.len());
    Ok(mappings)
}

/// ポリシーと割り当て器を保持したパーサー
///
/// 同じパーサーでパースした指定同士ではホストポートが重複しません。
#[derive(Debug, Clone)]
pub struct PublishParser<A = SequentialAllocator> {
    options: ParseOptions,
    allocator: A,
}

impl PublishParser {
    /// 既定のプールから割り当てるパーサー
    pub fn new(options: ParseOptions) -> Self {
        Self::with_allocator(options, SequentialAllocator::default())
    }
}

impl Default for PublishParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl<A: HostPortAllocator> PublishParser<A> {
    pub fn with_allocator(options: ParseOptions, allocator: A) -> Self {
        Self { options, allocator }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// パースしてホストポートを確定させる
    pub fn parse(&mut self, spec: &str) -> Result<Vec<PortMapping>> {
        let mut mappings = self.parse_raw(spec)?;
        assign_host_ports(&mut mappings, &mut self.allocator)?;
        Ok(mappings)
    }

    /// ホストポートを確定させずにパース
    pub fn parse_raw(&self, spec: &str) -> Result<Vec<PortMapping>> {
        parse_publish_raw(spec, &self.options)
    }

    /// 複数の指定をまとめてパース（1つでも失敗したら全体が失敗）
    ///
    /// 明示的なホストポートを先に予約してから自動割り当てを行います。
    pub fn parse_all<S: AsRef<str>>(&mut self, specs: &[S]) -> Result<Vec<PortMapping>> {
        let mut mappings = self.parse_all_raw(specs)?;
        assign_host_ports(&mut mappings, &mut self.allocator)?;
        Ok(mappings)
    }

    pub fn parse_all_raw<S: AsRef<str>>(&self, specs: &[S]) -> Result<Vec<PortMapping>> {
        let mut mappings = Vec::new();
        for spec in specs {
            mappings.extend(self.parse_raw(spec.as_ref())?);
        }
        Ok(mappings)
    }
}
