//! ホストポートの自動割り当て
//!
//! パース結果のうち `HostPort = 0` のマッピングに実際のホストポートを割り当てます。
//! ソケットの空き確認は行わず、割り当て済みのポートをメモリ上で管理するだけです。

use crate::error::{PortSpecError, Result};
use crate::model::{PortMapping, PortRange, Protocol};
use std::collections::HashMap;
use std::net::IpAddr;
use tracing::debug;

/// 既定の割り当てプールの先頭
pub const DEFAULT_AUTO_PORT_START: u16 = 49153;
/// 既定の割り当てプールの末尾
pub const DEFAULT_AUTO_PORT_END: u16 = 60999;

/// ホストポートの割り当て器
pub trait HostPortAllocator {
    /// 連続した `count` 個のホストポートを確保する
    fn allocate(&mut self, protocol: Protocol, host_ip: &str, count: usize) -> Result<PortRange>;

    /// 既に使われているポートを登録する
    fn reserve(&mut self, protocol: Protocol, host_ip: &str, port: u16);

    /// 登録済みのポートを解放する
    fn release(&mut self, protocol: Protocol, host_ip: &str, port: u16);
}

/// 予約の照合キー
///
/// 同じアドレスの異なる表記（`::1` と `0:0:0:0:0:0:0:1` など）を同一視するため
/// パースできるものは `IpAddr` で比較し、できないものだけ文字列で比較する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum HostKey {
    Addr(IpAddr),
    Text(String),
}

impl HostKey {
    fn new(host_ip: &str) -> Self {
        match host_ip.parse::<IpAddr>() {
            Ok(addr) => HostKey::Addr(addr.to_canonical()),
            Err(_) => HostKey::Text(host_ip.to_string()),
        }
    }

    /// ワイルドカードアドレスは全アドレスと衝突する
    fn is_wildcard(&self) -> bool {
        matches!(self, HostKey::Addr(addr) if addr.is_unspecified())
    }
}

/// プールの先頭から順に空きを探す割り当て器
///
/// 予約は [`HostPortAllocator::release`] を呼ぶまで保持されます。
/// コンテナ削除後もポートを使い回す場合は、削除したマッピングを
/// [`SequentialAllocator::release_mappings`] で解放してください。
#[derive(Debug, Clone)]
pub struct SequentialAllocator {
    pool: PortRange,
    reserved: HashMap<(Protocol, u16), Vec<HostKey>>,
}

impl SequentialAllocator {
    pub fn new(start: u16, end: u16) -> Result<Self> {
        let pool = PortRange::new(start, end)
            .filter(|_| start != 0)
            .ok_or(PortSpecError::InvalidAllocatorRange { start, end })?;

        Ok(Self {
            pool,
            reserved: HashMap::new(),
        })
    }

    pub fn pool(&self) -> PortRange {
        self.pool
    }

    /// 既存のマッピングが使っているホストポートをまとめて登録
    pub fn reserve_mappings<'a>(&mut self, mappings: impl IntoIterator<Item = &'a PortMapping>) {
        for m in mappings {
            if !m.is_auto_host_port() {
                self.reserve(m.protocol, &m.host_ip, m.host_port);
            }
        }
    }

    /// 不要になったマッピングのホストポートをまとめて解放
    pub fn release_mappings<'a>(&mut self, mappings: impl IntoIterator<Item = &'a PortMapping>) {
        for m in mappings {
            if !m.is_auto_host_port() {
                self.release(m.protocol, &m.host_ip, m.host_port);
            }
        }
    }

    pub fn is_reserved(&self, protocol: Protocol, host_ip: &str, port: u16) -> bool {
        !self.is_free(protocol, &HostKey::new(host_ip), port)
    }

    fn is_free(&self, protocol: Protocol, host: &HostKey, port: u16) -> bool {
        match self.reserved.get(&(protocol, port)) {
            None => true,
            Some(hosts) => {
                !host.is_wildcard() && hosts.iter().all(|h| h != host && !h.is_wildcard())
            }
        }
    }
}

impl Default for SequentialAllocator {
    fn default() -> Self {
        Self {
            pool: PortRange::new(DEFAULT_AUTO_PORT_START, DEFAULT_AUTO_PORT_END)
                .unwrap_or(PortRange::single(DEFAULT_AUTO_PORT_START)),
            reserved: HashMap::new(),
        }
    }
}

impl HostPortAllocator for SequentialAllocator {
    fn allocate(&mut self, protocol: Protocol, host_ip: &str, count: usize) -> Result<PortRange> {
        let exhausted = || PortSpecError::AllocationExhausted { protocol, count };

        if count == 0 || count > self.pool.len() {
            return Err(exhausted());
        }

        let host = HostKey::new(host_ip);
        let mut run_start = None;
        let mut run_len = 0;
        for port in self.pool.iter() {
            if !self.is_free(protocol, &host, port) {
                run_start = None;
                run_len = 0;
                continue;
            }

            let start = *run_start.get_or_insert(port);
            run_len += 1;
            if run_len == count {
                let range = PortRange::new(start, port).ok_or_else(exhausted)?;
                for p in range.iter() {
                    self.reserve(protocol, host_ip, p);
                }
                debug!("Allocated host ports {}/{} on {}", range, protocol, host_ip);
                return Ok(range);
            }
        }

        Err(exhausted())
    }

    fn reserve(&mut self, protocol: Protocol, host_ip: &str, port: u16) {
        let host = HostKey::new(host_ip);
        let hosts = self.reserved.entry((protocol, port)).or_default();
        if !hosts.contains(&host) {
            hosts.push(host);
        }
    }

    fn release(&mut self, protocol: Protocol, host_ip: &str, port: u16) {
        let host = HostKey::new(host_ip);
        if let Some(hosts) = self.reserved.get_mut(&(protocol, port)) {
            hosts.retain(|h| *h != host);
            if hosts.is_empty() {
                self.reserved.remove(&(protocol, port));
            }
        }
    }
}

/// `HostPort = 0` のマッピングにホストポートを割り当てる
///
/// 明示的に指定されたホストポートは先に予約されます。
/// 同じプロトコル・IPでコンテナポートが連続している自動割り当て部分
/// （1つの範囲指定から展開されたもの）には連続したホストポートを割り当てます。
pub fn assign_host_ports<A: HostPortAllocator>(
    mappings: &mut [PortMapping],
    allocator: &mut A,
) -> Result<()> {
    for m in mappings.iter().filter(|m| !m.is_auto_host_port()) {
        allocator.reserve(m.protocol, &m.host_ip, m.host_port);
    }

    let mut i = 0;
    while i < mappings.len() {
        if !mappings[i].is_auto_host_port() {
            i += 1;
            continue;
        }

        let protocol = mappings[i].protocol;
        let host_ip = mappings[i].host_ip.clone();
        let run = mappings[i + 1..]
            .iter()
            .zip(mappings[i..].iter())
            .take_while(|(next, prev)| {
                next.is_auto_host_port()
                    && next.protocol == protocol
                    && next.host_ip == host_ip
                    && prev.container_port.checked_add(1) == Some(next.container_port)
            })
            .count()
            + 1;

        let range = allocator.allocate(protocol, &host_ip, run)?;
        for (m, host_port) in mappings[i..i + run].iter_mut().zip(range.iter()) {
            m.host_port = host_port;
        }
        i += run;
    }

    Ok(())
}
