//! ポート指定の字句分割

use crate::error::{PortSpecError, Result};
use crate::model::{PortRange, Protocol};
use std::net::{Ipv4Addr, Ipv6Addr};

/// フィールドごとに分割・検証済みのポート指定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSpec {
    /// 書かれたままのホストIP（IPv6は角括弧を外したもの）
    pub host_ip: Option<String>,
    /// `None` はホストポート自動割り当て
    pub host_ports: Option<PortRange>,
    pub container_ports: PortRange,
    pub protocol: Protocol,
}

/// ポート指定を各フィールドに分割する
///
/// `host:container` と `ip:host:container` の区別はコロン区切りの
/// セグメント数で行います。IPv6アドレスは `[::1]` のように角括弧で囲む必要があります。
pub fn split_spec(spec: &str) -> Result<PublishSpec> {
    if spec.is_empty() {
        return Err(PortSpecError::syntax(spec, "ポート指定が空です"));
    }

    let mut by_slash = spec.split('/');
    let body = by_slash.next().unwrap_or_default();
    let protocol = match by_slash.next() {
        None => Protocol::default(),
        Some("") => return Err(PortSpecError::syntax(spec, "プロトコルが空です")),
        Some(proto) => proto.parse()?,
    };
    if by_slash.next().is_some() {
        return Err(PortSpecError::syntax(spec, "スラッシュが多すぎます"));
    }

    if body.is_empty() {
        return Err(PortSpecError::syntax(spec, "ポートが指定されていません"));
    }

    let (host_ip, host, container) = if let Some(bracketed) = body.strip_prefix('[') {
        split_bracketed(spec, bracketed)?
    } else {
        split_plain(spec, body)?
    };

    if container.is_empty() {
        return Err(PortSpecError::syntax(spec, "コンテナポートが空です"));
    }

    let host_ports = host
        .map(|token| parse_port_range(spec, token))
        .transpose()?;
    let container_ports = parse_port_range(spec, container)?;

    Ok(PublishSpec {
        host_ip,
        host_ports,
        container_ports,
        protocol,
    })
}

type Fields<'a> = (Option<String>, Option<&'a str>, &'a str);

/// `[ipv6]:host:container` 形式
fn split_bracketed<'a>(spec: &str, bracketed: &'a str) -> Result<Fields<'a>> {
    let (ip, rest) = bracketed
        .split_once(']')
        .ok_or_else(|| PortSpecError::syntax(spec, "IPv6アドレスの閉じ括弧がありません"))?;
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| PortSpecError::syntax(spec, "IPv6アドレスの後にポートがありません"))?;

    if ip.parse::<Ipv6Addr>().is_err() {
        return Err(PortSpecError::InvalidIp(ip.to_string()));
    }

    let segments: Vec<&str> = rest.split(':').collect();
    match segments.as_slice() {
        &[host, container] => Ok((Some(ip.to_string()), non_empty(host), container)),
        _ => Err(PortSpecError::syntax(
            spec,
            "IPv6アドレスの後は HOSTPORT:CONTAINERPORT を指定してください",
        )),
    }
}

/// `container` / `host:container` / `ipv4:host:container` 形式
fn split_plain<'a>(spec: &str, body: &'a str) -> Result<Fields<'a>> {
    let segments: Vec<&str> = body.split(':').collect();
    match segments.as_slice() {
        &[container] => Ok((None, None, container)),
        &[host, container] => {
            if host.is_empty() {
                return Err(PortSpecError::syntax(spec, "ホストポートが空です"));
            }
            Ok((None, Some(host), container))
        }
        &[ip, host, container] => {
            if ip.parse::<Ipv4Addr>().is_err() {
                return Err(PortSpecError::InvalidIp(ip.to_string()));
            }
            Ok((Some(ip.to_string()), non_empty(host), container))
        }
        _ => Err(PortSpecError::syntax(spec, "コロンが多すぎます")),
    }
}

// IP指定ありでホストポートが空なら自動割り当て
fn non_empty(token: &str) -> Option<&str> {
    (!token.is_empty()).then_some(token)
}

/// `port` または `start-end` をパース
pub fn parse_port_range(spec: &str, token: &str) -> Result<PortRange> {
    let Some((start, end)) = token.split_once('-') else {
        return parse_port(spec, token).map(PortRange::single);
    };

    let start = parse_port(spec, start)?;
    let end = parse_port(spec, end)?;
    PortRange::new(start, end).ok_or_else(|| {
        PortSpecError::syntax(
            spec,
            format!("ポート範囲 '{}' の開始が終了より大きいです", token),
        )
    })
}

fn parse_port(spec: &str, token: &str) -> Result<u16> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PortSpecError::syntax(
            spec,
            format!("'{}' はポート番号ではありません", token),
        ));
    }

    // 数字のみなので失敗するのは桁あふれだけ
    token
        .parse::<u16>()
        .map_err(|_| PortSpecError::PortOutOfRange(token.to_string()))
}
