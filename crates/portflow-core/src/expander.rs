//! ポート範囲の展開
//!
//! ホスト側・コンテナ側の範囲を1ポートずつのマッピングに展開します。

use crate::error::{PortSpecError, Result};
use crate::model::{AUTO_HOST_PORT, PortMapping, PortRange, Protocol};
use crate::parser::ParseOptions;
use tracing::debug;

/// 範囲を展開してマッピングのリストを生成
///
/// - `host` が `None` の場合はホストポート自動割り当て。コンテナ側の各ポートが
///   `HostPort = 0` のマッピングになり、範囲の大きさは `max_auto_range` で制限される
/// - `host` が指定されている場合は両側の長さが一致している必要がある
///   （片側だけが範囲の場合も不一致として扱う）
pub fn expand_ranges(
    host: Option<PortRange>,
    container: PortRange,
    host_ip: &str,
    protocol: Protocol,
    options: &ParseOptions,
) -> Result<Vec<PortMapping>> {
    let mapping = |host_port: u16, container_port: u16| PortMapping {
        host_port,
        container_port,
        protocol,
        host_ip: host_ip.to_string(),
    };

    let Some(host) = host else {
        if container.len() > options.max_auto_range {
            return Err(PortSpecError::RangeTooLarge {
                requested: container.len(),
                max: options.max_auto_range,
            });
        }
        debug!(
            "Expanding {} container port(s) with auto-assigned host ports",
            container.len()
        );
        return Ok(container
            .iter()
            .map(|port| mapping(AUTO_HOST_PORT, port))
            .collect());
    };

    if host.span() != container.span() {
        return Err(PortSpecError::RangeMismatch {
            host: host.to_string(),
            container: container.to_string(),
        });
    }

    Ok(host
        .iter()
        .zip(container.iter())
        .map(|(h, c)| mapping(h, c))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u16, end: u16) -> PortRange {
        PortRange::new(start, end).unwrap()
    }

    #[test]
    fn test_expand_single_pair() {
        let got = expand_ranges(
            Some(PortRange::single(3000)),
            PortRange::single(8080),
            "0.0.0.0",
            Protocol::Tcp,
            &ParseOptions::default(),
        )
        .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].host_port, 3000);
        assert_eq!(got[0].container_port, 8080);
    }

    #[test]
    fn test_expand_aligned_ranges() {
        let got = expand_ranges(
            Some(range(3000, 3004)),
            range(8080, 8084),
            "127.0.0.1",
            Protocol::Udp,
            &ParseOptions::default(),
        )
        .unwrap();

        assert_eq!(got.len(), 5);
        for (i, m) in got.iter().enumerate() {
            assert_eq!(m.host_port, 3000 + i as u16);
            assert_eq!(m.container_port, 8080 + i as u16);
            assert_eq!(m.protocol, Protocol::Udp);
            assert_eq!(m.host_ip, "127.0.0.1");
        }
    }

    #[test]
    fn test_expand_host_range_with_single_container_port() {
        let err = expand_ranges(
            Some(range(3000, 3001)),
            PortRange::single(8080),
            "0.0.0.0",
            Protocol::Tcp,
            &ParseOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, PortSpecError::RangeMismatch { .. }));
    }

    #[test]
    fn test_expand_single_host_port_with_container_range() {
        let err = expand_ranges(
            Some(PortRange::single(3000)),
            range(8080, 8081),
            "0.0.0.0",
            Protocol::Tcp,
            &ParseOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, PortSpecError::RangeMismatch { .. }));
    }

    #[test]
    fn test_expand_auto_host_ports() {
        let got = expand_ranges(
            None,
            range(80, 81),
            "0.0.0.0",
            Protocol::Tcp,
            &ParseOptions::default(),
        )
        .unwrap();

        assert_eq!(got.len(), 2);
        assert!(got.iter().all(PortMapping::is_auto_host_port));
        assert_eq!(got[0].container_port, 80);
        assert_eq!(got[1].container_port, 81);
    }

    #[test]
    fn test_expand_auto_range_cap_is_inclusive() {
        let options = ParseOptions { max_auto_range: 10 };

        let ok = expand_ranges(None, range(100, 109), "0.0.0.0", Protocol::Tcp, &options);
        assert_eq!(ok.unwrap().len(), 10);

        let err = expand_ranges(None, range(100, 110), "0.0.0.0", Protocol::Tcp, &options)
            .unwrap_err();
        assert!(matches!(
            err,
            PortSpecError::RangeTooLarge {
                requested: 11,
                max: 10
            }
        ));
    }

    #[test]
    fn test_expand_cap_does_not_apply_to_explicit_host_ranges() {
        let options = ParseOptions { max_auto_range: 10 };
        let got = expand_ranges(
            Some(range(22200, 22299)),
            range(22200, 22299),
            "0.0.0.0",
            Protocol::Tcp,
            &options,
        )
        .unwrap();

        assert_eq!(got.len(), 100);
    }
}
