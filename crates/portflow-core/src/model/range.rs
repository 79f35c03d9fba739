//! ポート範囲

use std::fmt;
use std::ops::RangeInclusive;

/// 両端を含むポート範囲（単一ポートは start == end）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// start > end の場合は None
    pub fn new(start: u16, end: u16) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    #[inline]
    pub fn start(&self) -> u16 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u16 {
        self.end
    }

    /// 範囲に含まれるポート数
    #[inline]
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    /// 常に1ポート以上を含む
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// end - start
    #[inline]
    pub fn span(&self) -> u16 {
        self.end - self.start
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.start..=self.end).contains(&port)
    }

    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
