//! 吃子记录（被吃棋子托盘）

use serde::{Deserialize, Serialize};
use xiangqi_core::{PieceKind, Side};

/// 双方各自吃掉的棋子，按吃子顺序排列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPieces {
    /// 红方吃掉的黑子
    by_red: Vec<PieceKind>,
    /// 黑方吃掉的红子
    by_black: Vec<PieceKind>,
}

impl CapturedPieces {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次吃子
    pub fn record(&mut self, capturer: Side, kind: PieceKind) {
        match capturer {
            Side::Red => self.by_red.push(kind),
            Side::Black => self.by_black.push(kind),
        }
    }

    /// 指定方吃掉的棋子
    pub fn captured_by(&self, capturer: Side) -> &[PieceKind] {
        match capturer {
            Side::Red => &self.by_red,
            Side::Black => &self.by_black,
        }
    }

    /// 指定方吃子的子力总和
    pub fn material(&self, capturer: Side) -> i32 {
        self.captured_by(capturer).iter().map(PieceKind::value).sum()
    }

    pub fn total(&self) -> usize {
        self.by_red.len() + self.by_black.len()
    }

    pub fn clear(&mut self) {
        self.by_red.clear();
        self.by_black.clear();
    }
}
