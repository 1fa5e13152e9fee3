//! 对局对外发出的通知
//!
//! 展示层（终端、界面）只通过这些类型了解对局：
//! 走子、吃子、切换计时、终局，以及用于绘制的快照。

use serde::{Deserialize, Serialize};
use xiangqi_core::{Board, Move, PieceKind, Side, Square};

use crate::capture::CapturedPieces;

/// 胜利原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    /// 将死
    Checkmate,
    /// 困毙（无子可动，未被将军）
    Stalemate,
    /// 对方超时
    Timeout,
}

impl WinReason {
    pub fn display_name(&self) -> &'static str {
        match self {
            WinReason::Checkmate => "将死",
            WinReason::Stalemate => "困毙",
            WinReason::Timeout => "超时",
        }
    }
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Side,
    pub reason: WinReason,
}

impl GameResult {
    pub fn new(winner: Side, reason: WinReason) -> Self {
        Self { winner, reason }
    }

    pub fn loser(&self) -> Side {
        self.winner.opponent()
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let winner = match self.winner {
            Side::Red => "红方",
            Side::Black => "黑方",
        };
        write!(f, "{}胜（{}）", winner, self.reason.display_name())
    }
}

/// 对局事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// 新对局开始
    Started { red: String, black: String },
    /// 走子已提交
    MoveApplied {
        side: Side,
        mv: Move,
        piece: PieceKind,
    },
    /// 吃子（`by` 为吃子方）
    Captured { by: Side, kind: PieceKind },
    /// 轮到 `to` 走子，外部计时器应切换
    ClockSwitched { to: Side },
    /// 对局结束
    GameOver(GameResult),
}

/// 绘制用快照
#[derive(Debug, Clone)]
pub struct MatchSnapshot {
    pub board: Board,
    pub side_to_move: Side,
    pub round: u32,
    /// 当前选中的棋子
    pub selected: Option<Square>,
    /// 选中棋子的合法落点
    pub highlights: Vec<Square>,
    pub last_move: Option<Move>,
    /// 走子方是否被将军
    pub in_check: bool,
    pub captured: CapturedPieces,
    pub result: Option<GameResult>,
    /// 最近一次收到的剩余时间
    pub red_time_ms: Option<u64>,
    pub black_time_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_display() {
        let result = GameResult::new(Side::Black, WinReason::Checkmate);
        assert_eq!(result.loser(), Side::Red);
        assert_eq!(result.to_string(), "黑方胜（将死）");
    }

    #[test]
    fn test_result_json() {
        let result = GameResult::new(Side::Red, WinReason::Timeout);
        let json = serde_json::to_string(&result).unwrap();
        let parsed: GameResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
