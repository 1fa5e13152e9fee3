//! 错误类型定义

use thiserror::Error;

/// 象棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 无效的坐标
    #[error("Invalid square: ({file}, {rank})")]
    InvalidSquare { file: i32, rank: i32 },

    /// 无效的走法
    #[error("Illegal move: from ({from_file}, {from_rank}) to ({to_file}, {to_rank})")]
    IllegalMove {
        from_file: u8,
        from_rank: u8,
        to_file: u8,
        to_rank: u8,
    },

    /// 没有棋子
    #[error("No piece at ({file}, {rank})")]
    NoPiece { file: u8, rank: u8 },

    /// 同一格被两个棋子占据
    #[error("Square ({file}, {rank}) is occupied by both sides")]
    SquareOccupied { file: u8, rank: u8 },

    /// 缺少将/帅，或同一方有多个
    #[error("{side} must have exactly one general, found {count}")]
    MissingGeneral { side: &'static str, count: usize },

    /// 两将照面
    #[error("Generals face each other on an open file")]
    GeneralsFacing,

    /// 非走子方正被将军
    #[error("{side} is in check but it is not their turn")]
    WaitingSideInCheck { side: &'static str },

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
