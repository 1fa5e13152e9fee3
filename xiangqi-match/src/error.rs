//! 对局层错误类型

use thiserror::Error;
use xiangqi_core::ChessError;

/// 对局错误
#[derive(Debug, Error)]
pub enum GameError {
    /// 规则错误（非法走法、已终局等）
    #[error(transparent)]
    Chess(#[from] ChessError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 对局还没有结果时请求再来一局
    #[error("Match is not finished yet")]
    MatchNotFinished,

    /// 轮到人类走子时请求电脑走棋
    #[error("It is not the computer's turn")]
    NotComputerTurn,
}

pub type Result<T> = std::result::Result<T, GameError>;
