//! 中国象棋 AI 引擎
//!
//! 包含:
//! - 棋局评估函数（子力 + 位置分）
//! - Minimax + Alpha-Beta 搜索

mod evaluate;
mod search;

pub use evaluate::Evaluator;
pub use search::{AiConfig, AiEngine, Difficulty, SearchResult, MATE_SCORE};
