//! 中国象棋规则核心
//!
//! 包含:
//! - 棋子、坐标、棋盘等核心数据结构
//! - 几何走法生成、合法走法过滤
//! - 将军、将死、困毙判定
//! - FEN 局面格式

mod board;
mod constants;
mod error;
mod fen;
mod moves;
mod piece;

pub use board::{apply_to_copies, Board, BoardState, Positions};
pub use constants::*;
pub use error::{ChessError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use moves::{Move, MoveGenerator, Terminal};
pub use piece::{Piece, PieceKind, Side, Square};
