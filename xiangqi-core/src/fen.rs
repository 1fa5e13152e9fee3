//! FEN 格式解析和生成
//!
//! 中国象棋 FEN 格式：
//! `<棋盘> <走子方> <无吃子步数> <回合数>`
//!
//! 棋盘部分从上到下为第 9 行到第 0 行，红方大写、黑方小写。
//! 无吃子步数只做兼容解析，不参与规则。

use crate::board::{Board, BoardState};
use crate::error::{ChessError, Result};
use crate::piece::{Piece, Side, Square};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR r 0 1";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为棋盘状态，并校验棋盘不变量
    pub fn parse(fen: &str) -> Result<BoardState> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let Some(board_part) = parts.first() else {
            return Err(ChessError::InvalidFen {
                reason: "Empty FEN string".to_string(),
            });
        };

        let board = Self::parse_board(board_part)?;
        board.validate().map_err(|e| ChessError::InvalidFen {
            reason: e.to_string(),
        })?;

        // 走子方（默认红方）
        let side_to_move = match parts.get(1) {
            Some(s) => s
                .chars()
                .next()
                .and_then(Side::from_fen_char)
                .ok_or_else(|| ChessError::InvalidFen {
                    reason: format!("Invalid side to move: {}", s),
                })?,
            None => Side::Red,
        };

        // 回合数（默认 1）
        let round = parts.get(3).and_then(|s| s.parse().ok()).unwrap_or(1);

        Ok(BoardState {
            board,
            side_to_move,
            round,
        })
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != 10 {
            return Err(ChessError::InvalidFen {
                reason: format!("Expected 10 rows, got {}", rows.len()),
            });
        }

        for (row_idx, row) in rows.iter().enumerate() {
            let rank = 9 - row_idx as u8;
            let mut file = 0u8;

            for c in row.chars() {
                if file >= 9 {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Row {} has too many columns", row_idx),
                    });
                }

                if let Some(empty) = c.to_digit(10) {
                    file += empty as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.place(Square::new_unchecked(file, rank), piece);
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Invalid piece character: {}", c),
                    });
                }
            }

            if file != 9 {
                return Err(ChessError::InvalidFen {
                    reason: format!("Row {} has {} columns, expected 9", row_idx, file),
                });
            }
        }

        Ok(board)
    }

    /// 将棋盘状态转换为 FEN 字符串
    pub fn to_string(state: &BoardState) -> String {
        format!(
            "{} {} 0 {}",
            Self::board_to_string(&state.board),
            state.side_to_move.to_fen_char(),
            state.round
        )
    }

    /// 将棋盘转换为 FEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(10);

        for rank in (0..10).rev() {
            let mut row = String::new();
            let mut empty_count = 0;

            for file in 0..9 {
                if let Some(piece) = board.piece_at(Square::new_unchecked(file, rank)) {
                    if empty_count > 0 {
                        row.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row.push_str(&empty_count.to_string());
            }

            rows.push(row);
        }

        rows.join("/")
    }
}
