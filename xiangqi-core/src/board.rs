//! 棋盘状态
//!
//! 棋盘由两张映射组成（红方、黑方各一张），键为坐标，值为棋子种类。
//! 吃子即从对方映射中删除，不保留"死子"字段。

use std::collections::BTreeMap;

use crate::error::{ChessError, Result};
use crate::piece::{Piece, PieceKind, Side, Square};

/// 一方的棋子分布：坐标 -> 棋子种类
///
/// 使用 BTreeMap 保证遍历顺序固定（先列后行），搜索结果因此可复现。
pub type Positions = BTreeMap<Square, PieceKind>;

/// 在副本上执行走法，返回 (己方, 对方) 的新映射
///
/// 不检查规则；起点没有己方棋子时原样返回副本。
pub fn apply_to_copies(
    own: &Positions,
    enemy: &Positions,
    from: Square,
    to: Square,
) -> (Positions, Positions) {
    let mut own = own.clone();
    let mut enemy = enemy.clone();
    if let Some(kind) = own.remove(&from) {
        enemy.remove(&to);
        own.insert(to, kind);
    }
    (own, enemy)
}

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    red: Positions,
    black: Positions,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self::default()
    }

    /// 创建标准开局棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
        ];

        for (side, home, cannon_rank, soldier_rank) in [(Side::Red, 0, 2, 3), (Side::Black, 9, 7, 6)] {
            // 底线：车马相仕帅仕相马车
            for (file, kind) in back_rank.iter().enumerate() {
                board.place(Square::new_unchecked(file as u8, home), Piece::new(*kind, side));
            }

            // 炮
            board.place(Square::new_unchecked(1, cannon_rank), Piece::new(PieceKind::Cannon, side));
            board.place(Square::new_unchecked(7, cannon_rank), Piece::new(PieceKind::Cannon, side));

            // 兵/卒
            for file in (0..9).step_by(2) {
                board.place(
                    Square::new_unchecked(file, soldier_rank),
                    Piece::new(PieceKind::Soldier, side),
                );
            }
        }

        board
    }

    /// 由两张映射构建棋盘，并校验不变量
    pub fn from_positions(red: Positions, black: Positions) -> Result<Self> {
        let board = Self { red, black };
        board.validate()?;
        Ok(board)
    }

    /// 获取指定阵营的棋子分布
    pub fn positions(&self, side: Side) -> &Positions {
        match side {
            Side::Red => &self.red,
            Side::Black => &self.black,
        }
    }

    /// 获取 (己方, 对方) 的棋子分布
    pub fn split(&self, side: Side) -> (&Positions, &Positions) {
        match side {
            Side::Red => (&self.red, &self.black),
            Side::Black => (&self.black, &self.red),
        }
    }

    fn split_mut(&mut self, side: Side) -> (&mut Positions, &mut Positions) {
        match side {
            Side::Red => (&mut self.red, &mut self.black),
            Side::Black => (&mut self.black, &mut self.red),
        }
    }

    /// 获取指定位置的棋子
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if let Some(kind) = self.red.get(&square) {
            Some(Piece::new(*kind, Side::Red))
        } else {
            self.black.get(&square).map(|kind| Piece::new(*kind, Side::Black))
        }
    }

    /// 指定位置是否有棋子
    pub fn is_occupied(&self, square: Square) -> bool {
        self.red.contains_key(&square) || self.black.contains_key(&square)
    }

    /// 放置棋子（覆盖该格原有棋子，用于摆局）
    pub fn place(&mut self, square: Square, piece: Piece) {
        let (own, enemy) = self.split_mut(piece.side);
        enemy.remove(&square);
        own.insert(square, piece.kind);
    }

    /// 移除棋子
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        if let Some(kind) = self.red.remove(&square) {
            return Some(Piece::new(kind, Side::Red));
        }
        self.black.remove(&square).map(|kind| Piece::new(kind, Side::Black))
    }

    /// 移动棋子（不检查走法规则），返回被吃掉的棋子种类
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<Option<PieceKind>> {
        let piece = self.piece_at(from).ok_or(ChessError::NoPiece {
            file: from.file,
            rank: from.rank,
        })?;

        let (own, enemy) = self.split_mut(piece.side);
        if from == to || own.contains_key(&to) {
            return Err(ChessError::IllegalMove {
                from_file: from.file,
                from_rank: from.rank,
                to_file: to.file,
                to_rank: to.rank,
            });
        }

        own.remove(&from);
        let captured = enemy.remove(&to);
        own.insert(to, piece.kind);

        debug_assert!(self.validate_occupancy().is_ok(), "board occupancy invariant broken");
        Ok(captured)
    }

    /// 查找指定阵营的将/帅位置
    pub fn general(&self, side: Side) -> Option<Square> {
        find_general(self.positions(side))
    }

    /// 检查两个将是否面对面（飞将）
    pub fn generals_facing(&self) -> bool {
        crate::moves::MoveGenerator::generals_facing(&self.red, &self.black)
    }

    /// 指定阵营的棋子数
    pub fn piece_count(&self, side: Side) -> usize {
        self.positions(side).len()
    }

    /// 获取所有棋子（先红后黑）
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        self.red
            .iter()
            .map(|(sq, kind)| (*sq, Piece::new(*kind, Side::Red)))
            .chain(self.black.iter().map(|(sq, kind)| (*sq, Piece::new(*kind, Side::Black))))
            .collect()
    }

    /// 校验不变量：无重叠，且每方恰好一个将/帅，且坐标都在棋盘内
    pub fn validate(&self) -> Result<()> {
        self.validate_occupancy()?;
        for side in [Side::Red, Side::Black] {
            let count = self
                .positions(side)
                .values()
                .filter(|kind| **kind == PieceKind::General)
                .count();
            if count != 1 {
                return Err(ChessError::MissingGeneral {
                    side: side.name(),
                    count,
                });
            }
        }
        Ok(())
    }

    fn validate_occupancy(&self) -> Result<()> {
        for square in self.red.keys().chain(self.black.keys()) {
            if Square::new(square.file, square.rank).is_none() {
                return Err(ChessError::InvalidSquare {
                    file: square.file as i32,
                    rank: square.rank as i32,
                });
            }
        }
        if let Some(square) = self.red.keys().find(|sq| self.black.contains_key(sq)) {
            return Err(ChessError::SquareOccupied {
                file: square.file,
                rank: square.rank,
            });
        }
        Ok(())
    }
}

/// 棋盘状态（棋盘 + 走子方）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub side_to_move: Side,
    /// 完整回合数（黑方走完后 +1）
    pub round: u32,
}

impl BoardState {
    /// 创建初始状态（红方先走）
    pub fn initial() -> Self {
        Self::from_board(Board::initial(), Side::Red)
    }

    /// 从棋盘创建状态
    pub fn from_board(board: Board, side_to_move: Side) -> Self {
        Self {
            board,
            side_to_move,
            round: 1,
        }
    }

    /// 校验局面能否作为对局起点
    ///
    /// 除棋盘不变量外，两将不能照面，非走子方也不能处于被将军状态。
    pub fn validate(&self) -> Result<()> {
        self.board.validate()?;
        if self.board.generals_facing() {
            return Err(ChessError::GeneralsFacing);
        }
        let waiting = self.side_to_move.opponent();
        let (own, enemy) = self.board.split(waiting);
        if crate::moves::MoveGenerator::in_check(waiting, own, enemy) {
            return Err(ChessError::WaitingSideInCheck {
                side: waiting.name(),
            });
        }
        Ok(())
    }

    /// 切换走子方
    pub fn switch_turn(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
        if self.side_to_move == Side::Red {
            self.round += 1;
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}

/// 在一方的映射中查找将/帅
pub(crate) fn find_general(positions: &Positions) -> Option<Square> {
    positions
        .iter()
        .find(|(_, kind)| **kind == PieceKind::General)
        .map(|(sq, _)| *sq)
}
