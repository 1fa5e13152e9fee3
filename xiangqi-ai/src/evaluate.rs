//! 棋局评估函数
//!
//! 分值 = 己方（子力 + 位置分）- 对方（子力 + 位置分）。
//! 两方使用同一套计算，因此交换双方时分值取反。

use xiangqi_core::{Board, PieceKind, Positions, Side, Square};

/// 评估器
pub struct Evaluator;

/// 棋子位置分值表（红方视角，黑方需要镜像）
/// 索引为 rank * 9 + file
mod position_tables {
    /// 兵的位置分值
    pub const SOLDIER: [i32; 90] = [
        0,  0,  0,  0,  0,  0,  0,  0,  0,
        0,  0,  0,  0,  0,  0,  0,  0,  0,
        0,  0,  0,  0,  0,  0,  0,  0,  0,
        0,  0,  0,  0,  0,  0,  0,  0,  0,
        2,  6,  8, 12, 14, 12,  8,  6,  2,
       10, 20, 30, 40, 50, 40, 30, 20, 10,  // 过河后价值提升
       20, 40, 60, 80, 90, 80, 60, 40, 20,
       30, 60, 90,110,120,110, 90, 60, 30,
       40, 80,100,120,130,120,100, 80, 40,
       10, 20, 30, 40, 50, 40, 30, 20, 10,  // 底线兵作用有限
    ];

    /// 马的位置分值
    pub const HORSE: [i32; 90] = [
        0, 10, 20, 30, 30, 30, 20, 10,  0,
       10, 30, 40, 50, 50, 50, 40, 30, 10,
       20, 40, 60, 70, 70, 70, 60, 40, 20,
       30, 50, 70, 80, 80, 80, 70, 50, 30,
       40, 60, 80, 90, 90, 90, 80, 60, 40,
       40, 60, 80, 90, 90, 90, 80, 60, 40,
       30, 50, 70, 80, 80, 80, 70, 50, 30,
       20, 40, 60, 70, 70, 70, 60, 40, 20,
       10, 30, 40, 50, 50, 50, 40, 30, 10,
        0, 10, 20, 30, 30, 30, 20, 10,  0,
    ];

    /// 炮的位置分值
    pub const CANNON: [i32; 90] = [
       10, 10, 10, 20, 30, 20, 10, 10, 10,
       10, 20, 30, 40, 50, 40, 30, 20, 10,
       10, 20, 30, 40, 50, 40, 30, 20, 10,
       10, 30, 40, 50, 60, 50, 40, 30, 10,
       10, 40, 50, 60, 70, 60, 50, 40, 10,
       10, 40, 50, 60, 70, 60, 50, 40, 10,
       10, 30, 40, 50, 60, 50, 40, 30, 10,
       10, 20, 30, 40, 50, 40, 30, 20, 10,
       10, 20, 30, 40, 50, 40, 30, 20, 10,
       10, 10, 10, 20, 30, 20, 10, 10, 10,
    ];

    /// 车的位置分值
    pub const CHARIOT: [i32; 90] = [
       10, 20, 20, 40, 50, 40, 20, 20, 10,
       20, 40, 50, 60, 70, 60, 50, 40, 20,
       20, 40, 50, 60, 70, 60, 50, 40, 20,
       30, 50, 60, 70, 80, 70, 60, 50, 30,
       40, 60, 70, 80, 90, 80, 70, 60, 40,
       40, 60, 70, 80, 90, 80, 70, 60, 40,
       30, 50, 60, 70, 80, 70, 60, 50, 30,
       20, 40, 50, 60, 70, 60, 50, 40, 20,
       20, 40, 50, 60, 70, 60, 50, 40, 20,
       10, 20, 20, 40, 50, 40, 20, 20, 10,
    ];
}

impl Evaluator {
    /// 评估局面（`side` 视角，正值对 `side` 有利）
    ///
    /// 满足 `score(side, a, b) == -score(side.opponent(), b, a)`。
    pub fn score(side: Side, own: &Positions, opponent: &Positions) -> i32 {
        Self::side_total(side, own) - Self::side_total(side.opponent(), opponent)
    }

    /// 评估棋盘（`side` 视角）
    pub fn evaluate(board: &Board, side: Side) -> i32 {
        let (own, opponent) = board.split(side);
        Self::score(side, own, opponent)
    }

    /// 仅计算子力差
    pub fn material(own: &Positions, opponent: &Positions) -> i32 {
        Self::material_total(own) - Self::material_total(opponent)
    }

    fn material_total(positions: &Positions) -> i32 {
        positions.values().map(PieceKind::value).sum()
    }

    fn side_total(side: Side, positions: &Positions) -> i32 {
        positions
            .iter()
            .map(|(square, kind)| kind.value() + Self::position_bonus(side, *square, *kind))
            .sum()
    }

    /// 获取位置加成分
    fn position_bonus(side: Side, square: Square, kind: PieceKind) -> i32 {
        let rank = match side {
            Side::Red => square.rank as usize,
            // 黑方需要镜像（行翻转）
            Side::Black => 9 - square.rank as usize,
        };
        let index = rank * 9 + square.file as usize;

        match kind {
            PieceKind::Soldier => position_tables::SOLDIER[index],
            PieceKind::Horse => position_tables::HORSE[index],
            PieceKind::Cannon => position_tables::CANNON[index],
            PieceKind::Chariot => position_tables::CHARIOT[index],
            PieceKind::General | PieceKind::Advisor | PieceKind::Elephant => 0,
        }
    }
}
