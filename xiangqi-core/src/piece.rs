//! 棋子与坐标定义

use serde::{Deserialize, Serialize};

use crate::constants::{
    BOARD_FILES, BOARD_RANKS, PALACE_BLACK_RANKS, PALACE_FILES, PALACE_RED_RANKS,
    RIVER_BLACK_LAST_RANK, RIVER_RED_LAST_RANK,
};
use crate::error::ChessError;

/// 棋子种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 将/帅
    General,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 马/傌
    Horse,
    /// 车/俥
    Chariot,
    /// 炮/砲
    Cannon,
    /// 兵/卒
    Soldier,
}

impl PieceKind {
    /// 全部棋子种类
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    /// 子力分值（用于 AI 评估）
    ///
    /// 将/帅被吃即终局，不参与子力计算，记 0。
    pub fn value(&self) -> i32 {
        match self {
            PieceKind::General => 0,
            PieceKind::Chariot => 900,
            PieceKind::Cannon => 450,
            PieceKind::Horse => 400,
            PieceKind::Elephant => 200,
            PieceKind::Advisor => 200,
            PieceKind::Soldier => 100,
        }
    }

    /// 获取 FEN 字符（红方大写，黑方小写）
    pub fn to_fen_char(&self, side: Side) -> char {
        let c = match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        };
        match side {
            Side::Red => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceKind, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::Red
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::General,
            'a' => PieceKind::Advisor,
            'b' | 'e' => PieceKind::Elephant,
            'n' | 'h' => PieceKind::Horse,
            'r' => PieceKind::Chariot,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => return None,
        };
        Some((kind, side))
    }

    /// 英文名称
    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::General => "General",
            PieceKind::Advisor => "Advisor",
            PieceKind::Elephant => "Elephant",
            PieceKind::Horse => "Horse",
            PieceKind::Chariot => "Chariot",
            PieceKind::Cannon => "Cannon",
            PieceKind::Soldier => "Soldier",
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 红方（先手，在下方，行 0-4）
    Red,
    /// 黑方（后手，在上方，行 5-9）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// 兵/卒前进方向的行增量
    pub fn forward(&self) -> i8 {
        match self {
            Side::Red => 1,
            Side::Black => -1,
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::Red => 'r',
            Side::Black => 'b',
        }
    }

    /// 从 FEN 字符解析（兼容 w 表示红方）
    pub fn from_fen_char(c: char) -> Option<Side> {
        match c {
            'r' | 'R' | 'w' | 'W' => Some(Side::Red),
            'b' | 'B' => Some(Side::Black),
            _ => None,
        }
    }

    /// 英文名称
    pub fn name(&self) -> &'static str {
        match self {
            Side::Red => "Red",
            Side::Black => "Black",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// 获取棋子显示的汉字
    pub fn display_char(&self) -> char {
        match (self.kind, self.side) {
            (PieceKind::General, Side::Red) => '帥',
            (PieceKind::General, Side::Black) => '將',
            (PieceKind::Advisor, Side::Red) => '仕',
            (PieceKind::Advisor, Side::Black) => '士',
            (PieceKind::Elephant, Side::Red) => '相',
            (PieceKind::Elephant, Side::Black) => '象',
            (PieceKind::Horse, Side::Red) => '傌',
            (PieceKind::Horse, Side::Black) => '馬',
            (PieceKind::Chariot, Side::Red) => '俥',
            (PieceKind::Chariot, Side::Black) => '車',
            (PieceKind::Cannon, Side::Red) => '炮',
            (PieceKind::Cannon, Side::Black) => '砲',
            (PieceKind::Soldier, Side::Red) => '兵',
            (PieceKind::Soldier, Side::Black) => '卒',
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.kind.to_fen_char(self.side)
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceKind::from_fen_char(c).map(|(kind, side)| Piece { kind, side })
    }
}

/// 棋盘坐标
///
/// 排序为先列后行，走法生成和搜索都依赖这个固定的遍历顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSquare")]
pub struct Square {
    /// 列 (0-8)
    pub file: u8,
    /// 行 (0-9)
    pub rank: u8,
}

impl Square {
    /// 创建新坐标
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_FILES && rank < BOARD_RANKS {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// 创建新坐标（不检查边界，内部和测试使用）
    pub const fn new_unchecked(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// 从任意整数坐标创建（越界返回 None，用于处理外部输入）
    pub fn from_coords(file: i32, rank: i32) -> Option<Self> {
        let file = u8::try_from(file).ok()?;
        let rank = u8::try_from(rank).ok()?;
        Self::new(file, rank)
    }

    /// 获取偏移后的坐标，越界返回 None
    pub fn offset(&self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file.checked_add_signed(df)?;
        let rank = self.rank.checked_add_signed(dr)?;
        Self::new(file, rank)
    }

    /// 检查是否在指定阵营的九宫格内
    pub fn is_in_palace(&self, side: Side) -> bool {
        let ranks = match side {
            Side::Red => PALACE_RED_RANKS,
            Side::Black => PALACE_BLACK_RANKS,
        };
        PALACE_FILES.contains(&self.file) && ranks.contains(&self.rank)
    }

    /// 检查是否在指定阵营的己方半场（未过河）
    pub fn is_on_own_half(&self, side: Side) -> bool {
        match side {
            Side::Red => self.rank <= RIVER_RED_LAST_RANK,
            Side::Black => self.rank >= RIVER_BLACK_LAST_RANK,
        }
    }

    /// 对指定阵营而言是否已过河
    pub fn has_crossed_river(&self, side: Side) -> bool {
        !self.is_on_own_half(side)
    }
}

/// 反序列化用的未校验坐标
#[derive(Deserialize)]
struct RawSquare {
    file: u8,
    rank: u8,
}

impl TryFrom<RawSquare> for Square {
    type Error = ChessError;

    fn try_from(raw: RawSquare) -> Result<Self, Self::Error> {
        Square::new(raw.file, raw.rank).ok_or(ChessError::InvalidSquare {
            file: raw.file as i32,
            rank: raw.rank as i32,
        })
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}
