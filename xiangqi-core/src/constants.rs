//! 规则常量定义

/// 棋盘宽度（列数）
pub const BOARD_FILES: u8 = 9;

/// 棋盘高度（行数）
pub const BOARD_RANKS: u8 = 10;

/// 红方最后一个未过河的行（河界在第 4 行与第 5 行之间）
pub const RIVER_RED_LAST_RANK: u8 = 4;

/// 黑方最后一个未过河的行
pub const RIVER_BLACK_LAST_RANK: u8 = 5;

/// 九宫格列范围
pub const PALACE_FILES: std::ops::RangeInclusive<u8> = 3..=5;

/// 红方九宫格行范围
pub const PALACE_RED_RANKS: std::ops::RangeInclusive<u8> = 0..=2;

/// 黑方九宫格行范围
pub const PALACE_BLACK_RANKS: std::ops::RangeInclusive<u8> = 7..=9;

/// 每方初始时间（毫秒）- 10分钟
pub const INITIAL_TIME_MS: u64 = 10 * 60 * 1000;
