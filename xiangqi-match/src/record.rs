//! 棋谱记录格式
//!
//! JSON 格式，记录双方、开局局面、每一步走法和结果。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xiangqi_core::{Move, PieceKind, Side, Square};

use crate::error::Result;
use crate::events::GameResult;

/// 棋谱版本
pub const RECORD_VERSION: &str = "1.0";

/// 走法记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub side: Side,
    /// 起始位置 [file, rank]
    pub from: [u8; 2],
    /// 目标位置 [file, rank]
    pub to: [u8; 2],
    pub piece: PieceKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub captured: Option<PieceKind>,
}

impl MoveRecord {
    /// 创建新的走法记录
    pub fn new(side: Side, mv: Move, piece: PieceKind, captured: Option<PieceKind>) -> Self {
        Self {
            side,
            from: [mv.from.file, mv.from.rank],
            to: [mv.to.file, mv.to.rank],
            piece,
            captured,
        }
    }

    /// 还原为走法，坐标越界时返回 `None`
    pub fn to_move(&self) -> Option<Move> {
        let from = Square::new(self.from[0], self.from[1])?;
        let to = Square::new(self.to[0], self.to[1])?;
        Some(Move::new(from, to))
    }
}

/// 完整的棋谱记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// 版本号
    pub version: String,
    pub red_player: String,
    pub black_player: String,
    pub started_at: DateTime<Utc>,
    /// 初始局面 FEN
    pub initial_fen: String,
    /// 走法列表
    pub moves: Vec<MoveRecord>,
    pub result: Option<GameResult>,
}

impl MatchRecord {
    /// 创建新的棋谱记录
    pub fn new(red_player: String, black_player: String, initial_fen: String) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            red_player,
            black_player,
            started_at: Utc::now(),
            initial_fen,
            moves: Vec::new(),
            result: None,
        }
    }

    /// 添加走法
    pub fn add_move(&mut self, mv: MoveRecord) {
        self.moves.push(mv);
    }

    /// 设置游戏结果
    pub fn set_result(&mut self, result: GameResult) {
        self.result = Some(result);
    }

    /// 吃子次数
    pub fn capture_count(&self) -> usize {
        self.moves.iter().filter(|m| m.captured.is_some()).count()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 写入文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// 以 [`file_name`](Self::file_name) 保存到目录下，返回完整路径
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        self.save_to(&path)?;
        Ok(path)
    }

    /// 从文件读取
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// 默认保存目录：`<data_dir>/xiangqi/records`
    pub fn records_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("xiangqi").join("records"))
    }

    /// 生成文件名
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}vs{}.json",
            self.started_at.format("%Y%m%d_%H%M%S"),
            sanitize_filename(&self.red_player),
            sanitize_filename(&self.black_player)
        )
    }
}

/// 清理文件名中的特殊字符
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::WinReason;
    use tempfile::TempDir;
    use xiangqi_core::INITIAL_FEN;

    fn sample() -> MatchRecord {
        let mut record = MatchRecord::new(
            "玩家".to_string(),
            "电脑（中等）".to_string(),
            INITIAL_FEN.to_string(),
        );
        record.add_move(MoveRecord::new(
            Side::Red,
            Move::new(Square::new_unchecked(7, 2), Square::new_unchecked(4, 2)),
            PieceKind::Cannon,
            None,
        ));
        record.add_move(MoveRecord::new(
            Side::Black,
            Move::new(Square::new_unchecked(1, 7), Square::new_unchecked(1, 0)),
            PieceKind::Cannon,
            Some(PieceKind::Horse),
        ));
        record
    }

    #[test]
    fn test_match_record_json() {
        let mut record = sample();
        record.set_result(GameResult::new(Side::Red, WinReason::Checkmate));

        let json = record.to_json().unwrap();
        assert!(json.contains("\"Checkmate\""));

        let parsed = MatchRecord::from_json(&json).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.capture_count(), 1);
    }

    #[test]
    fn test_move_record() {
        let mv = Move::new(Square::new_unchecked(7, 2), Square::new_unchecked(4, 2));
        let rec = MoveRecord::new(Side::Red, mv, PieceKind::Cannon, None);

        assert_eq!(rec.from, [7, 2]);
        assert_eq!(rec.to_move(), Some(mv));

        let bad = MoveRecord { to: [9, 2], ..rec };
        assert_eq!(bad.to_move(), None);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records").join("game.json");

        let record = sample();
        record.save_to(&path).unwrap();

        let loaded = MatchRecord::load_from(&path).unwrap();
        assert_eq!(loaded.moves.len(), 2);
        assert_eq!(loaded.red_player, "玩家");
        assert!(MatchRecord::from_json("{}").is_err());
    }

    #[test]
    fn test_save_in_reports_unwritable_dir() {
        let dir = TempDir::new().unwrap();
        let record = sample();

        let path = record.save_in(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap().to_str(), Some(record.file_name().as_str()));
        assert!(path.exists());

        // 目录位置是个普通文件，保存失败但记录本身不受影响
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let err = record.save_in(&blocker.join("records")).unwrap_err();
        assert!(matches!(err, crate::error::GameError::Io(_)));
        assert_eq!(record.moves.len(), 2);
    }

    #[test]
    fn test_file_name() {
        let mut record = sample();
        record.red_player = "a/b:c".to_string();

        let name = record.file_name();
        assert!(name.ends_with("_a_b_cvs电脑（中等）.json"), "{}", name);
        assert!(!name.contains('/'));
    }
}
