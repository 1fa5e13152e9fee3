//! 对局设置
//!
//! 以 JSON 格式保存在系统配置目录下：`<config_dir>/xiangqi/settings.json`。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use xiangqi_ai::Difficulty;
use xiangqi_core::Side;

use crate::error::Result;

/// 对局模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// 双人对战（同一终端）
    PlayerVsPlayer,
    /// 人机对战
    #[default]
    PlayerVsComputer,
}

/// 每方时间限制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeLimit {
    /// 10 分钟
    #[default]
    TenMinutes,
    /// 30 分钟
    ThirtyMinutes,
    /// 60 分钟
    SixtyMinutes,
    /// 无限制
    Unlimited,
}

impl TimeLimit {
    /// 转换为毫秒，无限制返回 `None`
    pub fn to_millis(self) -> Option<u64> {
        match self {
            TimeLimit::TenMinutes => Some(10 * 60 * 1000),
            TimeLimit::ThirtyMinutes => Some(30 * 60 * 1000),
            TimeLimit::SixtyMinutes => Some(60 * 60 * 1000),
            TimeLimit::Unlimited => None,
        }
    }

    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TimeLimit::TenMinutes => "10 分钟",
            TimeLimit::ThirtyMinutes => "30 分钟",
            TimeLimit::SixtyMinutes => "60 分钟",
            TimeLimit::Unlimited => "无限制",
        }
    }
}

/// 对局设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub mode: GameMode,
    /// 人机对战时玩家执哪一方
    pub human_side: Side,
    pub difficulty: Difficulty,
    pub time_limit: TimeLimit,
    /// 电脑走棋前的停顿（毫秒）
    pub computer_delay_ms: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            human_side: Side::Red,
            difficulty: Difficulty::Medium,
            time_limit: TimeLimit::default(),
            computer_delay_ms: 400,
        }
    }
}

impl GameSettings {
    /// 获取设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("xiangqi");
            path.push("settings.json");
            path
        })
    }

    /// 从默认位置加载，任何失败都退回默认设置
    pub fn load_or_default() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("无法获取配置目录，使用默认设置");
            return Self::default();
        };

        if !path.exists() {
            info!("设置文件不存在，使用默认设置");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                info!("已加载设置: {:?}", path);
                settings
            }
            Err(e) => {
                warn!("设置文件无效: {}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 从指定文件加载
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 保存到指定文件（自动创建目录）
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        info!("设置已保存: {:?}", path);
        Ok(())
    }

    /// 保存到默认位置
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "config directory unavailable")
        })?;
        self.save_to(&path)
    }

    /// 电脑一方的搜索深度
    pub fn computer_depth(&self) -> u8 {
        self.difficulty.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = GameSettings::default();
        assert_eq!(settings.mode, GameMode::PlayerVsComputer);
        assert_eq!(settings.human_side, Side::Red);
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.computer_depth(), 3);
        assert_eq!(settings.time_limit.to_millis(), Some(600_000));
        assert_eq!(settings.computer_delay_ms, 400);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = GameSettings {
            mode: GameMode::PlayerVsPlayer,
            human_side: Side::Black,
            difficulty: Difficulty::Hard,
            time_limit: TimeLimit::Unlimited,
            computer_delay_ms: 0,
        };
        settings.save_to(&path).unwrap();

        let loaded = GameSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "difficulty": "Easy" }"#).unwrap();

        let loaded = GameSettings::load_from(&path).unwrap();
        assert_eq!(loaded.difficulty, Difficulty::Easy);
        assert_eq!(loaded.time_limit, TimeLimit::TenMinutes);
        assert_eq!(loaded.human_side, Side::Red);
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            GameSettings::load_from(&path),
            Err(crate::error::GameError::Json(_))
        ));
        assert!(matches!(
            GameSettings::load_from(&dir.path().join("missing.json")),
            Err(crate::error::GameError::Io(_))
        ));
    }
}
