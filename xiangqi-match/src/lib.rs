//! 中国象棋对局层
//!
//! 包含:
//! - 对局状态机（选子、走子、吃子、终局、再来一局）
//! - 计时器
//! - 对局设置
//! - 棋谱记录
//! - 终端棋盘绘制

pub mod capture;
pub mod error;
pub mod events;
pub mod game;
pub mod record;
pub mod render;
pub mod settings;
pub mod timer;

pub use capture::CapturedPieces;
pub use error::{GameError, Result};
pub use events::{GameResult, MatchEvent, MatchSnapshot, WinReason};
pub use game::{Controller, Match, MatchStatus, Player, SelectOutcome, Selection};
pub use record::{MatchRecord, MoveRecord};
pub use render::render_board;
pub use settings::{GameMode, GameSettings, TimeLimit};
pub use timer::GameTimer;
