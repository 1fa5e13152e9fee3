//! 计时器
//!
//! 每方一个倒计时，只有走子方的时间在流逝。
//! 对局本身不读时钟，由驱动方把剩余时间通过 `Match::on_clock` 传进去。

use std::time::Instant;

use xiangqi_core::{Side, INITIAL_TIME_MS};

use crate::settings::TimeLimit;

/// 游戏计时器
#[derive(Debug)]
pub struct GameTimer {
    /// 红方剩余时间（毫秒）
    red_time_ms: u64,
    /// 黑方剩余时间（毫秒）
    black_time_ms: u64,
    /// 当前走子方
    current_turn: Side,
    /// 当前回合开始时间
    turn_start: Option<Instant>,
    /// 是否暂停
    paused: bool,
    /// 无限时
    unlimited: bool,
}

impl GameTimer {
    /// 创建新计时器（每方默认 10 分钟）
    pub fn new() -> Self {
        Self::with_time(INITIAL_TIME_MS)
    }

    /// 创建自定义时间的计时器
    pub fn with_time(time_ms: u64) -> Self {
        Self {
            red_time_ms: time_ms,
            black_time_ms: time_ms,
            current_turn: Side::Red,
            turn_start: Some(Instant::now()),
            paused: false,
            unlimited: false,
        }
    }

    /// 不限时（剩余时间恒为 `u64::MAX`）
    pub fn unlimited() -> Self {
        Self {
            unlimited: true,
            ..Self::with_time(u64::MAX)
        }
    }

    /// 按设置中的时间限制创建
    pub fn from_limit(limit: TimeLimit) -> Self {
        match limit.to_millis() {
            Some(ms) => Self::with_time(ms),
            None => Self::unlimited(),
        }
    }

    /// 获取红方剩余时间（毫秒）
    pub fn red_time_ms(&self) -> u64 {
        self.remaining(Side::Red)
    }

    /// 获取黑方剩余时间（毫秒）
    pub fn black_time_ms(&self) -> u64 {
        self.remaining(Side::Black)
    }

    /// 指定方剩余时间（毫秒）
    pub fn remaining(&self, side: Side) -> u64 {
        let base = match side {
            Side::Red => self.red_time_ms,
            Side::Black => self.black_time_ms,
        };
        if self.unlimited || side != self.current_turn || self.paused {
            return base;
        }
        match self.turn_start {
            Some(start) => base.saturating_sub(start.elapsed().as_millis() as u64),
            None => base,
        }
    }

    /// 切换走子方
    pub fn switch_turn(&mut self) {
        // 先结算当前方的剩余时间
        self.settle();
        self.current_turn = self.current_turn.opponent();
        if !self.paused {
            self.turn_start = Some(Instant::now());
        }
    }

    /// 重新开始（再来一局）
    pub fn restart(&mut self, time_ms: Option<u64>) {
        *self = match time_ms {
            Some(ms) => Self::with_time(ms),
            None => Self::unlimited(),
        };
    }

    /// 暂停计时器
    pub fn pause(&mut self) {
        if !self.paused {
            self.settle();
            self.turn_start = None;
            self.paused = true;
        }
    }

    /// 恢复计时器
    pub fn resume(&mut self) {
        if self.paused {
            self.turn_start = Some(Instant::now());
            self.paused = false;
        }
    }

    /// 停止计时器
    pub fn stop(&mut self) {
        self.pause();
    }

    /// 检查是否超时
    pub fn is_timeout(&self, side: Side) -> bool {
        !self.unlimited && self.remaining(side) == 0
    }

    /// 获取当前走子方
    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    /// 是否暂停
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_unlimited(&self) -> bool {
        self.unlimited
    }

    fn settle(&mut self) {
        let remaining = self.remaining(self.current_turn);
        match self.current_turn {
            Side::Red => self.red_time_ms = remaining,
            Side::Black => self.black_time_ms = remaining,
        }
        if !self.paused {
            self.turn_start = Some(Instant::now());
        }
    }
}

impl Default for GameTimer {
    fn default() -> Self {
        Self::new()
    }
}
