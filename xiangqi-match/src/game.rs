//! 对局控制
//!
//! 选子 -> 选落点 -> 提交走法 -> 吃子记录 -> 终局判定 -> 换边，循环往复。
//! 非法的选择不是错误：要么清除当前选择，要么直接忽略。

use tracing::{debug, info, warn};
use xiangqi_ai::AiEngine;
use xiangqi_core::{
    Board, BoardState, ChessError, Fen, Move, MoveGenerator, Side, Square, Terminal,
};

use crate::capture::CapturedPieces;
use crate::error::{GameError, Result};
use crate::events::{GameResult, MatchEvent, MatchSnapshot, WinReason};
use crate::record::{MatchRecord, MoveRecord};
use crate::settings::{GameMode, GameSettings};

/// 一方由谁操控
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Human,
    /// 电脑，参数为搜索深度
    Computer(u8),
}

/// 玩家
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub controller: Controller,
}

impl Player {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controller: Controller::Human,
        }
    }

    pub fn computer(name: impl Into<String>, depth: u8) -> Self {
        Self {
            name: name.into(),
            controller: Controller::Computer(depth),
        }
    }
}

/// 选子状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// 等待选子
    #[default]
    SelectingPiece,
    /// 已选中棋子，`targets` 为其合法落点
    PieceSelected { origin: Square, targets: Vec<Square> },
}

/// 一次选择的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// 选中己方棋子
    Selected { origin: Square, targets: Vec<Square> },
    /// 走子已提交
    Moved(Move),
    /// 选择被清除（越界、空格、对方棋子、非法落点）
    Cleared,
    /// 未处理（已终局或轮到电脑）
    Ignored,
}

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Playing,
    Finished(GameResult),
}

/// 对局
#[derive(Debug)]
pub struct Match {
    state: BoardState,
    red: Player,
    black: Player,
    selection: Selection,
    captured: CapturedPieces,
    status: MatchStatus,
    record: MatchRecord,
    events: Vec<MatchEvent>,
    last_move: Option<Move>,
    /// 最近一次收到的剩余时间 (红, 黑)
    clock: Option<(u64, u64)>,
}

impl Match {
    /// 标准开局
    pub fn new(red: Player, black: Player) -> Self {
        let mut game = Self::build(BoardState::initial(), red, black);
        game.start();
        game
    }

    /// 从给定局面开始
    ///
    /// 局面须通过 [`BoardState::validate`]：非走子方不能正被将军，
    /// 因此将/帅永远不会被吃，终局只由无子可动判定。
    pub fn from_state(state: BoardState, red: Player, black: Player) -> Result<Self> {
        state.validate()?;
        let mut game = Self::build(state, red, black);
        game.start();
        Ok(game)
    }

    /// 按设置创建标准开局
    pub fn from_settings(settings: &GameSettings) -> Self {
        let (red, black) = Self::seat_players(settings);
        Self::new(red, black)
    }

    /// 按设置分配双方玩家
    pub fn seat_players(settings: &GameSettings) -> (Player, Player) {
        match settings.mode {
            GameMode::PlayerVsPlayer => (Player::human("红方玩家"), Player::human("黑方玩家")),
            GameMode::PlayerVsComputer => {
                let computer = Player::computer(
                    format!("电脑（{}）", settings.difficulty.name()),
                    settings.computer_depth(),
                );
                let human = Player::human("玩家");
                match settings.human_side {
                    Side::Red => (human, computer),
                    Side::Black => (computer, human),
                }
            }
        }
    }

    fn build(state: BoardState, red: Player, black: Player) -> Self {
        let record = MatchRecord::new(red.name.clone(), black.name.clone(), Fen::to_string(&state));
        Self {
            state,
            red,
            black,
            selection: Selection::default(),
            captured: CapturedPieces::new(),
            status: MatchStatus::Playing,
            record,
            events: Vec::new(),
            last_move: None,
            clock: None,
        }
    }

    fn start(&mut self) {
        info!("对局开始: 红方 {} vs 黑方 {}", self.red.name, self.black.name);
        self.events.push(MatchEvent::Started {
            red: self.red.name.clone(),
            black: self.black.name.clone(),
        });
        // 导入的局面可能一开始就无子可动
        self.check_terminal();
    }

    /// 处理一次点选（坐标可以越界）
    pub fn select(&mut self, file: i32, rank: i32) -> SelectOutcome {
        if self.is_finished() || self.is_computer_turn() {
            return SelectOutcome::Ignored;
        }

        let Some(square) = Square::from_coords(file, rank) else {
            debug!("选择越界: ({}, {})", file, rank);
            return self.clear_selection();
        };

        // 点中高亮落点则走子
        if let Selection::PieceSelected { origin, targets } = &self.selection {
            if targets.contains(&square) {
                let mv = Move::new(*origin, square);
                return match self.commit(mv) {
                    Ok(()) => SelectOutcome::Moved(mv),
                    Err(e) => {
                        warn!("提交走法失败: {}", e);
                        self.clear_selection()
                    }
                };
            }
        }

        // 选中己方棋子
        if let Some(piece) = self.state.board.piece_at(square) {
            if piece.side == self.state.side_to_move {
                let targets = MoveGenerator::legal_moves_at(&self.state.board, square);
                self.selection = Selection::PieceSelected {
                    origin: square,
                    targets: targets.clone(),
                };
                return SelectOutcome::Selected {
                    origin: square,
                    targets,
                };
            }
        }

        self.clear_selection()
    }

    fn clear_selection(&mut self) -> SelectOutcome {
        self.selection = Selection::SelectingPiece;
        SelectOutcome::Cleared
    }

    /// 直接提交一步走法（须在走子方的合法走法之内）
    pub fn play_move(&mut self, mv: Move) -> Result<()> {
        if self.is_finished() {
            return Err(ChessError::GameOver.into());
        }
        self.commit(mv)
    }

    /// 提交走法：校验、落子、吃子记录、换边、终局判定
    fn commit(&mut self, mv: Move) -> Result<()> {
        let side = self.state.side_to_move;
        let piece = self
            .state
            .board
            .piece_at(mv.from)
            .filter(|p| p.side == side)
            .ok_or(ChessError::NoPiece {
                file: mv.from.file,
                rank: mv.from.rank,
            })?;

        if !MoveGenerator::legal_moves_at(&self.state.board, mv.from).contains(&mv.to) {
            return Err(ChessError::IllegalMove {
                from_file: mv.from.file,
                from_rank: mv.from.rank,
                to_file: mv.to.file,
                to_rank: mv.to.rank,
            }
            .into());
        }

        let captured = self.state.board.apply_move(mv.from, mv.to)?;
        self.selection = Selection::SelectingPiece;
        self.last_move = Some(mv);
        self.record
            .add_move(MoveRecord::new(side, mv, piece.kind, captured));

        info!("{} {} {}", side, piece.kind, mv);
        self.events.push(MatchEvent::MoveApplied {
            side,
            mv,
            piece: piece.kind,
        });

        if let Some(kind) = captured {
            info!("{} 吃掉 {}", side, kind);
            self.captured.record(side, kind);
            self.events.push(MatchEvent::Captured { by: side, kind });
        }

        self.state.switch_turn();
        self.events.push(MatchEvent::ClockSwitched {
            to: self.state.side_to_move,
        });
        self.check_terminal();

        Ok(())
    }

    /// 走子方无合法走法则判负
    fn check_terminal(&mut self) {
        if self.is_finished() {
            return;
        }
        let side = self.state.side_to_move;
        let (own, enemy) = self.state.board.split(side);
        let reason = match MoveGenerator::terminal_state(side, own, enemy) {
            Some(Terminal::Checkmate) => WinReason::Checkmate,
            Some(Terminal::Stalemate) => WinReason::Stalemate,
            None => return,
        };
        self.finish(GameResult::new(side.opponent(), reason));
    }

    fn finish(&mut self, result: GameResult) {
        info!("对局结束: {}", result);
        self.status = MatchStatus::Finished(result);
        self.selection = Selection::SelectingPiece;
        self.record.set_result(result);
        self.events.push(MatchEvent::GameOver(result));
    }

    /// 接收外部计时器的剩余时间，任一方归零则对方胜
    pub fn on_clock(&mut self, red_ms: u64, black_ms: u64) {
        self.clock = Some((red_ms, black_ms));
        if self.is_finished() {
            return;
        }

        let to_move = self.state.side_to_move;
        let remaining = |side: Side| match side {
            Side::Red => red_ms,
            Side::Black => black_ms,
        };

        // 走子方的时钟在走，优先判定
        let flagged = [to_move, to_move.opponent()]
            .into_iter()
            .find(|side| remaining(*side) == 0);

        if let Some(side) = flagged {
            self.finish(GameResult::new(side.opponent(), WinReason::Timeout));
        }
    }

    /// 电脑走一步，返回所走的棋；无子可动时返回 `None`
    pub fn play_computer_turn(&mut self, engine: &mut AiEngine) -> Result<Option<Move>> {
        if self.is_finished() {
            return Err(ChessError::GameOver.into());
        }
        let Controller::Computer(depth) = self.current_player().controller else {
            return Err(GameError::NotComputerTurn);
        };

        let side = self.state.side_to_move;
        let (own, other) = self.state.board.split(side);
        let result = engine.best_move(side, own, other, depth, true);

        let Some(mv) = result.best_move else {
            warn!("{} 没有可走的棋", side);
            return Ok(None);
        };

        debug!(
            "电脑走棋: {} score={} nodes={}",
            mv,
            result.score,
            engine.nodes_searched()
        );
        self.commit(mv)?;
        Ok(Some(mv))
    }

    /// 再来一局：上一局的负方执红先走
    pub fn rematch(&mut self) -> Result<()> {
        let MatchStatus::Finished(result) = self.status else {
            return Err(GameError::MatchNotFinished);
        };

        if result.loser() == Side::Black {
            std::mem::swap(&mut self.red, &mut self.black);
        }

        let red = self.red.clone();
        let black = self.black.clone();
        let events = std::mem::take(&mut self.events);
        *self = Self::build(BoardState::initial(), red, black);
        self.events = events;

        info!("再来一局，{} 执红先走", self.red.name);
        self.start();
        Ok(())
    }

    /// 取出并清空待处理事件
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// 绘制用快照
    pub fn snapshot(&self) -> MatchSnapshot {
        let side = self.state.side_to_move;
        let (own, enemy) = self.state.board.split(side);
        let (selected, highlights) = match &self.selection {
            Selection::SelectingPiece => (None, Vec::new()),
            Selection::PieceSelected { origin, targets } => (Some(*origin), targets.clone()),
        };

        MatchSnapshot {
            board: self.state.board.clone(),
            side_to_move: side,
            round: self.state.round,
            selected,
            highlights,
            last_move: self.last_move,
            in_check: MoveGenerator::in_check(side, own, enemy),
            captured: self.captured.clone(),
            result: self.result(),
            red_time_ms: self.clock.map(|(red, _)| red),
            black_time_ms: self.clock.map(|(_, black)| black),
        }
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn side_to_move(&self) -> Side {
        self.state.side_to_move
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn result(&self) -> Option<GameResult> {
        match self.status {
            MatchStatus::Finished(result) => Some(result),
            MatchStatus::Playing => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, MatchStatus::Finished(_))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    pub fn record(&self) -> &MatchRecord {
        &self.record
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Red => &self.red,
            Side::Black => &self.black,
        }
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.state.side_to_move)
    }

    pub fn is_computer_turn(&self) -> bool {
        matches!(self.current_player().controller, Controller::Computer(_))
    }
}
