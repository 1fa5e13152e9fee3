//! 搜索引擎
//!
//! 固定深度的 Minimax + Alpha-Beta 剪枝。
//! 每个分支都在局面副本上展开，兄弟分支互不影响。
//! 同分时保留最先遍历到的走法，同一局面多次搜索结果一致。

use serde::{Deserialize, Serialize};
use tracing::debug;
use xiangqi_core::{apply_to_copies, BoardState, Move, MoveGenerator, PieceKind, Positions, Side};

use crate::evaluate::Evaluator;

/// 将死分值，实际返回 `MATE_SCORE - 层数`，越快将死分值越高
pub const MATE_SCORE: i32 = 100_000;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// 对应的搜索深度
    pub fn depth(&self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "简单",
            Difficulty::Medium => "中等",
            Difficulty::Hard => "困难",
        }
    }
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub max_depth: u8,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            max_depth: difficulty.depth(),
        }
    }

    /// 指定深度（不对应任何难度预设时使用）
    pub fn with_depth(max_depth: u8) -> Self {
        Self {
            difficulty: Difficulty::default(),
            max_depth,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// 搜索结果
///
/// `best_move` 为 `None` 表示走子方无合法走法（或已到叶子节点）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Option<Move>,
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            nodes_searched: 0,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 为当前走子方搜索最佳走法，无合法走法时返回 `None`
    pub fn search(&mut self, state: &BoardState) -> Option<Move> {
        let side = state.side_to_move;
        let (own, other) = state.board.split(side);
        self.best_move(side, own, other, self.config.max_depth, true)
            .best_move
    }

    /// Minimax 入口
    ///
    /// 分值始终以 `side`（即 `own` 所属一方）视角计算。
    /// `is_maximizing` 为真时由 `side` 走子，否则由对方走子。
    pub fn best_move(
        &mut self,
        side: Side,
        own: &Positions,
        other: &Positions,
        depth: u8,
        is_maximizing: bool,
    ) -> SearchResult {
        self.nodes_searched = 0;

        let result = self.minimax(side, own, other, depth, 0, i32::MIN, i32::MAX, is_maximizing);

        debug!(
            "搜索完成: side={}, depth={}, nodes={}, score={}, best={:?}",
            side, depth, self.nodes_searched, result.score, result.best_move
        );

        result
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        side: Side,
        own: &Positions,
        other: &Positions,
        depth: u8,
        ply: i32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> SearchResult {
        self.nodes_searched += 1;

        // 将/帅已被吃（只会出现在外部导入的局面中）
        if !has_general(own) {
            return SearchResult {
                score: -(MATE_SCORE - ply),
                best_move: None,
            };
        }
        if !has_general(other) {
            return SearchResult {
                score: MATE_SCORE - ply,
                best_move: None,
            };
        }

        if depth == 0 {
            return SearchResult {
                score: Evaluator::score(side, own, other),
                best_move: None,
            };
        }

        let (mover, waiting, mover_side) = if maximizing {
            (own, other, side)
        } else {
            (other, own, side.opponent())
        };

        let moves = MoveGenerator::all_legal_moves(mover_side, mover, waiting);

        // 无子可动：走子方负（将死或困毙）
        if moves.is_empty() {
            let score = if maximizing {
                -(MATE_SCORE - ply)
            } else {
                MATE_SCORE - ply
            };
            return SearchResult {
                score,
                best_move: None,
            };
        }

        let mut best = SearchResult {
            score: if maximizing { i32::MIN } else { i32::MAX },
            best_move: None,
        };

        for mv in moves {
            let (next_mover, next_waiting) = apply_to_copies(mover, waiting, mv.from, mv.to);
            let (next_own, next_other) = if maximizing {
                (&next_mover, &next_waiting)
            } else {
                (&next_waiting, &next_mover)
            };

            let score = self
                .minimax(
                    side,
                    next_own,
                    next_other,
                    depth - 1,
                    ply + 1,
                    alpha,
                    beta,
                    !maximizing,
                )
                .score;

            if maximizing {
                if score > best.score {
                    best = SearchResult {
                        score,
                        best_move: Some(mv),
                    };
                }
                alpha = alpha.max(score);
            } else {
                if score < best.score {
                    best = SearchResult {
                        score,
                        best_move: Some(mv),
                    };
                }
                beta = beta.min(score);
            }

            // 剪枝
            if alpha >= beta {
                break;
            }
        }

        best
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

fn has_general(positions: &Positions) -> bool {
    positions.values().any(|kind| *kind == PieceKind::General)
}
