//! 走法生成和验证
//!
//! 三层结构：
//! - 几何走法：只看棋子走法与阻挡规则（蹩马腿、塞象眼、炮架等）
//! - 合法走法：在几何走法基础上，剔除走后己方被将军或两将照面的走法
//! - 将军/终局判定：基于以上两层

use serde::{Deserialize, Serialize};

use crate::board::{find_general, Board, Positions};
use crate::piece::{PieceKind, Side, Square};

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始位置
    pub from: Square,
    /// 目标位置
    pub to: Square,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 无合法走法时的终局类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terminal {
    /// 被将军且无子可动
    Checkmate,
    /// 未被将军但无子可动（困毙）
    Stalemate,
}

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 马的 8 个跳法和对应的马腿偏移
const HORSE_JUMPS: [((i8, i8), (i8, i8)); 8] = [
    ((1, 2), (0, 1)),
    ((2, 1), (1, 0)),
    ((2, -1), (1, 0)),
    ((1, -2), (0, -1)),
    ((-1, -2), (0, -1)),
    ((-2, -1), (-1, 0)),
    ((-2, 1), (-1, 0)),
    ((-1, 2), (0, 1)),
];

/// 双方占位视图
struct Occupancy<'a> {
    own: &'a Positions,
    enemy: &'a Positions,
}

impl Occupancy<'_> {
    fn is_occupied(&self, square: Square) -> bool {
        self.own.contains_key(&square) || self.enemy.contains_key(&square)
    }

    fn is_enemy(&self, square: Square) -> bool {
        self.enemy.contains_key(&square)
    }

    /// 目标不是己方棋子即可加入（空位或吃子）
    fn try_add(&self, to: Square, targets: &mut Vec<Square>) {
        if !self.own.contains_key(&to) {
            targets.push(to);
        }
    }
}

/// 单种棋子的几何走法生成函数
type Geometry = fn(&Occupancy<'_>, Side, Square, &mut Vec<Square>);

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 按棋子种类查表得到几何走法生成函数
    fn geometry(kind: PieceKind) -> Geometry {
        match kind {
            PieceKind::General => Self::general_moves,
            PieceKind::Advisor => Self::advisor_moves,
            PieceKind::Elephant => Self::elephant_moves,
            PieceKind::Horse => Self::horse_moves,
            PieceKind::Chariot => Self::chariot_moves,
            PieceKind::Cannon => Self::cannon_moves,
            PieceKind::Soldier => Self::soldier_moves,
        }
    }

    /// 几何走法（不考虑将军），纯函数
    ///
    /// 结果中不含重复坐标，顺序固定，永远不含己方棋子所在格。
    pub fn geometric_moves(
        kind: PieceKind,
        side: Side,
        origin: Square,
        own: &Positions,
        enemy: &Positions,
    ) -> Vec<Square> {
        let occupancy = Occupancy { own, enemy };
        let mut targets = Vec::with_capacity(17);
        Self::geometry(kind)(&occupancy, side, origin, &mut targets);
        targets
    }

    /// 合法走法：几何走法中，走后己方不被将军且两将不照面的目标
    ///
    /// 在副本上模拟，不修改传入的映射。
    pub fn legal_moves(
        kind: PieceKind,
        side: Side,
        origin: Square,
        own: &Positions,
        enemy: &Positions,
    ) -> Vec<Square> {
        Self::geometric_moves(kind, side, origin, own, enemy)
            .into_iter()
            .filter(|to| {
                let (own_after, enemy_after) = Self::simulate(kind, origin, *to, own, enemy);
                !Self::in_check(side, &own_after, &enemy_after)
                    && !Self::generals_facing(&own_after, &enemy_after)
            })
            .collect()
    }

    /// 一方所有棋子的全部合法走法
    ///
    /// 顺序：按棋子坐标升序，再按各棋子的目标生成顺序。
    pub fn all_legal_moves(side: Side, own: &Positions, enemy: &Positions) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (origin, kind) in own {
            moves.extend(
                Self::legal_moves(*kind, side, *origin, own, enemy)
                    .into_iter()
                    .map(|to| Move::new(*origin, to)),
            );
        }
        moves
    }

    /// 棋盘上指定格棋子的合法走法；空格返回空列表
    pub fn legal_moves_at(board: &Board, origin: Square) -> Vec<Square> {
        match board.piece_at(origin) {
            Some(piece) => {
                let (own, enemy) = board.split(piece.side);
                Self::legal_moves(piece.kind, piece.side, origin, own, enemy)
            }
            None => Vec::new(),
        }
    }

    /// 检查指定阵营是否被将军
    ///
    /// 任一对方棋子的几何走法（不做自将过滤）包含己方将/帅所在格即为将军。
    /// 己方没有将/帅时视为不被将军。
    pub fn in_check(side: Side, own: &Positions, enemy: &Positions) -> bool {
        let Some(general) = find_general(own) else {
            return false;
        };

        let attacker = side.opponent();
        enemy.iter().any(|(origin, kind)| {
            Self::geometric_moves(*kind, attacker, *origin, enemy, own).contains(&general)
        })
    }

    /// 检查两个将是否在同一列且中间无子（飞将）
    pub fn generals_facing(own: &Positions, enemy: &Positions) -> bool {
        let (Some(a), Some(b)) = (find_general(own), find_general(enemy)) else {
            return false;
        };

        // 必须在同一列
        if a.file != b.file {
            return false;
        }

        let (low, high) = if a.rank < b.rank {
            (a.rank, b.rank)
        } else {
            (b.rank, a.rank)
        };

        ((low + 1)..high).all(|rank| {
            let square = Square::new_unchecked(a.file, rank);
            !own.contains_key(&square) && !enemy.contains_key(&square)
        })
    }

    /// 指定阵营是否还有任一合法走法
    pub fn has_any_legal_move(side: Side, own: &Positions, enemy: &Positions) -> bool {
        own.iter()
            .any(|(origin, kind)| !Self::legal_moves(*kind, side, *origin, own, enemy).is_empty())
    }

    /// 终局判定：无合法走法时区分将死与困毙，否则返回 None
    pub fn terminal_state(side: Side, own: &Positions, enemy: &Positions) -> Option<Terminal> {
        if Self::has_any_legal_move(side, own, enemy) {
            return None;
        }
        if Self::in_check(side, own, enemy) {
            Some(Terminal::Checkmate)
        } else {
            Some(Terminal::Stalemate)
        }
    }

    /// 在副本上执行走法
    fn simulate(
        kind: PieceKind,
        origin: Square,
        to: Square,
        own: &Positions,
        enemy: &Positions,
    ) -> (Positions, Positions) {
        let mut own = own.clone();
        let mut enemy = enemy.clone();
        own.remove(&origin);
        own.insert(to, kind);
        enemy.remove(&to);
        (own, enemy)
    }

    /// 将/帅：九宫内直走一步
    fn general_moves(occ: &Occupancy<'_>, side: Side, origin: Square, targets: &mut Vec<Square>) {
        for (df, dr) in ORTHOGONAL {
            if let Some(to) = origin.offset(df, dr) {
                if to.is_in_palace(side) {
                    occ.try_add(to, targets);
                }
            }
        }
    }

    /// 士/仕：九宫内斜走一步
    fn advisor_moves(occ: &Occupancy<'_>, side: Side, origin: Square, targets: &mut Vec<Square>) {
        for (df, dr) in DIAGONAL {
            if let Some(to) = origin.offset(df, dr) {
                if to.is_in_palace(side) {
                    occ.try_add(to, targets);
                }
            }
        }
    }

    /// 象/相：斜走两步，不过河，象眼被堵不能走
    fn elephant_moves(occ: &Occupancy<'_>, side: Side, origin: Square, targets: &mut Vec<Square>) {
        for (df, dr) in DIAGONAL {
            let Some(eye) = origin.offset(df, dr) else {
                continue;
            };
            if occ.is_occupied(eye) {
                continue;
            }
            if let Some(to) = origin.offset(df * 2, dr * 2) {
                if to.is_on_own_half(side) {
                    occ.try_add(to, targets);
                }
            }
        }
    }

    /// 马：日字，马腿被堵不能走
    fn horse_moves(occ: &Occupancy<'_>, _side: Side, origin: Square, targets: &mut Vec<Square>) {
        for ((df, dr), (lf, lr)) in HORSE_JUMPS {
            let Some(leg) = origin.offset(lf, lr) else {
                continue;
            };
            if occ.is_occupied(leg) {
                continue;
            }
            if let Some(to) = origin.offset(df, dr) {
                occ.try_add(to, targets);
            }
        }
    }

    /// 车：直线滑行，遇子停下，可吃第一个敌子
    fn chariot_moves(occ: &Occupancy<'_>, _side: Side, origin: Square, targets: &mut Vec<Square>) {
        for (df, dr) in ORTHOGONAL {
            let mut current = origin;
            while let Some(to) = current.offset(df, dr) {
                if occ.is_occupied(to) {
                    if occ.is_enemy(to) {
                        targets.push(to);
                    }
                    break;
                }
                targets.push(to);
                current = to;
            }
        }
    }

    /// 炮：不吃子时同车；吃子需恰好隔一子（炮架）
    fn cannon_moves(occ: &Occupancy<'_>, _side: Side, origin: Square, targets: &mut Vec<Square>) {
        for (df, dr) in ORTHOGONAL {
            let mut current = origin;
            let mut screened = false;

            while let Some(to) = current.offset(df, dr) {
                if occ.is_occupied(to) {
                    if screened {
                        // 炮架后的第一个棋子，敌子可吃
                        if occ.is_enemy(to) {
                            targets.push(to);
                        }
                        break;
                    }
                    screened = true;
                } else if !screened {
                    targets.push(to);
                }
                current = to;
            }
        }
    }

    /// 兵/卒：过河前只能前进，过河后可左右，永不后退
    fn soldier_moves(occ: &Occupancy<'_>, side: Side, origin: Square, targets: &mut Vec<Square>) {
        if let Some(to) = origin.offset(0, side.forward()) {
            occ.try_add(to, targets);
        }

        if origin.has_crossed_river(side) {
            for df in [-1i8, 1i8] {
                if let Some(to) = origin.offset(df, 0) {
                    occ.try_add(to, targets);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::fen::Fen;
    use crate::piece::Piece;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sq(file: u8, rank: u8) -> Square {
        Square::new_unchecked(file, rank)
    }

    fn geometric_at(board: &Board, origin: Square) -> Vec<Square> {
        let piece = board.piece_at(origin).expect("no piece at origin");
        let (own, enemy) = board.split(piece.side);
        MoveGenerator::geometric_moves(piece.kind, piece.side, origin, own, enemy)
    }

    fn single(kind: PieceKind, side: Side, origin: Square) -> Board {
        let mut board = Board::empty();
        board.place(origin, Piece::new(kind, side));
        board
    }

    #[test]
    fn test_initial_moves() {
        let state = BoardState::initial();
        let (own, enemy) = state.board.split(Side::Red);
        let moves = MoveGenerator::all_legal_moves(Side::Red, own, enemy);

        // 炮二平五
        assert!(moves.contains(&Move::new(sq(7, 2), sq(4, 2))));
    }

    #[test]
    fn test_initial_move_count() {
        // 炮 2x12 + 马 2x2 + 车 2x2 + 兵 5 + 相 2x2 + 仕 2x1 + 帅 1 = 44
        let state = BoardState::initial();
        let (own, enemy) = state.board.split(Side::Red);
        assert_eq!(MoveGenerator::all_legal_moves(Side::Red, own, enemy).len(), 44);

        let (own, enemy) = state.board.split(Side::Black);
        assert_eq!(MoveGenerator::all_legal_moves(Side::Black, own, enemy).len(), 44);
    }

    #[test]
    fn test_general_moves() {
        let board = single(PieceKind::General, Side::Red, sq(4, 1));
        assert_eq!(geometric_at(&board, sq(4, 1)).len(), 4);

        // 九宫角落只有 2 个方向
        let board = single(PieceKind::General, Side::Red, sq(3, 0));
        let moves = geometric_at(&board, sq(3, 0));
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|to| to.is_in_palace(Side::Red)));

        // 黑将同样受九宫限制
        let board = single(PieceKind::General, Side::Black, sq(5, 7));
        let moves = geometric_at(&board, sq(5, 7));
        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&sq(4, 7)));
        assert!(moves.contains(&sq(5, 8)));
    }

    #[test]
    fn test_advisor_moves() {
        let board = single(PieceKind::Advisor, Side::Red, sq(4, 1));
        assert_eq!(geometric_at(&board, sq(4, 1)).len(), 4);

        // 角落只能回到中心
        let board = single(PieceKind::Advisor, Side::Red, sq(3, 0));
        assert_eq!(geometric_at(&board, sq(3, 0)), vec![sq(4, 1)]);
    }

    #[test]
    fn test_elephant_moves() {
        let board = single(PieceKind::Elephant, Side::Red, sq(2, 0));
        let moves = geometric_at(&board, sq(2, 0));
        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&sq(4, 2)));
        assert!(moves.contains(&sq(0, 2)));
    }

    #[test]
    fn test_elephant_blocked_eye() {
        let mut board = single(PieceKind::Elephant, Side::Red, sq(2, 0));
        // 敌方棋子塞象眼同样有效
        board.place(sq(3, 1), Piece::new(PieceKind::Soldier, Side::Black));

        assert_eq!(geometric_at(&board, sq(2, 0)), vec![sq(0, 2)]);
    }

    #[test]
    fn test_elephant_cannot_cross_river() {
        let board = single(PieceKind::Elephant, Side::Red, sq(4, 4));
        let moves = geometric_at(&board, sq(4, 4));
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|to| to.rank < 5), "相不能过河: {:?}", moves);

        let board = single(PieceKind::Elephant, Side::Black, sq(2, 5));
        let moves = geometric_at(&board, sq(2, 5));
        assert!(moves.iter().all(|to| to.rank >= 5), "象不能过河: {:?}", moves);
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn test_horse_moves() {
        let board = single(PieceKind::Horse, Side::Red, sq(4, 4));
        assert_eq!(geometric_at(&board, sq(4, 4)).len(), 8);
    }

    #[test]
    fn test_horse_leg_blocks_even_with_empty_destination() {
        let mut board = single(PieceKind::Horse, Side::Red, sq(4, 4));
        // 马腿 (5, 4) 被堵，(6, 5) 和 (6, 3) 都不能走，虽然目标是空的
        board.place(sq(5, 4), Piece::new(PieceKind::Soldier, Side::Black));
        let moves = geometric_at(&board, sq(4, 4));

        assert_eq!(moves.len(), 6);
        assert!(!moves.contains(&sq(6, 5)));
        assert!(!moves.contains(&sq(6, 3)));
        // 同样是 +1 列，但长边沿行方向，马腿是 (4, 5)，未被堵
        assert!(moves.contains(&sq(5, 6)));
    }

    #[test]
    fn test_horse_all_blocked() {
        let mut board = single(PieceKind::Horse, Side::Red, sq(4, 4));
        for leg in [sq(4, 5), sq(4, 3), sq(5, 4), sq(3, 4)] {
            board.place(leg, Piece::new(PieceKind::Soldier, Side::Red));
        }
        assert!(geometric_at(&board, sq(4, 4)).is_empty());
    }

    #[test]
    fn test_chariot_moves() {
        let board = single(PieceKind::Chariot, Side::Red, sq(4, 4));
        // 4 + 5 + 4 + 4 = 17
        assert_eq!(geometric_at(&board, sq(4, 4)).len(), 17);
    }

    #[test]
    fn test_chariot_blocked_and_capture() {
        let mut board = single(PieceKind::Chariot, Side::Red, sq(4, 4));
        board.place(sq(4, 6), Piece::new(PieceKind::Soldier, Side::Red));
        board.place(sq(6, 4), Piece::new(PieceKind::Soldier, Side::Black));
        let moves = geometric_at(&board, sq(4, 4));

        assert!(moves.contains(&sq(4, 5)));
        assert!(!moves.contains(&sq(4, 6)));
        assert!(!moves.contains(&sq(4, 7)));
        assert!(moves.contains(&sq(6, 4)));
        assert!(!moves.contains(&sq(7, 4)));
        // 上 1 + 下 4 + 左 4 + 右 2
        assert_eq!(moves.len(), 11);
    }

    #[test]
    fn test_cannon_moves_like_chariot_when_clear() {
        let board = single(PieceKind::Cannon, Side::Red, sq(4, 4));
        assert_eq!(geometric_at(&board, sq(4, 4)).len(), 17);
    }

    #[test]
    fn test_cannon_capture_needs_exactly_one_screen() {
        // 无炮架：不能吃
        let mut board = single(PieceKind::Cannon, Side::Red, sq(4, 4));
        board.place(sq(4, 8), Piece::new(PieceKind::Soldier, Side::Black));
        let moves = geometric_at(&board, sq(4, 4));
        assert!(!moves.contains(&sq(4, 8)));
        // 不吃子的走法要求路径全空
        assert!(moves.contains(&sq(4, 7)));

        // 一个炮架（任意一方）：可以吃
        board.place(sq(4, 6), Piece::new(PieceKind::Soldier, Side::Red));
        let moves = geometric_at(&board, sq(4, 4));
        assert!(moves.contains(&sq(4, 8)));
        assert!(!moves.contains(&sq(4, 6)));
        assert!(!moves.contains(&sq(4, 7)));
        assert!(moves.contains(&sq(4, 5)));

        // 两个炮架：不能吃
        board.place(sq(4, 7), Piece::new(PieceKind::Horse, Side::Black));
        let moves = geometric_at(&board, sq(4, 4));
        assert!(!moves.contains(&sq(4, 8)));
        // 第一个炮架后的敌子可吃
        assert!(moves.contains(&sq(4, 7)));
    }

    #[test]
    fn test_cannon_does_not_capture_own_piece_behind_screen() {
        let mut board = single(PieceKind::Cannon, Side::Red, sq(0, 0));
        board.place(sq(0, 3), Piece::new(PieceKind::Soldier, Side::Black));
        board.place(sq(0, 5), Piece::new(PieceKind::Horse, Side::Red));
        board.place(sq(0, 7), Piece::new(PieceKind::Chariot, Side::Black));

        let moves = geometric_at(&board, sq(0, 0));
        assert!(!moves.contains(&sq(0, 5)));
        assert!(!moves.contains(&sq(0, 7)));
        assert_eq!(moves.iter().filter(|to| to.file == 0).count(), 2);
    }

    #[test]
    fn test_soldier_before_river() {
        let board = single(PieceKind::Soldier, Side::Red, sq(4, 3));
        assert_eq!(geometric_at(&board, sq(4, 3)), vec![sq(4, 4)]);

        let board = single(PieceKind::Soldier, Side::Black, sq(4, 6));
        assert_eq!(geometric_at(&board, sq(4, 6)), vec![sq(4, 5)]);
    }

    #[test]
    fn test_soldier_after_river() {
        let board = single(PieceKind::Soldier, Side::Red, sq(4, 5));
        let moves = geometric_at(&board, sq(4, 5));
        assert_eq!(moves.len(), 3);
        assert!(!moves.contains(&sq(4, 4)), "兵不能后退");

        let board = single(PieceKind::Soldier, Side::Black, sq(4, 4));
        let moves = geometric_at(&board, sq(4, 4));
        assert_eq!(moves.len(), 3);
        assert!(moves.contains(&sq(4, 3)));
        assert!(!moves.contains(&sq(4, 5)), "卒不能后退");
    }

    #[test]
    fn test_soldier_on_last_rank_only_sideways() {
        let board = single(PieceKind::Soldier, Side::Red, sq(0, 9));
        assert_eq!(geometric_at(&board, sq(0, 9)), vec![sq(1, 9)]);
    }

    #[test]
    fn test_check_detection() {
        let state = Fen::parse("4k4/9/9/9/9/9/9/9/4r4/4K4 r 0 1").unwrap();
        let (red, black) = state.board.split(Side::Red);

        assert!(MoveGenerator::in_check(Side::Red, red, black));
        assert!(!MoveGenerator::in_check(Side::Black, black, red));
    }

    #[test]
    fn test_check_by_cannon() {
        let state = Fen::parse("4k4/9/9/9/4P4/9/9/9/4C4/4K4 r 0 1").unwrap();
        let (black, red) = state.board.split(Side::Black);
        assert!(MoveGenerator::in_check(Side::Black, black, red));
    }

    #[test]
    fn test_check_by_horse() {
        let state = Fen::parse("4k4/9/3N5/9/9/9/9/9/9/4K4 r 0 1").unwrap();
        let (black, red) = state.board.split(Side::Black);
        assert!(MoveGenerator::in_check(Side::Black, black, red));
    }

    #[test]
    fn test_checkmate() {
        // 红帅被双车将死
        let state = Fen::parse("3k5/9/9/9/9/9/9/9/3rr4/3K5 r 0 1").unwrap();
        let (red, black) = state.board.split(Side::Red);

        assert!(MoveGenerator::in_check(Side::Red, red, black));
        assert!(!MoveGenerator::has_any_legal_move(Side::Red, red, black));
        assert_eq!(
            MoveGenerator::terminal_state(Side::Red, red, black),
            Some(Terminal::Checkmate)
        );
    }

    #[test]
    fn test_not_checkmate() {
        let state = Fen::parse("4k4/9/9/9/9/9/9/9/4r4/4K4 r 0 1").unwrap();
        let (red, black) = state.board.split(Side::Red);

        assert!(MoveGenerator::in_check(Side::Red, red, black));
        assert!(MoveGenerator::has_any_legal_move(Side::Red, red, black));
        assert_eq!(MoveGenerator::terminal_state(Side::Red, red, black), None);
    }

    #[test]
    fn test_stalemate() {
        // 帅在 (3, 0)：平五照面，进一被车控制，但没有被将军
        let state = Fen::parse("4k4/9/9/9/9/9/9/9/8r/3K5 r 0 1").unwrap();
        let (red, black) = state.board.split(Side::Red);

        assert!(!MoveGenerator::in_check(Side::Red, red, black));
        assert_eq!(
            MoveGenerator::terminal_state(Side::Red, red, black),
            Some(Terminal::Stalemate)
        );
    }

    #[test]
    fn test_flying_general() {
        let state = Fen::parse("4k4/9/9/9/9/9/9/9/9/3K5 r 0 1").unwrap();
        let moves = MoveGenerator::legal_moves_at(&state.board, sq(3, 0));

        // 帅不能平到五路与将照面
        assert!(!moves.contains(&sq(4, 0)));
        assert!(moves.contains(&sq(3, 1)));
    }

    #[test]
    fn test_screen_piece_cannot_leave_general_file() {
        // 两将同列，中间只有一个红兵：兵只能前进（仍在同列），不能平移
        let state = Fen::parse("4k4/9/9/9/4P4/9/9/9/9/4K4 r 0 1").unwrap();
        let moves = MoveGenerator::legal_moves_at(&state.board, sq(4, 5));
        assert_eq!(moves, vec![sq(4, 6)]);
    }

    #[test]
    fn test_pinned_piece_cannot_expose_general() {
        // 红车挡在帅和黑车之间，横走会让帅被将军
        let state = Fen::parse("3k5/9/4r4/9/9/9/4R4/9/9/4K4 r 0 1").unwrap();
        let origin = sq(4, 3);
        let geometric = geometric_at(&state.board, origin);
        let legal = MoveGenerator::legal_moves_at(&state.board, origin);

        assert!(geometric.contains(&sq(0, 3)));
        assert!(!legal.contains(&sq(0, 3)));
        assert!(legal.iter().all(|to| to.file == 4));
        // 沿线吃掉黑车是合法的
        assert!(legal.contains(&sq(4, 7)));
    }

    #[test]
    fn test_legal_moves_escape_check() {
        let state = Fen::parse("4k4/9/9/9/9/9/9/9/4r4/3K5 r 0 1").unwrap();
        let (red, black) = state.board.split(Side::Red);

        for mv in MoveGenerator::all_legal_moves(Side::Red, red, black) {
            let mut board = state.board.clone();
            board.apply_move(mv.from, mv.to).unwrap();
            let (red, black) = board.split(Side::Red);
            assert!(!MoveGenerator::in_check(Side::Red, red, black));
        }
    }

    #[test]
    fn test_legal_moves_leave_inputs_untouched() {
        let board = Board::initial();
        let snapshot = board.clone();
        let (own, enemy) = board.split(Side::Red);
        let _ = MoveGenerator::all_legal_moves(Side::Red, own, enemy);
        assert_eq!(board, snapshot);
    }

    /// 随机对局：每个局面都检查合法走法的不变量
    #[test]
    fn test_random_playouts_keep_invariants() {
        for seed in 0..6u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut state = BoardState::initial();

            for _ in 0..80 {
                let side = state.side_to_move;
                let (own, enemy) = state.board.split(side);

                for (origin, kind) in own {
                    let geometric = MoveGenerator::geometric_moves(*kind, side, *origin, own, enemy);
                    let legal = MoveGenerator::legal_moves(*kind, side, *origin, own, enemy);
                    for to in &legal {
                        assert!(geometric.contains(to), "合法走法必须是几何走法的子集");
                        assert!(Square::new(to.file, to.rank).is_some());
                        assert!(!own.contains_key(to));

                        let mut after = state.board.clone();
                        after.apply_move(*origin, *to).unwrap();
                        let (own_after, enemy_after) = after.split(side);
                        assert!(!MoveGenerator::in_check(side, own_after, enemy_after));
                        assert!(!after.generals_facing());
                    }
                }

                let moves = MoveGenerator::all_legal_moves(side, own, enemy);
                assert_eq!(moves.is_empty(), !MoveGenerator::has_any_legal_move(side, own, enemy));
                let Some(mv) = moves.choose(&mut rng).copied() else {
                    break;
                };

                state.board.apply_move(mv.from, mv.to).unwrap();
                state.switch_turn();
                assert!(state.board.validate().is_ok(), "seed {} 局面非法", seed);
            }
        }
    }
}
