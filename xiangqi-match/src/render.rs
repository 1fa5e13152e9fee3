//! 终端文本棋盘

use std::fmt::Write;

use xiangqi_core::{Piece, PieceKind, Side, Square, BOARD_FILES, BOARD_RANKS};

use crate::events::MatchSnapshot;

/// 把快照画成文本
///
/// 上方为黑方（第 9 行），下方为红方（第 0 行）。
/// `[x]` 为选中的棋子，`*` 为合法落点，`+` 为可吃的对方棋子。
pub fn render_board(snapshot: &MatchSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "    {}", file_header());
    for rank in (0..BOARD_RANKS).rev() {
        let _ = write!(out, " {} ", rank);
        for file in 0..BOARD_FILES {
            let square = Square::new_unchecked(file, rank);
            out.push_str(&render_cell(snapshot, square));
        }
        out.push('\n');
        if rank == 5 {
            let _ = writeln!(out, "   {}", "~".repeat(BOARD_FILES as usize * 3));
        }
    }

    let _ = writeln!(
        out,
        "红方吃子: {}",
        captured_list(snapshot.captured.captured_by(Side::Red), Side::Black)
    );
    let _ = writeln!(
        out,
        "黑方吃子: {}",
        captured_list(snapshot.captured.captured_by(Side::Black), Side::Red)
    );

    if let (Some(red), Some(black)) = (snapshot.red_time_ms, snapshot.black_time_ms) {
        let _ = writeln!(out, "时间  红 {}  黑 {}", format_clock(red), format_clock(black));
    }

    match snapshot.result {
        Some(result) => {
            let _ = writeln!(out, "对局结束: {}", result);
        }
        None => {
            let side = match snapshot.side_to_move {
                Side::Red => "红方",
                Side::Black => "黑方",
            };
            let _ = write!(out, "第 {} 回合，{}走棋", snapshot.round, side);
            if snapshot.in_check {
                out.push_str("（被将军）");
            }
            out.push('\n');
        }
    }

    out
}

fn file_header() -> String {
    (0..BOARD_FILES)
        .map(|file| format!("{} ", file))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_cell(snapshot: &MatchSnapshot, square: Square) -> String {
    let piece = snapshot.board.piece_at(square);
    let highlighted = snapshot.highlights.contains(&square);

    if snapshot.selected == Some(square) {
        if let Some(piece) = piece {
            return format!("[{}", piece.display_char());
        }
    }

    match (piece, highlighted) {
        (Some(piece), true) => format!("+{}", piece.display_char()),
        (Some(piece), false) => format!(" {}", piece.display_char()),
        (None, true) => " * ".to_string(),
        (None, false) => " · ".to_string(),
    }
}

fn captured_list(kinds: &[PieceKind], owner: Side) -> String {
    if kinds.is_empty() {
        return "无".to_string();
    }
    kinds
        .iter()
        .map(|kind| Piece::new(*kind, owner).display_char())
        .collect()
}

/// 毫秒格式化为 mm:ss，不限时显示 --:--
pub fn format_clock(ms: u64) -> String {
    if ms == u64::MAX {
        return "--:--".to_string();
    }
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
