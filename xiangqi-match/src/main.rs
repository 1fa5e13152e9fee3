use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xiangqi_ai::{AiEngine, Difficulty};
use xiangqi_core::{Piece, Side};
use xiangqi_match::{
    render_board, GameMode, GameSettings, GameTimer, Match, MatchEvent, MatchRecord, SelectOutcome,
    TimeLimit,
};

/// 终端中国象棋
#[derive(Parser, Debug)]
#[command(name = "xiangqi", version, about = "中国象棋：双人对战或人机对战")]
struct Cli {
    /// 设置文件路径（默认使用系统配置目录）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 对局模式
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// 人机对战时玩家执哪一方
    #[arg(long, value_enum)]
    side: Option<SideArg>,

    /// 电脑难度
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// 每方时间
    #[arg(long, value_enum)]
    time_limit: Option<TimeLimitArg>,

    /// 把当前参数写回设置文件
    #[arg(long)]
    save_settings: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Pvp,
    Pvc,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TimeLimitArg {
    #[value(name = "10")]
    Ten,
    #[value(name = "30")]
    Thirty,
    #[value(name = "60")]
    Sixty,
    Unlimited,
}

impl Cli {
    /// 命令行参数覆盖设置
    fn apply(&self, settings: &mut GameSettings) {
        if let Some(mode) = self.mode {
            settings.mode = match mode {
                ModeArg::Pvp => GameMode::PlayerVsPlayer,
                ModeArg::Pvc => GameMode::PlayerVsComputer,
            };
        }
        if let Some(side) = self.side {
            settings.human_side = match side {
                SideArg::Red => Side::Red,
                SideArg::Black => Side::Black,
            };
        }
        if let Some(difficulty) = self.difficulty {
            settings.difficulty = match difficulty {
                DifficultyArg::Easy => Difficulty::Easy,
                DifficultyArg::Medium => Difficulty::Medium,
                DifficultyArg::Hard => Difficulty::Hard,
            };
        }
        if let Some(limit) = self.time_limit {
            settings.time_limit = match limit {
                TimeLimitArg::Ten => TimeLimit::TenMinutes,
                TimeLimitArg::Thirty => TimeLimit::ThirtyMinutes,
                TimeLimitArg::Sixty => TimeLimit::SixtyMinutes,
                TimeLimitArg::Unlimited => TimeLimit::Unlimited,
            };
        }
    }
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xiangqi_match=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) if path.exists() => GameSettings::load_from(path)
            .with_context(|| format!("读取设置文件失败: {:?}", path))?,
        Some(_) => GameSettings::default(),
        None => GameSettings::load_or_default(),
    };
    cli.apply(&mut settings);

    if cli.save_settings {
        let saved = match &cli.config {
            Some(path) => settings.save_to(path),
            None => settings.save(),
        };
        saved.context("保存设置失败")?;
    }

    info!("中国象棋启动: {:?}", settings);
    run(&settings)
}

/// 主循环
fn run(settings: &GameSettings) -> Result<()> {
    let mut game = Match::from_settings(settings);
    let mut timer = GameTimer::from_limit(settings.time_limit);
    let mut engine = AiEngine::from_difficulty(settings.difficulty);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    print_help();

    loop {
        handle_events(&mut game, &mut timer);
        game.on_clock(timer.red_time_ms(), timer.black_time_ms());
        handle_events(&mut game, &mut timer);

        print!("\n{}", render_board(&game.snapshot()));

        if game.is_finished() {
            if !ask_rematch(&mut lines)? {
                break;
            }
            game.rematch().context("无法开始新对局")?;
            timer.restart(settings.time_limit.to_millis());
            continue;
        }

        if game.is_computer_turn() {
            thread::sleep(Duration::from_millis(settings.computer_delay_ms));
            println!("{} 思考中...", game.current_player().name);
            if game.play_computer_turn(&mut engine)?.is_none() {
                warn!("电脑没有返回走法");
                break;
            }
            continue;
        }

        print!("{} > ", game.current_player().name);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("读取输入失败")?;

        // 读入期间时间在流逝，先结算时钟
        game.on_clock(timer.red_time_ms(), timer.black_time_ms());
        if game.is_finished() {
            continue;
        }

        match parse_command(&line) {
            Command::Select(file, rank) => match game.select(file, rank) {
                SelectOutcome::Selected { targets, .. } if targets.is_empty() => {
                    println!("这个棋子没有可走的位置");
                }
                SelectOutcome::Selected { .. } => {}
                SelectOutcome::Moved(mv) => println!("走子: {}", mv),
                SelectOutcome::Cleared => println!("已取消选择"),
                SelectOutcome::Ignored => {}
            },
            Command::Save => {
                if let Err(e) = save_record(&game) {
                    warn!("保存棋谱失败: {:#}", e);
                    println!("保存失败，对局继续");
                }
            }
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Unknown => println!("无法识别的输入，输入 help 查看帮助"),
        }
    }

    Ok(())
}

/// 处理对局事件：驱动计时器并打印通知
fn handle_events(game: &mut Match, timer: &mut GameTimer) {
    for event in game.drain_events() {
        match event {
            MatchEvent::Started { red, black } => {
                println!("新对局：红方 {} vs 黑方 {}", red, black);
            }
            MatchEvent::MoveApplied { .. } => {}
            MatchEvent::Captured { by, kind } => {
                let side = match by {
                    Side::Red => "红方",
                    Side::Black => "黑方",
                };
                println!("{}吃掉了{}", side, Piece::new(kind, by.opponent()).display_char());
            }
            MatchEvent::ClockSwitched { .. } => timer.switch_turn(),
            MatchEvent::GameOver(result) => {
                timer.stop();
                println!("对局结束：{}", result);
            }
        }
    }
}

fn ask_rematch(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<bool> {
    print!("再来一局？(y/n) > ");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => {
            let line = line.context("读取输入失败")?;
            Ok(matches!(line.trim(), "y" | "Y" | "yes"))
        }
        None => Ok(false),
    }
}

fn save_record(game: &Match) -> Result<()> {
    let dir = MatchRecord::records_dir().context("无法获取应用数据目录")?;
    let path = game
        .record()
        .save_in(&dir)
        .with_context(|| format!("写入 {:?} 失败", dir))?;
    println!("棋谱已保存: {}", path.display());
    Ok(())
}

fn print_help() {
    println!("输入 \"列 行\" 选择棋子或落点（例如 \"1 2\"），列 0-8，行 0-9，红方在下");
    println!("save 保存棋谱，help 查看帮助，quit 退出");
}

enum Command {
    Select(i32, i32),
    Save,
    Help,
    Quit,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "q" | "quit" | "exit" => return Command::Quit,
        "h" | "help" => return Command::Help,
        "s" | "save" => return Command::Save,
        _ => {}
    }

    let numbers: Vec<i32> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    match numbers.as_slice() {
        [file, rank] => Command::Select(*file, *rank),
        _ => Command::Unknown,
    }
}
