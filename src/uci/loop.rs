//! Minimal UCI event loop
//!
//! Commands are handled one at a time; `go` blocks until the search returns,
//! then prints one `info` line per iteration and the `bestmove`.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use super::parser::{parse_uci_command, UciCommand};
use crate::board::{Board, START_FEN};
use crate::perft::perft_divide;
use crate::search::{Search, SearchParams};
use crate::time::{Limits, TimeManager};

pub struct UciEngine {
    search: Search,
    time: TimeManager,
    running: bool,
}

impl UciEngine {
    pub fn new(params: SearchParams) -> Self {
        let time = TimeManager::new(params.default_move_time_ms);
        Self {
            search: Search::new(Board::startpos(), params),
            time,
            running: true,
        }
    }

    pub fn board(&self) -> &Board {
        self.search.board()
    }

    pub fn handle_command(&mut self, cmd: UciCommand) -> Vec<String> {
        let mut res = Vec::new();
        match cmd {
            UciCommand::Uci => {
                res.push(format!("id name Leone {}", env!("CARGO_PKG_VERSION")));
                res.push("id author the Leone developers".to_string());
                res.push(format!(
                    "option name Hash type spin default {} min 10 max 30",
                    self.search.params().tt_bits
                ));
                res.push("uciok".to_string());
            }
            UciCommand::IsReady => res.push("readyok".to_string()),
            UciCommand::UciNewGame => {
                self.search.set_board(Board::startpos());
            }
            UciCommand::Position { fen, moves } => {
                // Validate on a scratch board so a bad command keeps the old position
                let mut board = Board::new();
                let fen = fen.as_deref().unwrap_or(START_FEN);
                match board.set_position(fen, &moves) {
                    Ok(()) => *self.search.board_mut() = board,
                    Err(e) => {
                        tracing::warn!(error = %e, "rejected position command");
                        res.push(format!("info string {}", e));
                    }
                }
            }
            UciCommand::Go {
                depth,
                wtime,
                btime,
                winc,
                binc,
                movestogo,
                movetime,
            } => {
                let started = Instant::now();
                let limits = Limits {
                    wtime,
                    btime,
                    winc,
                    binc,
                    movestogo,
                    movetime,
                };
                let side = self.search.board().side_to_move();
                let budget = self.time.allocate_time(&limits, side);
                let max_depth = depth.unwrap_or(self.search.params().max_depth).max(1);
                tracing::debug!(max_depth, budget_ms = budget.as_millis() as u64, "go");

                self.search.set_deadline(started + budget);
                let (_, mv) = self.search.best_move(max_depth);
                self.search.clear_deadline();

                res.extend(self.search.iterations().iter().map(|it| it.to_uci()));
                if mv.is_null() {
                    res.push("info string position is terminal (checkmate or stalemate)".to_string());
                }
                res.push(format!("bestmove {}", mv));
            }
            UciCommand::Perft { depth } => {
                let started = Instant::now();
                let board = self.search.board_mut();
                let divide = perft_divide(board, depth);
                let total: u64 = divide.iter().map(|(_, n)| n).sum();
                res.extend(divide.iter().map(|(mv, n)| format!("{}: {}", mv, n)));
                res.push(String::new());
                res.push(format!("Nodes searched: {}", total));
                tracing::info!(depth, nodes = total, elapsed_ms = started.elapsed().as_millis() as u64, "perft");
            }
            UciCommand::Bench(inner) => {
                let started = Instant::now();
                res.extend(self.handle_command(*inner));
                res.push("=============================".to_string());
                res.push(format!("Time taken (ms): {}", started.elapsed().as_millis()));
            }
            UciCommand::Display => {
                res.extend(self.search.board().to_string().lines().map(str::to_string));
            }
            UciCommand::SetOption { name, value } => match name.as_str() {
                "Hash" => match value.as_deref().and_then(|v| v.parse::<u32>().ok()) {
                    Some(bits) => {
                        self.search.resize_tt(bits);
                        res.push(format!(
                            "info string Hash set to {} entries",
                            self.search.tt().len()
                        ));
                    }
                    None => res.push("info string error: invalid Hash value".to_string()),
                },
                _ => res.push(format!("info string unknown option: {}", name)),
            },
            // Searches are synchronous, nothing to interrupt
            UciCommand::Stop => {}
            UciCommand::Quit => {
                self.running = false;
            }
            UciCommand::Malformed(s) => {
                res.push(format!("info string malformed command: {}", s));
            }
            UciCommand::Unknown(s) => {
                if !s.is_empty() {
                    res.push(format!("info string unknown command: {}", s));
                }
            }
        }
        res
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new(SearchParams::default())
    }
}

/// Read commands from `input` until `quit` or EOF, writing responses to
/// `output`.
pub fn run_uci<R: BufRead, W: Write>(engine: &mut UciEngine, input: R, mut output: W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let responses = engine.handle_command(parse_uci_command(line));
        for r in responses {
            writeln!(output, "{}", r)?;
        }
        // Always flush after each command so the GUI sees output immediately
        output.flush()?;

        if !engine.is_running() {
            break;
        }
    }
    Ok(())
}

pub fn run_uci_loop(params: SearchParams) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut engine = UciEngine::new(params);
    run_uci(&mut engine, stdin.lock(), stdout.lock())
}

pub fn process_uci_line(line: &str, engine: &mut UciEngine) -> Vec<String> {
    engine.handle_command(parse_uci_command(line))
}
