//! UCI command parser
//!
//! Minimal but practical tokenizer for the commands the engine answers.

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    SetOption {
        name: String,
        value: Option<String>,
    },
    UciNewGame,
    Position {
        /// `None` for `startpos`
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go {
        depth: Option<u8>,
        wtime: Option<u64>,
        btime: Option<u64>,
        winc: Option<u64>,
        binc: Option<u64>,
        movestogo: Option<u64>,
        movetime: Option<u64>,
    },
    Perft {
        depth: u32,
    },
    /// Print the board
    Display,
    /// Run the rest of the line as one command and report the wall time
    Bench(Box<UciCommand>),
    Stop,
    Quit,
    /// Known command with unusable arguments
    Malformed(String),
    Unknown(String),
}

fn numeric<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i + 1).and_then(|v| v.parse::<T>().ok())
}

/// Parse a UCI command from a string (simple tokenizer)
pub fn parse_uci_command(line: &str) -> UciCommand {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return UciCommand::Unknown(String::new());
    };

    match head {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "stop" => UciCommand::Stop,
        "quit" | "q" | "exit" => UciCommand::Quit,
        "d" => UciCommand::Display,
        "bench" => {
            let rest = line.trim_start().strip_prefix("bench").unwrap_or_default();
            UciCommand::Bench(Box::new(parse_uci_command(rest)))
        }
        "perft" => match numeric::<u32>(&parts, 0) {
            Some(depth) => UciCommand::Perft { depth },
            None => UciCommand::Malformed(line.trim().to_string()),
        },
        "setoption" => {
            // expected: setoption name <name> [value <val>]
            let mut name = String::new();
            let mut value: Option<String> = None;
            let mut i = 1usize;
            while i < parts.len() {
                match parts[i] {
                    "name" => {
                        i += 1;
                        let mut vals = Vec::new();
                        while i < parts.len() && parts[i] != "value" {
                            vals.push(parts[i]);
                            i += 1;
                        }
                        name = vals.join(" ");
                    }
                    "value" => {
                        value = Some(parts[i + 1..].join(" "));
                        break;
                    }
                    _ => i += 1,
                }
            }
            UciCommand::SetOption { name, value }
        }
        "position" => {
            // position [fen <fenstring> | startpos] [moves <move1> ...]
            let moves_at = parts.iter().position(|&s| s == "moves");
            let moves = moves_at
                .map(|pos| parts[pos + 1..].iter().map(|m| m.to_string()).collect())
                .unwrap_or_default();
            match parts.get(1) {
                Some(&"startpos") => UciCommand::Position { fen: None, moves },
                Some(&"fen") => {
                    let end = moves_at.unwrap_or(parts.len());
                    if end <= 2 {
                        return UciCommand::Malformed(line.trim().to_string());
                    }
                    UciCommand::Position {
                        fen: Some(parts[2..end].join(" ")),
                        moves,
                    }
                }
                _ => UciCommand::Malformed(line.trim().to_string()),
            }
        }
        "go" => {
            let mut depth = None;
            let mut wtime = None;
            let mut btime = None;
            let mut winc = None;
            let mut binc = None;
            let mut movestogo = None;
            let mut movetime = None;

            let mut i = 1usize;
            while i < parts.len() {
                match parts[i] {
                    "depth" => depth = numeric(&parts, i),
                    "wtime" => wtime = numeric(&parts, i),
                    "btime" => btime = numeric(&parts, i),
                    "winc" => winc = numeric(&parts, i),
                    "binc" => binc = numeric(&parts, i),
                    "movestogo" => movestogo = numeric(&parts, i),
                    "movetime" => movetime = numeric(&parts, i),
                    _ => {
                        i += 1;
                        continue;
                    }
                }
                i += 2;
            }

            UciCommand::Go {
                depth,
                wtime,
                btime,
                winc,
                binc,
                movestogo,
                movetime,
            }
        }
        other => UciCommand::Unknown(other.to_string()),
    }
}
