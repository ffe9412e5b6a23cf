use clap::Parser;
use leone::board::{Board, START_FEN};
use leone::perft::{perft, perft_divide};
use shakmaty::fen::Fen;
use shakmaty::{Chess, Position};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u32,

    /// Print the count of every root move
    #[arg(long)]
    divide: bool,

    /// Recompute the count with shakmaty and compare
    #[arg(long)]
    verify: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut board = match Board::from_fen(&args.fen) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("invalid FEN '{}': {}", args.fen, e);
            std::process::exit(2);
        }
    };

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    let start = std::time::Instant::now();
    let nodes = if args.divide {
        let divide = perft_divide(&mut board, args.depth);
        for (mv, count) in &divide {
            println!("{}: {}", mv, count);
        }
        divide.iter().map(|(_, n)| n).sum()
    } else {
        perft(&mut board, args.depth)
    };
    let duration = start.elapsed();

    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );

    if args.verify {
        let pos: Chess = match args
            .fen
            .parse::<Fen>()
            .map_err(|e| e.to_string())
            .and_then(|fen| fen.into_position(shakmaty::CastlingMode::Standard).map_err(|e| e.to_string()))
        {
            Ok(pos) => pos,
            Err(e) => {
                eprintln!("shakmaty rejected FEN: {}", e);
                std::process::exit(2);
            }
        };
        let expected = perft_shakmaty(&pos, args.depth);
        if expected == nodes {
            println!("verified against shakmaty: {}", expected);
        } else {
            eprintln!("MISMATCH: shakmaty counts {} nodes", expected);
            std::process::exit(1);
        }
    }
}

fn perft_shakmaty(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    let moves = pos.legal_moves();
    for m in moves {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}
