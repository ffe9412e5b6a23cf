//! Leone UCI chess engine main entry point.

use clap::Parser;
use leone::search::SearchParams;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transposition table size as a power of two
    #[arg(long, default_value_t = 20)]
    hash_bits: u32,

    /// Default maximum depth for `go` without `depth`
    #[arg(short, long, default_value_t = 15)]
    depth: u8,

    /// Move time in milliseconds when `go` carries no clock
    #[arg(long, default_value_t = 5000)]
    move_time: u64,
}

fn main() {
    // Logs go to stderr; stdout is the UCI channel
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    leone::init();

    let params = SearchParams::new()
        .tt_bits(args.hash_bits)
        .max_depth(args.depth)
        .default_move_time(args.move_time);

    if let Err(e) = leone::uci::run_uci_loop(params) {
        eprintln!("UCI loop failed: {:?}", e);
        std::process::exit(1);
    }
}
