use leone::board::{Board, START_FEN};
use leone::perft::{perft, perft_divide};
use shakmaty::fen::Fen;
use shakmaty::{Chess, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
const POSITION_6: &str = "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

fn perft_shakmaty(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0u64;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}

// Helper function to run perft comparison
fn run_perft_comparison(fen_str: &str, depth: u32, position_name: &str) {
    let mut board = Board::from_fen(fen_str).expect("Valid FEN");
    let leone_nodes = perft(&mut board, depth);

    let fen: Fen = fen_str.parse().unwrap();
    let pos: Chess = fen.into_position(shakmaty::CastlingMode::Standard).unwrap();
    let shakmaty_nodes = perft_shakmaty(&pos, depth);

    assert_eq!(
        leone_nodes, shakmaty_nodes,
        "Perft mismatch for {} at depth {}: leone={} shakmaty={}",
        position_name, depth, leone_nodes, shakmaty_nodes
    );
}

fn known(fen: &str, expected: &[u64]) {
    let mut board = Board::from_fen(fen).expect("Valid FEN");
    for (i, &count) in expected.iter().enumerate() {
        let depth = i as u32 + 1;
        assert_eq!(perft(&mut board, depth), count, "{} depth {}", fen, depth);
    }
}

#[test]
fn perft_known_counts() {
    leone::init();
    known(START_FEN, &[20, 400, 8902, 197_281]);
    known(KIWIPETE, &[48, 2039, 97_862]);
    known(POSITION_3, &[14, 191, 2812, 43_238, 674_624]);
    known(POSITION_4, &[6, 264, 9467]);
    known(POSITION_5, &[44, 1486, 62_379]);
    known(POSITION_6, &[46, 2079, 89_890]);
}

#[test]
fn perft_regression_starting_pos() {
    leone::init();
    let pos: Chess = Chess::default();
    let mut board = Board::startpos();

    for depth in 1..=3u32 {
        let expected = perft_shakmaty(&pos, depth);
        let got = perft(&mut board, depth);
        assert_eq!(got, expected, "perft mismatch at depth {}: got {} expected {}", depth, got, expected);
    }
}

#[test]
fn perft_kiwipete_depth_3() {
    run_perft_comparison(KIWIPETE, 3, "Kiwipete");
}

#[test]
fn perft_position_3_depth_4() {
    run_perft_comparison(POSITION_3, 4, "Position 3");
}

#[test]
fn perft_position_4_depth_3() {
    run_perft_comparison(POSITION_4, 3, "Position 4");
}

#[test]
fn perft_position_4_mirrored_depth_3() {
    let mirrored = "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";
    run_perft_comparison(mirrored, 3, "Position 4 mirrored");
}

#[test]
fn perft_position_5_depth_3() {
    run_perft_comparison(POSITION_5, 3, "Position 5");
}

#[test]
fn perft_position_6_depth_3() {
    run_perft_comparison(POSITION_6, 3, "Position 6");
}

#[test]
#[ignore] // expensive
fn perft_kiwipete_depth_4() {
    run_perft_comparison(KIWIPETE, 4, "Kiwipete");
}

#[test]
fn divide_matches_shakmaty_per_root_move() {
    let mut board = Board::from_fen(KIWIPETE).unwrap();
    let fen: Fen = KIWIPETE.parse().unwrap();
    let pos: Chess = fen.into_position(shakmaty::CastlingMode::Standard).unwrap();

    let divide = perft_divide(&mut board, 2);
    assert_eq!(divide.len(), 48);
    for m in pos.legal_moves() {
        let uci = m.to_uci(shakmaty::CastlingMode::Standard).to_string();
        let mut next = pos.clone();
        next.play_unchecked(&m);
        let expected = perft_shakmaty(&next, 1);
        let got = divide
            .iter()
            .find(|(mv, _)| mv.to_string() == uci)
            .map(|(_, n)| *n);
        assert_eq!(got, Some(expected), "root move {}", uci);
    }
}
