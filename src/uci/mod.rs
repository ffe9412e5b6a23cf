pub mod r#loop;
pub mod parser;

pub use parser::{parse_uci_command, UciCommand};
pub use r#loop::{process_uci_line, run_uci, run_uci_loop, UciEngine};
