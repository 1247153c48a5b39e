#![no_main]

use libfuzzer_sys::fuzz_target;
use unichess::uci::{parse_bestmove, UciMove};

fuzz_target!(|data: &[u8]| {
    if let Ok(uci) = UciMove::from_ascii(data) {
        assert_eq!(uci.to_string().parse::<UciMove>(), Ok(uci));
    }
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = parse_bestmove(line);
    }
});
