//! UCI output line parsing
//!
//! Every line the engine prints is turned into one [`EngineEvent`]. The
//! engine session consumes these events and never looks at raw text.

use super::analysis::Score;

/// A parsed line of engine output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// `id name <name>`
    Id { name: String },
    /// `uciok`
    UciOk,
    /// `readyok`
    ReadyOk,
    /// `info ...` with the fields we care about
    Info(InfoLine),
    /// `bestmove <move> [ponder <move>]`; `None` for `(none)` or a bare `bestmove`
    BestMove {
        mv: Option<String>,
        ponder: Option<String>,
    },
    /// Anything else (option lists, copyright banners, `info string`)
    Other,
}

/// Fields extracted from an `info` line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoLine {
    pub depth: Option<u32>,
    /// Exact score only; bound scores are dropped
    pub score: Option<Score>,
    pub nodes: Option<u64>,
    pub pv: Vec<String>,
}

/// Parses one line of engine output
pub fn parse_line(line: &str) -> EngineEvent {
    let line = line.trim();
    let mut parts = line.split_whitespace();

    match parts.next() {
        Some("uciok") => EngineEvent::UciOk,
        Some("readyok") => EngineEvent::ReadyOk,
        Some("id") => match parts.next() {
            Some("name") => EngineEvent::Id {
                name: parts.collect::<Vec<_>>().join(" "),
            },
            _ => EngineEvent::Other,
        },
        Some("bestmove") => {
            let mv = parts
                .next()
                .filter(|m| *m != "(none)" && *m != "0000")
                .map(str::to_string);
            let ponder = match parts.next() {
                Some("ponder") => parts.next().map(str::to_string),
                _ => None,
            };
            EngineEvent::BestMove { mv, ponder }
        }
        Some("info") => parse_info(&line[4..]),
        _ => EngineEvent::Other,
    }
}

fn parse_info(rest: &str) -> EngineEvent {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let mut info = InfoLine::default();
    let mut i = 0;

    while i < parts.len() {
        match parts[i] {
            // Free text until end of line
            "string" => return EngineEvent::Other,
            "depth" => {
                info.depth = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "nodes" => {
                info.nodes = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "score" => {
                let value = parts.get(i + 2).and_then(|s| s.parse::<i32>().ok());
                let score = match (parts.get(i + 1).copied(), value) {
                    (Some("cp"), Some(cp)) => Some(Score::Centipawns(cp)),
                    (Some("mate"), Some(m)) => Some(Score::Mate(m)),
                    _ => None,
                };
                i += 3;
                let bound = matches!(
                    parts.get(i).copied(),
                    Some("lowerbound") | Some("upperbound")
                );
                if bound {
                    i += 1;
                } else if score.is_some() {
                    info.score = score;
                }
            }
            "pv" => {
                info.pv = parts[i + 1..].iter().map(|s| s.to_string()).collect();
                break;
            }
            _ => i += 1,
        }
    }

    EngineEvent::Info(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_lines() {
        assert_eq!(parse_line("uciok"), EngineEvent::UciOk);
        assert_eq!(parse_line("readyok\r\n"), EngineEvent::ReadyOk);
        assert_eq!(
            parse_line("id name Stockfish 16.1"),
            EngineEvent::Id { name: "Stockfish 16.1".to_string() }
        );
        assert_eq!(parse_line("id author the Stockfish developers"), EngineEvent::Other);
        assert_eq!(parse_line("option name Hash type spin default 16"), EngineEvent::Other);
    }

    #[test]
    fn test_info_with_cp_score() {
        let line = "info depth 12 seldepth 18 multipv 1 score cp 35 nodes 48213 nps 900000 pv e2e4 e7e5 g1f3";
        match parse_line(line) {
            EngineEvent::Info(info) => {
                assert_eq!(info.depth, Some(12));
                assert_eq!(info.score, Some(Score::Centipawns(35)));
                assert_eq!(info.nodes, Some(48213));
                assert_eq!(info.pv, vec!["e2e4", "e7e5", "g1f3"]);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_info_with_mate_score() {
        match parse_line("info depth 5 score mate -2 pv h5f7") {
            EngineEvent::Info(info) => assert_eq!(info.score, Some(Score::Mate(-2))),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_bound_scores_are_ignored() {
        match parse_line("info depth 20 score cp 41 lowerbound nodes 10 pv d2d4") {
            EngineEvent::Info(info) => {
                assert_eq!(info.score, None);
                assert_eq!(info.nodes, Some(10));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_info_string_is_other() {
        assert_eq!(parse_line("info string NNUE evaluation using nn.nnue"), EngineEvent::Other);
    }

    #[test]
    fn test_bestmove() {
        assert_eq!(
            parse_line("bestmove e2e4 ponder e7e5"),
            EngineEvent::BestMove {
                mv: Some("e2e4".to_string()),
                ponder: Some("e7e5".to_string()),
            }
        );
        assert_eq!(
            parse_line("bestmove (none)"),
            EngineEvent::BestMove { mv: None, ponder: None }
        );
        assert_eq!(parse_line("bestmove"), EngineEvent::BestMove { mv: None, ponder: None });
    }
}
