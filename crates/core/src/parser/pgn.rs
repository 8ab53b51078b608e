//! PGN reading for game review
//!
//! Only the main line is kept. Moves are collected as SAN tokens and
//! validated later by the review itself, so a game with a broken move still
//! loads and fails with a positioned illegal-move error.

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use std::fs;
use std::io::Cursor;
use std::ops::ControlFlow;
use std::path::Path;

use crate::error::{Error, Result};
use crate::rules::MoveSpec;

/// A game read from PGN
#[derive(Debug, Clone, Default)]
pub struct PgnGame {
    pub event: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub moves: Vec<String>,
}

impl PgnGame {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Moves ready to hand to the reviewer
    pub fn move_specs(&self) -> Vec<MoveSpec> {
        self.moves.iter().map(|m| MoveSpec::from(m.as_str())).collect()
    }

    pub fn summary(&self) -> String {
        let white = self.white.as_deref().unwrap_or("Unknown");
        let black = self.black.as_deref().unwrap_or("Unknown");
        let result = self.result.as_deref().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }
}

struct GameReader;

impl Visitor for GameReader {
    type Tags = PgnGame;
    type Movetext = PgnGame;
    type Output = PgnGame;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(PgnGame::default())
    }

    fn tag(
        &mut self,
        game: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let value = value.decode_utf8_lossy().to_string();

        match name {
            b"Event" => game.event = Some(value),
            b"White" => game.white = Some(value),
            b"Black" => game.black = Some(value),
            b"Result" => game.result = Some(value),
            _ => {}
        }

        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, game: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(game)
    }

    fn san(&mut self, game: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        game.moves.push(san.san.to_string());
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _game: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, game: Self::Movetext) -> Self::Output {
        game
    }
}

pub fn parse_pgn_file<P: AsRef<Path>>(path: P) -> Result<Vec<PgnGame>> {
    let contents = fs::read_to_string(path)?;
    parse_pgn_string(&contents)
}

pub fn parse_pgn_string(pgn: &str) -> Result<Vec<PgnGame>> {
    let mut visitor = GameReader;
    let mut games = Vec::new();

    let mut reader = pgn_reader::Reader::new(Cursor::new(pgn.as_bytes()));

    while let Some(game) = reader
        .read_game(&mut visitor)
        .map_err(|e| Error::Pgn(e.to_string()))?
    {
        games.push(game);
    }

    if games.is_empty() {
        Err(Error::Pgn("no games found".to_string()))
    } else {
        Ok(games)
    }
}
