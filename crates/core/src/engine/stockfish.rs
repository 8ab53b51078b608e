//! Stockfish chess engine interface
//!
//! Spawns Stockfish as a subprocess and communicates via UCI protocol.
//! The protocol side works over any pair of async streams, so the same
//! session code drives a real process or an in-memory test double.

use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info};

use super::analysis::{EvaluationResult, Evaluator};
use super::uci::{parse_line, EngineEvent};
use crate::config::EngineConfig;

type EngineReader = Lines<BufReader<Box<dyn AsyncRead + Send + Unpin>>>;
type EngineWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to start the engine process
    #[error("Failed to start engine: {0}")]
    Spawn(String),
    /// Failed to communicate with engine
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Engine did not answer within the configured window
    #[error("Engine did not respond within {}s", .0.as_secs_f64())]
    Timeout(Duration),
    /// Engine closed its output stream
    #[error("Engine closed its output")]
    Closed,
    /// Search depth of zero was requested
    #[error("Search depth must be positive")]
    InvalidDepth,
    /// The engine pool no longer hands out engines
    #[error("Engine pool is closed")]
    PoolClosed,
}

impl EngineError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, EngineError::Timeout(_))
    }
}

/// Wrapper around a UCI engine speaking over stdin/stdout
pub struct StockfishEngine {
    /// The child process, absent when connected to plain streams
    process: Option<Child>,
    /// Stdin for sending commands
    stdin: EngineWriter,
    /// Stdout lines for receiving responses
    stdout: EngineReader,
    /// Name reported via `id name`
    name: String,
    /// Bound on every wait for a reply
    timeout: Duration,
}

impl StockfishEngine {
    /// Spawns the configured engine binary and completes the UCI handshake
    ///
    /// # Example
    /// ```ignore
    /// let mut engine = StockfishEngine::spawn(&EngineConfig::default()).await?;
    /// ```
    pub async fn spawn(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut process = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Spawn(format!("{}: {}", config.path, e)))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdin".into()))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdout".into()))?;

        let mut engine = Self::from_parts(Some(process), stdout, stdin, config.timeout);
        engine.init_uci().await?;

        info!(engine = %engine.name, path = %config.path, "engine ready");
        Ok(engine)
    }

    /// Runs the UCI handshake over an already-open pair of streams
    pub async fn connect<R, W>(reader: R, writer: W, timeout: Duration) -> Result<Self, EngineError>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let mut engine = Self::from_parts(None, reader, writer, timeout);
        engine.init_uci().await?;
        Ok(engine)
    }

    fn from_parts<R, W>(process: Option<Child>, reader: R, writer: W, timeout: Duration) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(reader);
        StockfishEngine {
            process,
            stdin: Box::new(writer),
            stdout: BufReader::new(reader).lines(),
            name: String::new(),
            timeout,
        }
    }

    /// Returns the engine's name as reported via UCI
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a command to the engine
    async fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(cmd, "SF <");
        self.stdin.write_all(format!("{cmd}\n").as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Reads and parses the next line from the engine
    async fn next_event(&mut self) -> Result<EngineEvent, EngineError> {
        let line = self.stdout.next_line().await?.ok_or(EngineError::Closed)?;
        debug!(line = line.trim(), "SF >");
        Ok(parse_line(&line))
    }

    /// Initialize UCI protocol
    async fn init_uci(&mut self) -> Result<(), EngineError> {
        self.send("uci").await?;
        let limit = self.timeout;
        let name = timeout(limit, self.read_until_uciok())
            .await
            .map_err(|_| EngineError::Timeout(limit))??;

        self.name = if name.is_empty() {
            "Unknown Engine".to_string()
        } else {
            name
        };

        self.sync().await
    }

    async fn read_until_uciok(&mut self) -> Result<String, EngineError> {
        let mut name = String::new();
        loop {
            match self.next_event().await? {
                EngineEvent::Id { name: n } => name = n,
                EngineEvent::UciOk => return Ok(name),
                _ => {}
            }
        }
    }

    /// Sends `isready` and waits for `readyok`
    async fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready").await?;
        let limit = self.timeout;
        timeout(limit, self.read_until_readyok())
            .await
            .map_err(|_| EngineError::Timeout(limit))?
    }

    async fn read_until_readyok(&mut self) -> Result<(), EngineError> {
        loop {
            if self.next_event().await? == EngineEvent::ReadyOk {
                return Ok(());
            }
        }
    }

    /// Analyzes a FEN position to the given depth
    ///
    /// Resolves on the `bestmove` line; the score is the last exact score
    /// seen in `info` lines. Fails with [`EngineError::Timeout`] when
    /// `bestmove` does not arrive within the configured window.
    pub async fn analyze(&mut self, fen: &str, depth: u8) -> Result<EvaluationResult, EngineError> {
        if depth == 0 {
            return Err(EngineError::InvalidDepth);
        }

        self.sync().await?;
        self.send(&format!("position fen {}", fen)).await?;
        self.send(&format!("go depth {}", depth)).await?;

        let limit = self.timeout;
        let result = timeout(limit, self.read_search())
            .await
            .map_err(|_| EngineError::Timeout(limit))??;

        debug!(fen, depth, best_move = %result.best_move, score = ?result.score, "position evaluated");
        Ok(result)
    }

    async fn read_search(&mut self) -> Result<EvaluationResult, EngineError> {
        let mut result = EvaluationResult::default();
        loop {
            match self.next_event().await? {
                EngineEvent::Info(info) => {
                    if info.score.is_some() {
                        result.score = info.score;
                    }
                }
                EngineEvent::BestMove { mv, .. } => {
                    result.best_move = mv.unwrap_or_default();
                    return Ok(result);
                }
                _ => {}
            }
        }
    }

    /// Whether the engine is still running and answers `isready`
    pub async fn is_healthy(&mut self) -> bool {
        if let Some(process) = self.process.as_mut() {
            if !matches!(process.try_wait(), Ok(None)) {
                return false;
            }
        }
        self.sync().await.is_ok()
    }

    /// Quit the engine cleanly
    pub async fn quit(mut self) {
        let _ = self.send("quit").await;
        if let Some(process) = self.process.as_mut() {
            // Give it a moment to exit, Drop kills it otherwise
            let _ = timeout(Duration::from_millis(100), process.wait()).await;
        }
    }
}

impl Evaluator for StockfishEngine {
    async fn evaluate(&mut self, fen: &str, depth: u8) -> Result<EvaluationResult, EngineError> {
        self.analyze(fen, depth).await
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        if let Some(process) = self.process.as_mut() {
            let _ = process.start_kill();
        }
    }
}
