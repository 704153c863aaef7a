use crate::board::{Mark, Status};
use crate::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    X,
    O,
    Draw,
}

impl From<Mark> for Outcome {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Outcome::X,
            Mark::O => Outcome::O,
        }
    }
}

/// One finished game, stamped with nanoseconds since the batch started.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub timestamp: i64,
    pub value: Outcome,
}

/// Win and draw tally of a batch of games.
#[derive(Debug, Clone)]
pub struct GameStats {
    start: DateTime<Local>,
    events: Vec<GameEvent>,
}

impl GameStats {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        GameStats {
            start: Local::now(),
            events: Vec::with_capacity(capacity),
        }
    }

    /// Records a finished game. Games still in play are ignored.
    pub fn record(&mut self, status: Status) {
        let value = match status {
            Status::Won(mark) => Outcome::from(mark),
            Status::Drawn => Outcome::Draw,
            Status::InProgress => return,
        };
        let timestamp = (Local::now() - self.start)
            .num_nanoseconds()
            .unwrap_or(i64::MAX);
        self.events.push(GameEvent { timestamp, value });
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn games(&self) -> usize {
        self.events.len()
    }

    pub fn count(&self, value: Outcome) -> usize {
        self.events.iter().filter(|e| e.value == value).count()
    }

    pub fn wins(&self, mark: Mark) -> usize {
        self.count(Outcome::from(mark))
    }

    pub fn draws(&self) -> usize {
        self.count(Outcome::Draw)
    }

    /// Share of games with this outcome, in [0, 1].
    pub fn rate(&self, value: Outcome) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }
        self.count(value) as f64 / self.events.len() as f64
    }

    pub fn win_rate(&self, mark: Mark) -> f64 {
        self.rate(Outcome::from(mark))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.events)?)
    }

    /// Writes the events as JSON and returns the file written.
    ///
    /// A directory gets a dated file name, `events-<date>.json`.
    pub fn write_events(&self, path: &Path) -> Result<PathBuf> {
        let target = if path.is_dir() {
            let filename = "events-".to_owned() + &Local::now().date_naive().to_string() + ".json";
            path.join(filename)
        } else {
            path.to_path_buf()
        };
        let mut file = File::create(&target)?;
        file.write_all(self.to_json()?.as_bytes())?;
        Ok(target)
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for mark in [Mark::X, Mark::O] {
            writeln!(f, "{} wins {:.2}% times", mark, self.win_rate(mark) * 100.0)?;
        }
        write!(f, "Draws {:.2}% times", self.rate(Outcome::Draw) * 100.0)
    }
}
