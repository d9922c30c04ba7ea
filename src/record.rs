//! The trial log: one [TrialRecord] per balloon, kept in a [SessionState]
//! and written out as comma separated rows when the session ends.
//!
//! A row looks like
//!
//! ```text
//! 7,14:03:07.123456,14:03:08.002311,cashin,$1
//! ```
//!
//! that is, the explosion point, one timestamp per key press, the outcome,
//! and the reward the run ended with.

use crate::error::BartError;
use csv::{Terminator, WriterBuilder};
use std::{fmt, fs::File, io::Write, path::Path};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Explosion,
    CashIn,
}

impl Outcome {
    /// The tag written to the log.
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Explosion => "explosion",
            Outcome::CashIn => "cashin",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Everything logged about a single balloon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    explosion_threshold: u32,
    press_times: Vec<String>,
    ending: Option<(Outcome, u32)>,
}

impl TrialRecord {
    /// Start the record for a balloon that pops on pump `explosion_threshold`.
    pub fn new(explosion_threshold: u32) -> Self {
        Self {
            explosion_threshold,
            press_times: Vec::new(),
            ending: None,
        }
    }

    /// Log a key press.
    pub fn push_press(&mut self, timestamp: String) {
        debug_assert!(self.ending.is_none(), "record already closed");
        self.press_times.push(timestamp);
    }

    /// Close the record. An explosion always ends with zero reward.
    pub fn finish(&mut self, outcome: Outcome, reward: u32) {
        let reward = match outcome {
            Outcome::Explosion => 0,
            Outcome::CashIn => reward,
        };
        self.ending = Some((outcome, reward));
    }

    pub fn explosion_threshold(&self) -> u32 {
        self.explosion_threshold
    }

    pub fn press_times(&self) -> &[String] {
        &self.press_times
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.ending.map(|(outcome, _)| outcome)
    }

    pub fn reward(&self) -> Option<u32> {
        self.ending.map(|(_, reward)| reward)
    }

    /// The fields of this record's row, in order.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.press_times.len() + 3);
        fields.push(self.explosion_threshold.to_string());
        fields.extend(self.press_times.iter().cloned());
        if let Some((outcome, reward)) = self.ending {
            fields.push(outcome.tag().to_owned());
            fields.push(format_reward(reward));
        }
        fields
    }
}

/// Rewards are shown and logged as whole dollars.
pub fn format_reward(reward: u32) -> String {
    format!("${}", reward)
}

/// The largest reward a balloon that pops on `explosion_threshold` could
/// have paid, i.e. `1 + 2 + ... + explosion_threshold`.
pub fn max_reward_for(explosion_threshold: u32) -> u64 {
    let n = explosion_threshold as u64;
    n * (n + 1) / 2
}

/// All state a session accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Drawn once per session; every explosion point is at least this
    pub lower_bound: u32,
    /// When the session started, as a date_time timestamp
    pub started_at: String,
    cumulative_reward: u64,
    max_possible_reward: u64,
    trials: Vec<TrialRecord>,
}

impl SessionState {
    pub fn new(lower_bound: u32, started_at: String) -> Self {
        Self {
            lower_bound,
            started_at,
            cumulative_reward: 0,
            max_possible_reward: 0,
            trials: Vec::new(),
        }
    }

    /// Add a finished record and account for what its balloon could have
    /// paid.
    pub fn add_trial(&mut self, trial: TrialRecord) {
        self.max_possible_reward += max_reward_for(trial.explosion_threshold);
        self.trials.push(trial);
    }

    /// Bank a cashed-in reward.
    pub fn bank(&mut self, reward: u32) {
        self.cumulative_reward += reward as u64;
    }

    pub fn cumulative_reward(&self) -> u64 {
        self.cumulative_reward
    }

    pub fn max_possible_reward(&self) -> u64 {
        self.max_possible_reward
    }

    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// Write every trial to the file at `path`, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BartError> {
        let file = File::create(path)?;
        write_rows(file, &self.trials)
    }
}

/// Write one comma separated row per record. Rows differ in length, one
/// field per key press.
pub fn write_rows(out: impl Write, trials: &[TrialRecord]) -> Result<(), BartError> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_writer(out);
    for trial in trials {
        writer.write_record(trial.fields())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamps(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("t{}", i)).collect()
    }

    #[test]
    fn cashin_row() {
        let mut record = TrialRecord::new(7);
        stamps(7).into_iter().for_each(|t| record.push_press(t));
        record.finish(Outcome::CashIn, 21);

        assert_eq!(
            record.fields(),
            vec!["7", "t1", "t2", "t3", "t4", "t5", "t6", "t7", "cashin", "$21"]
        );
    }

    #[test]
    fn explosion_row_always_zero() {
        let mut record = TrialRecord::new(3);
        stamps(3).into_iter().for_each(|t| record.push_press(t));
        record.finish(Outcome::Explosion, 3);

        assert_eq!(record.reward(), Some(0));
        assert_eq!(record.fields(), vec!["3", "t1", "t2", "t3", "explosion", "$0"]);
    }

    #[test]
    fn max_reward_is_triangular() {
        assert_eq!(max_reward_for(1), 1);
        assert_eq!(max_reward_for(7), 28);
        assert_eq!(max_reward_for(18), 171);
    }

    #[test]
    fn session_accounting() {
        let mut session = SessionState::new(5, "start".to_owned());
        let mut cashed = TrialRecord::new(7);
        cashed.finish(Outcome::CashIn, 21);
        session.add_trial(cashed);
        session.bank(21);
        let mut popped = TrialRecord::new(3);
        popped.finish(Outcome::Explosion, 0);
        session.add_trial(popped);

        assert_eq!(session.max_possible_reward(), 28 + 6);
        assert_eq!(session.cumulative_reward(), 21);
        assert_eq!(session.trials().len(), 2);
    }

    #[test]
    fn rows_are_crlf_terminated() {
        let mut a = TrialRecord::new(4);
        a.push_press("12:00:00.000001".to_owned());
        a.finish(Outcome::CashIn, 1);
        let mut b = TrialRecord::new(2);
        b.finish(Outcome::CashIn, 0);

        let mut out = Vec::new();
        write_rows(&mut out, &[a, b]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "4,12:00:00.000001,cashin,$1\r\n2,cashin,$0\r\n"
        );
    }

    #[test]
    fn timestamps_with_commas_are_quoted() {
        let mut record = TrialRecord::new(3);
        record.push_press("12:00:00,5".to_owned());
        record.finish(Outcome::Explosion, 1);

        let mut out = Vec::new();
        write_rows(&mut out, &[record]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "3,\"12:00:00,5\",explosion,$0\r\n"
        );
    }

    #[test]
    fn save_replaces_file() {
        let tempfile = tempfile::NamedTempFile::new().unwrap();
        let path = tempfile.path();
        std::fs::write(path, "stale contents that should disappear\n").unwrap();

        let mut session = SessionState::new(3, "start".to_owned());
        let mut popped = TrialRecord::new(5);
        popped.finish(Outcome::Explosion, 0);
        session.add_trial(popped);
        session.save(path).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "5,explosion,$0\r\n");
    }
}
