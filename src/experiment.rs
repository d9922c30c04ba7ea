//! The trial loop.
//!
//! An [Experiment] owns the [SessionState] and the trigger line, draws the
//! random explosion points, and walks the participant through every run:
//! show the balloon, wait for a key, pump or cash in, repeat until the run
//! ends. When all runs are done the log is saved and the summary shown.

use crate::{
    config::BartConfig,
    error::BartError,
    record::{format_reward, Outcome, SessionState, TrialRecord},
    stimulus::{instructions_text, ResponseSource, Scene, StimulusSurface},
    timestamp::{self, TimestampMode},
    trigger::{TriggerDispatcher, TriggerEvent},
};
use log::{debug, info};
use rand::Rng;
use std::{path::Path, time::Duration};

pub struct Experiment<R: Rng> {
    config: BartConfig,
    triggers: TriggerDispatcher,
    rng: R,
    session: SessionState,
}

impl<R: Rng> Experiment<R> {
    /// Set up a session. The lower bound on explosion points is drawn here,
    /// once, and holds for every run.
    pub fn new(
        config: BartConfig,
        triggers: TriggerDispatcher,
        mut rng: R,
    ) -> Result<Self, BartError> {
        config.validate()?;

        let (low, high) = config.lower_bound_range;
        let lower_bound = rng.gen_range(low..=high);
        let started_at = timestamp::now(TimestampMode::DateTime, config.timestamp_style);
        info!(
            "Session started at {}, {} runs, explosion points in [{}, {}]",
            started_at, config.num_runs, lower_bound, config.max_inflations
        );

        Ok(Self {
            config,
            triggers,
            rng,
            session: SessionState::new(lower_bound, started_at),
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Pick the pump on which the next balloon pops.
    pub fn draw_explosion_threshold(&mut self) -> u32 {
        self.rng.gen_range(self.session.lower_bound..=self.config.max_inflations)
    }

    /// Run the whole session on `display` and save the log to `out_path`.
    /// Nothing is written unless every run completes.
    pub fn run<D>(&mut self, display: &mut D, out_path: &Path) -> Result<(), BartError>
    where
        D: StimulusSurface + ResponseSource,
    {
        self.triggers.dispatch(TriggerEvent::StartExperiment)?;

        let keys = &self.config.keys;
        let instructions =
            instructions_text(self.config.num_runs, keys.inflate, keys.cash_in, keys.begin);
        display.present(&Scene::Instructions(instructions))?;
        display.wait_for_key(&[keys.begin])?;

        for run in 1..=self.config.num_runs {
            self.triggers.dispatch(TriggerEvent::StartRun)?;
            let explosion_threshold = self.draw_explosion_threshold();
            let outcome = self.run_balloon(display, explosion_threshold)?;
            info!(
                "Run {}/{}: {} (explosion point {})",
                run, self.config.num_runs, outcome, explosion_threshold
            );
            pause(self.config.between_run());
        }

        info!(
            "Saving {} trials to {}",
            self.session.trials().len(),
            out_path.display()
        );
        self.session.save(out_path)?;

        info!(
            "Participant earned ${} of ${} possible",
            self.session.cumulative_reward(),
            self.session.max_possible_reward()
        );
        display.present(&Scene::Summary {
            earned: self.session.cumulative_reward(),
            possible: self.session.max_possible_reward(),
        })?;
        display.wait_for_any_key()
    }

    /// Run one balloon that pops on pump `explosion_threshold`, recording
    /// it in the session.
    pub fn run_balloon<D>(
        &mut self,
        display: &mut D,
        explosion_threshold: u32,
    ) -> Result<Outcome, BartError>
    where
        D: StimulusSurface + ResponseSource,
    {
        let explosion_threshold = explosion_threshold.clamp(1, self.config.max_inflations);
        let responses = [self.config.keys.inflate, self.config.keys.cash_in];
        let mut trial = TrialRecord::new(explosion_threshold);
        let mut run_reward = 0;
        let mut outcome = None;

        for inflation in 1..=self.config.max_inflations {
            display.present(&Scene::Balloon {
                inflation,
                cumulative_reward: self.session.cumulative_reward(),
                run_reward,
            })?;

            let key = display.wait_for_key(&responses)?;
            if key.matches(&self.config.keys.inflate) {
                self.triggers.dispatch(TriggerEvent::ButtonPress)?;
                trial.push_press(self.press_time());
                debug!("Pump {} of balloon popping at {}", inflation, explosion_threshold);
                pause(self.config.between_pump());

                if inflation == explosion_threshold {
                    run_reward = 0;
                    display.present(&Scene::Explosion { show_reward: true })?;
                    pause(self.config.explosion());
                    outcome = Some(Outcome::Explosion);
                    break;
                }
                run_reward += inflation;
            } else {
                self.session.bank(run_reward);
                self.triggers.dispatch(TriggerEvent::ButtonPress)?;
                trial.push_press(self.press_time());
                debug!("Cashed in {} after {} pumps", format_reward(run_reward), inflation - 1);
                outcome = Some(Outcome::CashIn);
                break;
            }
        }

        // The explosion point never exceeds max_inflations, so the loop
        // always ends on a break
        let outcome = outcome.unwrap_or(Outcome::Explosion);
        trial.finish(outcome, run_reward);
        self.session.add_trial(trial);
        Ok(outcome)
    }

    fn press_time(&self) -> String {
        timestamp::now(TimestampMode::TimeOnly, self.config.timestamp_style)
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        spin_sleep::sleep(duration);
    }
}
