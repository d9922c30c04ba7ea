//! The Balloon Analogue Risk Task, a behavioral paradigm for measuring risk
//! taking. On each of a fixed number of runs a participant pumps up a
//! balloon, earning a little more with every pump, and can cash in at any
//! time. Each balloon has a hidden explosion point; pumping past it loses
//! everything the run had earned.
//!
//! The task runs full-screen in a terminal. Every key press can be mirrored
//! as a one-byte trigger on a serial line so that recording equipment stays
//! in sync, and the trial-by-trial log is written as comma separated rows
//! when the session ends.
//!
//! The pieces are:
//!
//! - [experiment]: the trial loop and its rules
//! - [stimulus]: scene descriptions and balloon geometry
//! - [gui]: the terminal that draws scenes and reads keys
//! - [trigger]: hardware synchronization
//! - [record]: the trial log and its file format
//! - [timestamp], [config], [args], [error]: plumbing

pub mod args;
pub mod config;
pub mod error;
pub mod experiment;
pub mod gui;
pub mod record;
pub mod stimulus;
pub mod timestamp;
pub mod trigger;

/// A point on the virtual screen, in pixels.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Euclidean distance between two points.
    pub fn abs_dist(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}
