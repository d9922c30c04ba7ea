// Commandline argument parser using clap for the BART runner

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(version, about)]
pub struct BartArgs {
    /// RON file with session settings; built-in defaults when omitted
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Name of the output file, without the .csv extension. Asked for
    /// interactively when omitted
    #[arg(short = 'o', long = "out")]
    pub outfile: Option<String>,

    /// Send triggers to recording hardware over serial
    #[arg(short = 't', long = "trigger")]
    pub trigger: bool,

    /// Serial device for triggers, instead of the first one found
    #[arg(short = 'p', long = "port")]
    pub port: Option<PathBuf>,
}

/// The output file for a participant-supplied name.
pub fn output_filename(name: &str) -> String {
    format!("{}.csv", name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments() {
        let args = BartArgs::try_parse_from(["bart"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.outfile.is_none());
        assert!(!args.trigger);
    }

    #[test]
    fn all_arguments() {
        let args = BartArgs::try_parse_from([
            "bart", "-c", "lab.ron", "--out", "p09", "--trigger", "--port", "/dev/ttyACM0",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("lab.ron")));
        assert_eq!(args.outfile.as_deref(), Some("p09"));
        assert!(args.trigger);
        assert_eq!(args.port, Some(PathBuf::from("/dev/ttyACM0")));
    }

    #[test]
    fn run_count_is_not_a_flag() {
        assert!(BartArgs::try_parse_from(["bart", "--runs", "10"]).is_err());
    }

    #[test]
    fn csv_extension_is_appended() {
        assert_eq!(output_filename("p09\n"), "p09.csv");
    }
}
