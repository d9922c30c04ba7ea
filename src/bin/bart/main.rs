//! Runs one BART session in the terminal and writes the participant's
//! trial log next to where it was started.

use bart::{
    args::{output_filename, BartArgs},
    config::BartConfig,
    error::BartError,
    experiment::Experiment,
    gui::{SceneStyle, TerminalSurface},
    trigger::TriggerDispatcher,
};
use clap::Parser;
use log::info;
use std::{
    error::Error,
    fs::File,
    io::{self, Write},
    path::Path,
};

// Example:
// cargo run --bin bart --
//                      --config  lab.ron
//                      --out     p09
//                      --trigger

fn main() -> Result<(), Box<dyn Error>> {
    let args = BartArgs::parse();

    let mut config = match &args.config {
        Some(path) => BartConfig::from_path(path)?,
        None => BartConfig::default(),
    };
    if args.trigger {
        config.peripheral.enabled = true;
    }
    if args.port.is_some() {
        config.peripheral.port = args.port.clone();
    }
    init_logging(&config)?;

    let outfile = match &args.outfile {
        Some(name) => output_filename(name),
        None => prompt_filename()?,
    };

    let triggers = match TriggerDispatcher::from_config(&config.peripheral) {
        Ok(triggers) => triggers,
        Err(BartError::NoSerialPort) => {
            println!("No ports available now. Please check if Arduino is plugged in.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let style = SceneStyle::from_config(&config);
    let mut experiment = Experiment::new(config, triggers, rand::thread_rng())?;

    let mut surface = TerminalSurface::new(style)?;
    let result = experiment.run(&mut surface, Path::new(&outfile));
    // Leave the alternate screen before anything is printed
    drop(surface);
    result?;

    info!("Session complete");
    println!(
        "Saved {} runs to {}",
        experiment.session().trials().len(),
        outfile
    );
    Ok(())
}

fn init_logging(config: &BartConfig) -> Result<(), BartError> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = &config.log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn prompt_filename() -> Result<String, BartError> {
    print!("Please enter filename: ");
    io::stdout().flush()?;
    let mut name = String::new();
    io::stdin().read_line(&mut name)?;
    Ok(output_filename(&name))
}
