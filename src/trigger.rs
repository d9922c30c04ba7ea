//! Synchronization pulses for external recording equipment.
//!
//! Each [TriggerEvent] maps to a pin code that is written as a single
//! unsigned byte on a [TriggerLine]. With the peripheral disabled the line is
//! a [NullLine], so the lookup still happens but nothing leaves the process.

use crate::{config::PeripheralConfig, error::BartError};
use log::{info, trace};
use serial2::SerialPort;
use std::{io, path::PathBuf, str::FromStr};

/// Returned by [pin_code] for names that are not in the table.
pub const UNKNOWN_PIN: i16 = -1;

/// The events the recording equipment is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    StartExperiment,
    StartRun,
    ButtonPress,
    /// In the table but never fired by a session
    EndExperiment,
}

impl TriggerEvent {
    /// The byte written on the line for this event.
    pub fn pin(&self) -> u8 {
        match self {
            TriggerEvent::StartExperiment => 8,
            TriggerEvent::StartRun => 5,
            TriggerEvent::ButtonPress => 6,
            TriggerEvent::EndExperiment => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TriggerEvent::StartExperiment => "start_experiment",
            TriggerEvent::StartRun => "start_run",
            TriggerEvent::ButtonPress => "button_press",
            TriggerEvent::EndExperiment => "end_experiment",
        }
    }
}

impl FromStr for TriggerEvent {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start_experiment" => Ok(TriggerEvent::StartExperiment),
            "start_run" => Ok(TriggerEvent::StartRun),
            "button_press" => Ok(TriggerEvent::ButtonPress),
            "end_experiment" => Ok(TriggerEvent::EndExperiment),
            _ => Err(()),
        }
    }
}

/// Look up the pin code for an event name, [UNKNOWN_PIN] if there is none.
pub fn pin_code(name: &str) -> i16 {
    name.parse::<TriggerEvent>()
        .map_or(UNKNOWN_PIN, |event| event.pin() as i16)
}

/// Somewhere a trigger byte can be written.
pub trait TriggerLine {
    fn write_code(&mut self, code: u8) -> io::Result<()>;
}

/// The line used when the peripheral is disabled.
#[derive(Debug, Default)]
pub struct NullLine;

impl TriggerLine for NullLine {
    fn write_code(&mut self, _code: u8) -> io::Result<()> {
        Ok(())
    }
}

impl TriggerLine for SerialPort {
    fn write_code(&mut self, code: u8) -> io::Result<()> {
        io::Write::write_all(self, &[code])
    }
}

/// Owns the trigger line for the lifetime of a session.
pub struct TriggerDispatcher {
    line: Box<dyn TriggerLine>,
}

impl TriggerDispatcher {
    pub fn new(line: Box<dyn TriggerLine>) -> Self {
        Self { line }
    }

    /// A dispatcher that looks codes up and writes nothing.
    pub fn disabled() -> Self {
        Self::new(Box::new(NullLine))
    }

    /// Build the dispatcher the peripheral config asks for, opening the
    /// configured port, or the first one the system enumerates.
    pub fn from_config(config: &PeripheralConfig) -> Result<Self, BartError> {
        Self::from_config_with(config, SerialPort::available_ports)
    }

    /// As [TriggerDispatcher::from_config], with the port enumeration
    /// supplied by the caller.
    pub fn from_config_with<F>(config: &PeripheralConfig, list_ports: F) -> Result<Self, BartError>
    where
        F: FnOnce() -> io::Result<Vec<PathBuf>>,
    {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let device = choose_port(config, list_ports)?;
        info!(
            "Opening trigger port {} at {} baud",
            device.to_string_lossy(),
            config.baud_rate
        );
        let port = SerialPort::open(&device, config.baud_rate)?;
        Ok(Self::new(Box::new(port)))
    }

    /// Send the pin code for `event`.
    pub fn dispatch(&mut self, event: TriggerEvent) -> Result<(), BartError> {
        trace!("Trigger {} -> {}", event.name(), event.pin());
        self.line.write_code(event.pin())?;
        Ok(())
    }

    /// Send the pin code for an event given by name. Unknown names are
    /// ignored.
    pub fn dispatch_named(&mut self, name: &str) -> Result<(), BartError> {
        match name.parse::<TriggerEvent>() {
            Ok(event) => self.dispatch(event),
            Err(()) => {
                trace!("Ignoring unknown trigger {:?}", name);
                Ok(())
            }
        }
    }
}

/// The configured port if there is one, otherwise the first port
/// `list_ports` finds.
pub fn choose_port<F>(config: &PeripheralConfig, list_ports: F) -> Result<PathBuf, BartError>
where
    F: FnOnce() -> io::Result<Vec<PathBuf>>,
{
    if let Some(port) = &config.port {
        return Ok(port.clone());
    }
    list_ports()?
        .into_iter()
        .next()
        .ok_or(BartError::NoSerialPort)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    /// Records every byte so tests can inspect it after the dispatcher
    /// takes ownership of the line.
    #[derive(Clone, Default)]
    struct SharedLine(Rc<RefCell<Vec<u8>>>);

    impl TriggerLine for SharedLine {
        fn write_code(&mut self, code: u8) -> io::Result<()> {
            self.0.borrow_mut().push(code);
            Ok(())
        }
    }

    #[test]
    fn table_matches_the_wiring() {
        assert_eq!(pin_code("start_experiment"), 8);
        assert_eq!(pin_code("start_run"), 5);
        assert_eq!(pin_code("button_press"), 6);
        assert_eq!(pin_code("end_experiment"), 7);
    }

    #[test]
    fn unknown_names_are_sentinel() {
        assert_eq!(pin_code("fire_alarm"), UNKNOWN_PIN);
        assert_eq!(pin_code(""), UNKNOWN_PIN);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for event in [
            TriggerEvent::StartExperiment,
            TriggerEvent::StartRun,
            TriggerEvent::ButtonPress,
            TriggerEvent::EndExperiment,
        ] {
            assert_eq!(event.name().parse::<TriggerEvent>(), Ok(event));
        }
    }

    #[test]
    fn dispatch_writes_one_byte_per_event() {
        let line = SharedLine::default();
        let mut dispatcher = TriggerDispatcher::new(Box::new(line.clone()));

        dispatcher.dispatch(TriggerEvent::StartRun).unwrap();
        dispatcher.dispatch_named("button_press").unwrap();
        dispatcher.dispatch_named("nonsense").unwrap();

        assert_eq!(*line.0.borrow(), vec![5, 6]);
    }

    #[test]
    fn disabled_dispatcher_is_silent() {
        let mut dispatcher = TriggerDispatcher::from_config(&PeripheralConfig::default()).unwrap();
        assert!(dispatcher.dispatch(TriggerEvent::StartExperiment).is_ok());
    }

    #[test]
    fn enabled_without_ports_is_an_error() {
        let config = PeripheralConfig {
            enabled: true,
            ..PeripheralConfig::default()
        };
        let result = TriggerDispatcher::from_config_with(&config, || Ok(Vec::new()));
        assert!(matches!(result, Err(BartError::NoSerialPort)));
    }

    #[test]
    fn disabled_never_lists_ports() {
        let result = TriggerDispatcher::from_config_with(&PeripheralConfig::default(), || {
            Err(io::Error::new(io::ErrorKind::Other, "no enumeration expected"))
        });
        assert!(result.is_ok());
    }

    #[test]
    fn first_listed_port_is_chosen() {
        let config = PeripheralConfig {
            enabled: true,
            ..PeripheralConfig::default()
        };
        let ports = vec![PathBuf::from("/dev/ttyACM0"), PathBuf::from("/dev/ttyACM1")];
        assert_eq!(
            choose_port(&config, || Ok(ports)).unwrap(),
            PathBuf::from("/dev/ttyACM0")
        );
    }

    #[test]
    fn configured_port_skips_the_listing() {
        let config = PeripheralConfig {
            enabled: true,
            port: Some(PathBuf::from("/dev/ttyUSB3")),
            ..PeripheralConfig::default()
        };
        let chosen = choose_port(&config, || {
            Err(io::Error::new(io::ErrorKind::Other, "listing failed"))
        });
        assert_eq!(chosen.unwrap(), PathBuf::from("/dev/ttyUSB3"));
    }
}
