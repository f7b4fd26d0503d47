//! Configuration for a joiner run.
//!
//! [`Settings`] describes which units run and how long one unit of delay
//! lasts. The defaults reproduce the classic pair: `TaskAsync` waiting
//! ten time units and `TaskAsync2` waiting five, with a time unit of one
//! second.
//!
//! [`Settings::parse_args`] builds settings from command-line flags.

use crate::error::Error;
use crate::unit::Unit;

use std::time::Duration;

/// Length of one time unit unless overridden.
pub const DEFAULT_TIME_UNIT: Duration = Duration::from_secs(1);

/// A unit to run, with its delay counted in time units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSpec {
    pub name: String,
    pub time_units: u32,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, time_units: u32) -> Self {
        Self {
            name: name.into(),
            time_units,
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    time_unit: Duration,
    units: Vec<UnitSpec>,
    wait_for_key: bool,
    verbose: bool,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Settings),
    Help,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_unit: DEFAULT_TIME_UNIT,
            units: vec![UnitSpec::new("TaskAsync", 10), UnitSpec::new("TaskAsync2", 5)],
            wait_for_key: true,
            verbose: false,
        }
    }
}

impl Settings {
    /// Sets the length of one time unit.
    pub fn with_time_unit(mut self, time_unit: Duration) -> Self {
        self.time_unit = time_unit;
        self
    }

    /// Replaces the configured units.
    pub fn with_units(mut self, units: impl IntoIterator<Item = UnitSpec>) -> Self {
        self.units = units.into_iter().collect();
        self
    }

    /// Whether to wait for a key press after the units have joined.
    pub fn with_wait_for_key(mut self, wait: bool) -> Self {
        self.wait_for_key = wait;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn time_unit(&self) -> Duration {
        self.time_unit
    }

    pub fn unit_specs(&self) -> &[UnitSpec] {
        &self.units
    }

    pub fn wait_for_key(&self) -> bool {
        self.wait_for_key
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Materializes the configured units, in order.
    pub fn build_units(&self) -> Vec<Unit> {
        self.units
            .iter()
            .map(|spec| Unit::new(spec.name.clone(), self.time_unit * spec.time_units))
            .collect()
    }

    /// Parses command-line flags (without the program name).
    ///
    /// Recognised flags:
    /// - `--time-unit-ms <N>`: length of one time unit in milliseconds,
    /// - `--no-wait`: do not wait for a key press at the end,
    /// - `-v`, `--verbose`: debug logging on stderr,
    /// - `-h`, `--help`.
    pub fn parse_args<I, S>(args: I) -> Result<Invocation, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut settings = Settings::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "--no-wait" => settings.wait_for_key = false,
                "-v" | "--verbose" => settings.verbose = true,
                "--time-unit-ms" => {
                    let value = args.next().ok_or_else(|| invalid(&arg, "missing value"))?;
                    let millis: u64 = value
                        .parse()
                        .map_err(|_| invalid(&arg, format!("`{value}` is not a number")))?;

                    if millis == 0 {
                        return Err(invalid(&arg, "must be greater than zero"));
                    }

                    settings.time_unit = Duration::from_millis(millis);
                }
                other => {
                    return Err(Error::UnknownFlag {
                        flag: other.to_owned(),
                    });
                }
            }
        }

        Ok(Invocation::Run(settings))
    }
}

fn invalid(flag: &str, reason: impl Into<String>) -> Error {
    Error::InvalidArgument {
        flag: flag.to_owned(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation, Error> {
        Settings::parse_args(args.iter().copied())
    }

    #[test]
    fn defaults_match_the_classic_pair() {
        let settings = Settings::default();
        let units = settings.build_units();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name(), "TaskAsync");
        assert_eq!(units[0].delay(), Duration::from_millis(10_000));
        assert_eq!(units[1].name(), "TaskAsync2");
        assert_eq!(units[1].delay(), Duration::from_millis(5_000));
        assert!(settings.wait_for_key());
        assert!(!settings.verbose());
    }

    #[test]
    fn time_unit_scales_every_delay() {
        let settings = Settings::default()
            .with_time_unit(Duration::from_millis(20))
            .with_units([UnitSpec::new("x", 3)]);

        let units = settings.build_units();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].delay(), Duration::from_millis(60));
    }

    #[test]
    fn no_flags_runs_defaults() {
        assert_eq!(parse(&[]).unwrap(), Invocation::Run(Settings::default()));
    }

    #[test]
    fn flags_are_applied() {
        let Invocation::Run(settings) = parse(&["--time-unit-ms", "50", "--no-wait", "-v"]).unwrap()
        else {
            panic!("expected a run");
        };

        assert_eq!(settings.time_unit(), Duration::from_millis(50));
        assert!(!settings.wait_for_key());
        assert!(settings.verbose());
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse(&["--no-wait", "--help"]).unwrap(), Invocation::Help);
    }

    #[test]
    fn bad_values_are_rejected() {
        for args in [
            &["--time-unit-ms"][..],
            &["--time-unit-ms", "soon"],
            &["--time-unit-ms", "0"],
        ] {
            assert!(
                matches!(parse(args), Err(Error::InvalidArgument { .. })),
                "{args:?} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_flags_are_named() {
        let err = parse(&["--no-wait", "--fast"]).unwrap_err();

        assert!(matches!(&err, Error::UnknownFlag { flag } if flag == "--fast"));
        assert_eq!(err.to_string(), "unknown flag `--fast`");
    }

    #[test]
    fn builder_setters_round_trip() {
        let settings = Settings::default()
            .with_units([UnitSpec::new("a", 2), UnitSpec::new("b", 1)])
            .with_wait_for_key(false)
            .with_verbose(true);

        assert_eq!(
            settings.unit_specs(),
            [UnitSpec::new("a", 2), UnitSpec::new("b", 1)]
        );
        assert!(!settings.wait_for_key());
        assert!(settings.verbose());
    }
}
