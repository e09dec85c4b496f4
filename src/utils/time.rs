//! Time base conversions shared by the probe mapper and the exchange format

use crate::domain::errors::DomainError;
use crate::domain::model::Timestamp;

/// Rational time base used to express offsets as integer ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timebase {
    pub num: u64,
    pub den: u64,
}

impl Timebase {
    /// Millisecond time base written into chapter sections
    pub const MILLIS: Timebase = Timebase { num: 1, den: 1000 };

    /// Create a new timebase
    pub fn new(num: u64, den: u64) -> Result<Self, DomainError> {
        if num == 0 || den == 0 {
            return Err(DomainError::BadArgs(format!(
                "Timebase {}/{} must have non-zero terms",
                num, den
            )));
        }
        Ok(Self { num, den })
    }

    /// Parse a `num/den` string such as `1/1000`
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let (num, den) = value
            .trim()
            .split_once('/')
            .ok_or_else(|| DomainError::BadArgs(format!("Invalid timebase '{}'", value)))?;
        let num = num
            .trim()
            .parse::<u64>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid timebase '{}'", value)))?;
        let den = den
            .trim()
            .parse::<u64>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid timebase '{}'", value)))?;
        Self::new(num, den)
    }

    /// Convert ticks in this timebase to a millisecond timestamp, rounding to nearest
    pub fn ticks_to_timestamp(&self, ticks: u64) -> Result<Timestamp, DomainError> {
        let out_of_range = || {
            DomainError::BadArgs(format!(
                "{} ticks at timebase {}/{} is out of range",
                ticks, self.num, self.den
            ))
        };
        let scaled = u128::from(ticks)
            .checked_mul(u128::from(self.num))
            .and_then(|v| v.checked_mul(1000))
            .ok_or_else(out_of_range)?;
        let den = u128::from(self.den);
        let millis = u64::try_from((scaled + den / 2) / den).map_err(|_| out_of_range())?;
        Ok(Timestamp::from_millis(millis))
    }
}

/// Parse a decimal seconds string as reported by ffprobe (e.g. `"60.000000"`)
pub fn parse_seconds(value: &str) -> Result<Timestamp, DomainError> {
    let seconds = value
        .trim()
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs(format!("'{}' is not a number of seconds", value)))?;
    Timestamp::from_secs_f64(seconds)
}
