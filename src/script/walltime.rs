use std::fmt;
use std::str::FromStr;

use serde_yaml::Value;

use desc::RunDesc;

use super::Error;

/// A scheduler walltime, kept in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Walltime(u64);

impl Walltime {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Read a walltime from a description; either an integer number of seconds
    /// or an `H:MM:SS` string.
    pub fn from_desc(desc: &RunDesc, path: &[&str]) -> anyhow::Result<Self> {
        match desc.get(path)? {
            Value::Number(n) => n
                .as_u64()
                .map(Self)
                .ok_or_else(|| Error::InvalidWalltime(n.to_string()).into()),
            _ => Ok(desc.get_str(path)?.parse()?),
        }
    }

    /// This walltime repeated `n` times.
    pub fn times(&self, n: u64) -> Self {
        Self(self.0 * n)
    }
}

impl FromStr for Walltime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidWalltime(s.to_owned());
        let s = s.trim();
        if let Ok(secs) = s.parse::<u64>() {
            return Ok(Self(secs));
        }
        let mut parts = s.split(':').map(|part| part.parse::<u64>());
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(h)), Some(Ok(m)), Some(Ok(sec)), None) if m < 60 && sec < 60 => {
                Ok(Self(h * 3600 + m * 60 + sec))
            }
            _ => Err(invalid()),
        }
    }
}

/// `H:MM:SS`, with minutes and seconds zero-padded.
impl fmt::Display for Walltime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (h, rem) = (self.0 / 3600, self.0 % 3600);
        write!(f, "{}:{:02}:{:02}", h, rem / 60, rem % 60)
    }
}
