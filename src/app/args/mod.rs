//! Command-line arguments for the demo binary.

use super::*;

const DEFAULT_RUN_TIME_SECS: f64 = 3.0;

/// `mbcomp [sample_rate] [block_size] [seconds]`, all optional.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arguments {
    pub sample_rate: f64,
    pub block_size: usize,
    pub seconds: f64,
}

impl Arguments {
    pub fn from_env() -> Result<Self> {
        Self::parse(std::env::args().skip(1))
    }

    /// Parses positional arguments, falling back to defaults for any which
    /// are missing.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let mut parsed = Self::default();

        if let Some(arg) = args.next() {
            parsed.sample_rate = parse_arg(arg.as_ref(), "sample rate")?;
        }
        if let Some(arg) = args.next() {
            parsed.block_size = parse_arg(arg.as_ref(), "block size")?;
        }
        if let Some(arg) = args.next() {
            parsed.seconds = parse_arg(arg.as_ref(), "run time")?;
        }

        if let Some(extra) = args.next() {
            return Err(Error::Argument(format!("unexpected argument \"{}\"", extra.as_ref())));
        }

        if !(parsed.sample_rate.is_finite() && parsed.sample_rate > 0.0) {
            return Err(Error::Argument(format!("sample rate must be positive, got {}", parsed.sample_rate)));
        }
        if parsed.block_size == 0 || parsed.block_size > MAX_BLOCK_SIZE {
            return Err(Error::Argument(format!(
                "block size must be within 1..={MAX_BLOCK_SIZE}, got {}",
                parsed.block_size
            )));
        }
        if !(parsed.seconds.is_finite() && parsed.seconds >= 0.0) {
            return Err(Error::Argument(format!("run time must be non-negative, got {}", parsed.seconds)));
        }

        Ok(parsed)
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
            seconds: DEFAULT_RUN_TIME_SECS,
        }
    }
}

fn parse_arg<T: std::str::FromStr>(arg: &str, name: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    arg.parse().map_err(|e| Error::Argument(format!("{name} \"{arg}\": {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Arguments::parse(Vec::<String>::new()).unwrap();
        assert_eq!(args, Arguments::default());
    }

    #[test]
    fn positional() {
        let args = Arguments::parse(["44100", "256", "0.5"]).unwrap();

        assert_eq!(args.sample_rate, 44100.0);
        assert_eq!(args.block_size, 256);
        assert_eq!(args.seconds, 0.5);
    }

    #[test]
    fn partial() {
        let args = Arguments::parse(["96000"]).unwrap();

        assert_eq!(args.sample_rate, 96000.0);
        assert_eq!(args.block_size, DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn rejects_bad_values() {
        let cases: [&[&str]; 6] = [
            &["abc"],
            &["0"],
            &["48000", "0"],
            &["48000", "999999"],
            &["48000", "512", "-1"],
            &["48000", "512", "1", "extra"],
        ];

        for bad in cases {
            assert!(matches!(Arguments::parse(bad), Err(Error::Argument(_))), "{bad:?}");
        }
    }
}
