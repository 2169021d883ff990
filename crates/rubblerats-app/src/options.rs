//! Command-line options for the `rubblerats` binary.

use std::path::PathBuf;

/// Default number of ticks for a run.
pub const DEFAULT_TICKS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Options {
    /// JSON `SwarmConfig`; defaults apply when absent.
    pub config: Option<PathBuf>,
    /// JSON array of driver commands queued before the first tick.
    pub commands: Option<PathBuf>,
    /// Overrides the configured seed.
    pub seed: Option<u64>,
    pub ticks: u64,
    /// Run against the wall clock on the loop thread instead of stepping.
    pub realtime: bool,
    /// Skip the generated scenario and start from an empty field.
    pub empty: bool,
    pub help: bool,
}

/// Parse arguments (without the program name).
pub fn parse(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        ticks: DEFAULT_TICKS,
        ..Default::default()
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => options.config = Some(PathBuf::from(value(&mut iter, arg)?)),
            "--commands" => options.commands = Some(PathBuf::from(value(&mut iter, arg)?)),
            "--seed" => {
                let raw = value(&mut iter, arg)?;
                options.seed = Some(raw.parse().map_err(|_| format!("invalid seed: {raw}"))?);
            }
            "--ticks" => {
                let raw = value(&mut iter, arg)?;
                options.ticks = raw.parse().map_err(|_| format!("invalid tick count: {raw}"))?;
            }
            "--realtime" => options.realtime = true,
            "--empty" => options.empty = true,
            "help" | "--help" | "-h" => options.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str, String> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

pub fn usage() -> &'static str {
    "rubblerats: headless RUBBLE RATS swarm simulation\n\
     \n\
     Options:\n\
     \n\
       --config <path>    JSON SwarmConfig (partial configs are fine)\n\
       --commands <path>  JSON array of driver commands to queue at start\n\
       --seed <N>         Override the configured RNG seed\n\
       --ticks <N>        Number of ticks to run (default: 300)\n\
       --realtime         Run on the loop thread at the configured tick rate\n\
       --empty            Do not generate the default scenario\n\
     \n\
     The final snapshot is printed to stdout as JSON. Set RUST_LOG=info\n\
     (or debug) for progress on stderr.\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let options = parse(&[]).unwrap();
        assert_eq!(options.ticks, DEFAULT_TICKS);
        assert!(options.config.is_none());
        assert!(!options.realtime);
    }

    #[test]
    fn test_all_flags() {
        let options = parse(&args(&[
            "--config", "swarm.json", "--commands", "script.json", "--seed", "7", "--ticks", "90",
            "--realtime", "--empty",
        ]))
        .unwrap();
        assert_eq!(options.config, Some(PathBuf::from("swarm.json")));
        assert_eq!(options.commands, Some(PathBuf::from("script.json")));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.ticks, 90);
        assert!(options.realtime && options.empty);
    }

    #[test]
    fn test_errors() {
        assert!(parse(&args(&["--ticks"])).unwrap_err().contains("needs a value"));
        assert!(parse(&args(&["--ticks", "many"])).unwrap_err().contains("invalid tick count"));
        assert!(parse(&args(&["--bogus"])).unwrap_err().contains("unknown argument"));
    }
}
