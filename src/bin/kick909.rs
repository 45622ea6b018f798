// syn-kick -- a 909-style kick drum synthesizer
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `kick909` renders a single 909-style kick drum into a 24 bit WAV file.

use std::path::PathBuf;
use std::process;

use log::error;
use structopt::clap::AppSettings;
use structopt::StructOpt;

use syn_kick::output::Target;
use syn_kick::render::{self, RenderError, RenderSettings};
use syn_kick::synth::KickParams;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "kick909",
    about = "Synthesizing a 909-style kick drum",
    setting = AppSettings::AllowNegativeNumbers
)]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// Pitch of the kick, nominally between 0 and 1.
    tune: f64,

    /// Length of the attack, nominally between 0 and 1.
    attack: f64,

    /// Length of the decay and pitch sweep, nominally between 0 and 1.
    decay: f64,

    /// Output gain, nominally between 0 and 1.
    level: f64,

    /// Output WAV file. The audio is written to stdout if not given.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Samples per second.
    #[structopt(long, default_value = "48000")]
    sample_rate: u32,

    /// Length of the rendered audio in seconds.
    #[structopt(long, default_value = "1.0")]
    duration: f64,
}

fn main() {
    let opt = Opt::from_args();

    // simple_logger prints to stdout, where it would end up in the middle of the audio.
    let logging = opt.output.is_some();
    if logging {
        let level = match opt.verbose {
            0 => log::Level::Info,
            1 => log::Level::Debug,
            _ => log::Level::Trace,
        };
        if let Err(err) = simple_logger::init_with_level(level) {
            eprintln!("Failed to initialize logging: {}", err);
        }
    }

    process::exit(exit_status(run(&opt), logging));
}

fn run(opt: &Opt) -> Result<usize, RenderError> {
    let params = KickParams::new(opt.tune, opt.attack, opt.decay, opt.level);
    let settings = RenderSettings {
        sample_rate: opt.sample_rate,
        duration: opt.duration,
    };
    let target = Target::from_path(opt.output.as_deref());
    render::render(params, &settings, target)
}

/// Report a failed render and map it to the process exit status.
fn exit_status(result: Result<usize, RenderError>, logging: bool) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            if logging {
                error!("{}", err);
            } else {
                eprintln!("kick909: {}", err);
            }
            1
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Opt, structopt::clap::Error> {
        Opt::from_iter_safe(std::iter::once("kick909").chain(args.iter().copied()))
    }

    #[test]
    fn negative_knobs_and_defaults() {
        let opt = parse(&["-0.5", "-1", "0.5", "1"]).unwrap();
        assert_eq!(opt.tune, -0.5);
        assert_eq!(opt.attack, -1.0);
        assert_eq!(opt.decay, 0.5);
        assert_eq!(opt.level, 1.0);
        assert_eq!(opt.sample_rate, 48000);
        assert_eq!(opt.duration, 1.0);
        assert_eq!(opt.output, None);
        assert_eq!(opt.verbose, 0);
    }

    #[test]
    fn all_options() {
        let opt = parse(&[
            "-vv",
            "--sample-rate",
            "44100",
            "--duration",
            "0.5",
            "0.1",
            "0.2",
            "0.3",
            "0.4",
            "-o",
            "kick.wav",
        ])
        .unwrap();
        assert_eq!(opt.verbose, 2);
        assert_eq!(opt.sample_rate, 44100);
        assert_eq!(opt.duration, 0.5);
        assert_eq!(opt.output, Some(PathBuf::from("kick.wav")));
    }

    #[test]
    fn usage_errors() {
        assert!(parse(&["abc", "0", "0", "0"]).is_err());
        assert!(parse(&["0", "0", "0"]).is_err());
        assert!(parse(&["0", "0", "0", "0", "-o"]).is_err());
    }

    #[test]
    fn failures_exit_with_one() {
        let path = std::env::temp_dir()
            .join(format!("kick909-{}-nowhere", process::id()))
            .join("kick.wav");
        let opt = parse(&["0.5", "0", "0.5", "1", "-o", path.to_str().unwrap()]).unwrap();
        let result = run(&opt);
        assert!(matches!(result, Err(RenderError::Output { .. })));
        assert_eq!(exit_status(result, false), 1);
    }

    #[test]
    fn success_exits_with_zero() {
        let path = std::env::temp_dir().join(format!("kick909-{}-ok.wav", process::id()));
        let opt = parse(&[
            "--duration",
            "0.01",
            "0.5",
            "0",
            "0.5",
            "1",
            "-o",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let result = run(&opt);
        assert!(matches!(result, Ok(480)));
        assert_eq!(exit_status(result, false), 0);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 44 + 480 * 3);
        std::fs::remove_file(&path).unwrap();
    }
}
