// syn-kick -- a 909-style kick drum synthesizer
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Destinations for rendered audio.

pub mod wav;

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};

/// Where the encoded audio goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Stdout,
    File(&'a Path),
}

impl<'a> Target<'a> {
    /// A file if a path is given, standard output otherwise.
    pub fn from_path(path: Option<&'a Path>) -> Self {
        match path {
            None => Target::Stdout,
            Some(path) => Target::File(path),
        }
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Stdout => write!(f, "<stdout>"),
            Target::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum OutputError {
    #[snafu(display("Failed to open {} for writing: {}", path.display(), source))]
    Create { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to flush output: {}", source))]
    Flush { source: io::Error },
}

/// Open `target` and pass a buffered writer for it to `callback`.
///
/// The writer is flushed after the callback succeeded. If the callback fails, its
/// error is returned as is and nothing is cleaned up, so a file target may be left
/// partially written.
pub fn with_target<R, E, F>(target: Target, callback: F) -> Result<R, E>
where
    F: FnOnce(&mut dyn io::Write) -> Result<R, E>,
    E: From<OutputError>,
{
    match target {
        Target::Stdout => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            run_and_flush(&mut writer, callback)
        }
        Target::File(path) => {
            let file = File::create(path).context(Create { path })?;
            let mut writer = BufWriter::new(file);
            run_and_flush(&mut writer, callback)
        }
    }
}

fn run_and_flush<W, R, E, F>(writer: &mut W, callback: F) -> Result<R, E>
where
    W: io::Write,
    F: FnOnce(&mut dyn io::Write) -> Result<R, E>,
    E: From<OutputError>,
{
    let result = callback(writer)?;
    writer.flush().context(Flush)?;
    Ok(result)
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Output(OutputError),
        Callback,
    }

    impl From<OutputError> for TestError {
        fn from(err: OutputError) -> Self {
            TestError::Output(err)
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("syn-kick-{}-{}", std::process::id(), name))
    }

    #[test]
    fn target_from_path() {
        assert_eq!(Target::from_path(None), Target::Stdout);
        let path = Path::new("kick.wav");
        assert_eq!(Target::from_path(Some(path)), Target::File(path));
        assert_eq!(Target::File(path).to_string(), "kick.wav");
        assert_eq!(Target::Stdout.to_string(), "<stdout>");
    }

    #[test]
    fn writes_and_flushes_file() {
        let path = temp_path("flush.bin");
        let written: Result<usize, TestError> = with_target(Target::File(&path), |out| {
            out.write_all(b"kick").map_err(|_| TestError::Callback)?;
            Ok(4)
        });
        assert_eq!(written.unwrap(), 4);
        assert_eq!(std::fs::read(&path).unwrap(), b"kick");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unopenable_file() {
        let path = temp_path("missing-dir").join("kick.wav");
        let result: Result<(), TestError> = with_target(Target::File(&path), |_| Ok(()));
        match result {
            Err(TestError::Output(OutputError::Create { path: failed, .. })) => {
                assert_eq!(failed, path)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    /// Buffers everything in memory, but cannot flush.
    struct UnflushableSink(Vec<u8>);

    impl io::Write for UnflushableSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn flush_failure_is_reported() {
        let mut sink = UnflushableSink(vec![]);
        let result: Result<(), TestError> = run_and_flush(&mut sink, |out| {
            out.write_all(b"kick").map_err(|_| TestError::Callback)
        });
        assert!(matches!(
            result,
            Err(TestError::Output(OutputError::Flush { .. }))
        ));
        assert_eq!(sink.0, b"kick");
    }

    #[test]
    fn callback_error_is_passed_through() {
        let path = temp_path("callback.bin");
        let result: Result<(), TestError> =
            with_target(Target::File(&path), |_| Err(TestError::Callback));
        assert!(matches!(result, Err(TestError::Callback)));
        std::fs::remove_file(&path).unwrap();
    }
}
