//! `md5` command line tool, prints the digest of each file or string.

use clap::Parser;
use md5_engine::{compute, digest_async_reader, digest_file, Digest, Md5Result};
use std::{
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Name used for standard input in arguments and output
const STDIN_NAME: &str = "-";

/// Print MD5 digests of files, standard input or literal strings.
///
/// MD5 is cryptographically broken, use it only where a format or
/// protocol requires it.
#[derive(Parser, Debug)]
#[command(name = "md5", version, about)]
struct Args {
    /// Files to digest, `-` or nothing reads standard input
    files: Vec<PathBuf>,

    /// Digest the provided string instead of reading input
    #[arg(short, long, value_name = "TEXT", conflicts_with = "files")]
    string: Vec<String>,

    /// Print digests using uppercase hex digits
    #[arg(long)]
    upper: bool,

    /// Print only the digest without the file name
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity, may be repeated
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Log filter used when `RUST_LOG` isn't set
    fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn render(&self, digest: &Digest, name: &str) -> String {
        let hex = if self.upper {
            format!("{digest:X}")
        } else {
            format!("{digest:x}")
        };
        if self.quiet {
            hex
        } else {
            format!("{hex}  {name}")
        }
    }
}

/// Digests a single named input, standard input when the name is `-`
async fn digest_input(path: &Path) -> Md5Result<Digest> {
    if path.as_os_str() == STDIN_NAME {
        debug!("reading standard input");
        digest_async_reader(tokio::io::stdin()).await
    } else {
        digest_file(path).await
    }
}

/// Writes one line per literal string
fn write_strings<W: Write>(args: &Args, out: &mut W) -> io::Result<()> {
    for text in &args.string {
        let digest = compute(text);
        writeln!(out, "{}", args.render(&digest, &format!("\"{text}\"")))?;
    }
    Ok(())
}

/// Writes one line per input that could be digested, reporting the
/// others on stderr. Returns whether any input failed.
async fn write_files<W: Write>(args: &Args, files: &[PathBuf], out: &mut W) -> io::Result<bool> {
    info!(count = files.len(), "digesting inputs");

    let mut failed = false;
    for path in files {
        let name = path.display().to_string();
        match digest_input(path).await {
            Ok(digest) => writeln!(out, "{}", args.render(&digest, &name))?,
            Err(err) => {
                eprintln!("md5: {name}: {err}");
                failed = true;
            }
        }
    }
    Ok(failed)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = if !args.string.is_empty() {
        write_strings(&args, &mut out).map(|()| false)
    } else if args.files.is_empty() {
        write_files(&args, &[PathBuf::from(STDIN_NAME)], &mut out).await
    } else {
        write_files(&args, &args.files, &mut out).await
    };

    match result.and_then(|failed| out.flush().map(|()| failed)) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        // Reader went away (`md5 * | head`), nothing left to report
        Err(err) if err.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("md5: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("md5").chain(args.iter().copied()))
            .expect("Failed to parse arguments")
    }

    fn abc() -> Digest {
        compute(b"abc")
    }

    #[test]
    fn render_default() {
        let args = parse(&["file.txt"]);
        assert_eq!(
            args.render(&abc(), "file.txt"),
            "900150983cd24fb0d6963f7d28e17f72  file.txt"
        );
    }

    #[test]
    fn render_upper() {
        let args = parse(&["--upper", "file.txt"]);
        assert_eq!(
            args.render(&abc(), "file.txt"),
            "900150983CD24FB0D6963F7D28E17F72  file.txt"
        );
    }

    #[test]
    fn render_quiet() {
        let args = parse(&["-q", "file.txt"]);
        assert_eq!(args.render(&abc(), "file.txt"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn string_conflicts_with_files() {
        let result = Args::try_parse_from(["md5", "-s", "abc", "file.txt"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn verbosity_selects_filter() {
        assert_eq!(parse(&[]).default_filter(), "warn");
        assert_eq!(parse(&["-v"]).default_filter(), "info");
        assert_eq!(parse(&["-vv"]).default_filter(), "debug");
        assert_eq!(parse(&["-vvvv"]).default_filter(), "trace");
    }

    #[test]
    fn strings_are_quoted() {
        let args = parse(&["-s", "abc", "-s", ""]);
        let mut out = Vec::new();
        write_strings(&args, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "900150983cd24fb0d6963f7d28e17f72  \"abc\"\n\
             d41d8cd98f00b204e9800998ecf8427e  \"\"\n"
        );
    }

    /// A missing file marks the run as failed while the remaining files
    /// are still printed
    #[tokio::test]
    async fn missing_file_sets_failure() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let missing = dir.path().join("missing.txt");
        let last = dir.path().join("last.txt");
        fs::write(&first, b"abc").unwrap();
        fs::write(&last, b"message digest").unwrap();

        let args = parse(&[]);
        let files = [first.clone(), missing, last.clone()];
        let mut out = Vec::new();
        let failed = write_files(&args, &files, &mut out).await.unwrap();

        assert!(failed);
        let expected = format!(
            "900150983cd24fb0d6963f7d28e17f72  {}\nf96b697d7cb7938d525a2f31aaf161d0  {}\n",
            first.display(),
            last.display()
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[tokio::test]
    async fn all_files_succeed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        fs::write(&path, b"").unwrap();

        let mut out = Vec::new();
        let failed = write_files(&parse(&["-q"]), &[path], &mut out).await.unwrap();
        assert!(!failed);
        assert_eq!(out, b"d41d8cd98f00b204e9800998ecf8427e\n");
    }

    /// Writer that behaves like a pipe whose reader has exited
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Closed output is returned as an error instead of panicking
    #[tokio::test]
    async fn closed_output_reports_broken_pipe() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, b"abc").unwrap();

        let err = write_files(&parse(&[]), &[path], &mut ClosedPipe).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);

        let err = write_strings(&parse(&["-s", "abc"]), &mut ClosedPipe).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }
}
