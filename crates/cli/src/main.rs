mod render;
mod stream;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::stream::StreamProcessor;

/// Readable, colorized view of an AI coding-assistant transcript stream.
#[derive(Parser, Debug)]
#[command(name = "tracelight", version, about)]
struct Cli {
    /// Transcript file to render; reads stdin when omitted
    file: Option<PathBuf>,

    /// Prefix each entry with its arrival timestamp
    #[arg(long)]
    debug: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    install_interrupt_handler();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        if is_pipe_closed(&e) {
            return;
        }
        eprintln!("{}", format!("Error: {e:#}").red());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let out = stdout.lock();
    match &cli.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            feed(BufReader::new(file), out, cli.debug)
        }
        None => {
            let stdin = io::stdin();
            feed(stdin.lock(), out, cli.debug)
        }
    }
}

/// Pump lines from the reader into the stream processor until EOF.
fn feed<R: BufRead, W: Write>(reader: R, out: W, debug: bool) -> Result<()> {
    let mut processor = StreamProcessor::new(out, debug);
    for line in reader.lines() {
        let line = line.context("failed to read input line")?;
        processor.process_line(&line)?;
    }
    processor.finish()?;
    Ok(())
}

/// A reader closing the pipe mid-stream is a normal way for a session
/// to end (`tracelight f.jsonl | head`), not an error.
fn is_pipe_closed(e: &anyhow::Error) -> bool {
    e.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
}

/// Exit cleanly on Ctrl-C instead of surfacing a signal death to the
/// shell. Partial output is already flushed per entry.
#[cfg(unix)]
fn install_interrupt_handler() {
    extern "C" fn on_interrupt(_: libc::c_int) {
        unsafe { libc::_exit(0) }
    }
    unsafe {
        libc::signal(
            libc::SIGINT,
            on_interrupt as extern "C" fn(libc::c_int) as libc::sighandler_t,
        );
    }
}

#[cfg(not(unix))]
fn install_interrupt_handler() {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_feed_renders_a_transcript_file() {
        colored::control::set_override(false);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type":"system","subtype":"init"}}"#).unwrap();
        writeln!(
            file,
            r#"{{"type":"assistant","message":{{"content":[{{"type":"tool_use","id":"t1","name":"Bash","input":{{"command":"ls"}}}}]}}}}"#
        )
        .unwrap();
        writeln!(
            file,
            r#"{{"type":"user","message":{{"content":[{{"type":"tool_result","tool_use_id":"t1","content":"ok"}}]}}}}"#
        )
        .unwrap();
        writeln!(file, r#"{{"type":"result","result":"All done."}}"#).unwrap();

        let reader = BufReader::new(File::open(file.path()).unwrap());
        let mut out = Vec::new();
        feed(reader, &mut out, false).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("System (init)"));
        assert!(out.contains("Bash(ls)"));
        assert!(out.contains("✅ Tool Result"));
        assert!(out.contains("Final Result"));
        assert!(out.contains("All done."));
    }

    #[test]
    fn test_pipe_closed_detection() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = anyhow::Error::from(io_err).context("writing output");
        assert!(is_pipe_closed(&err));

        let other = anyhow::anyhow!("something else");
        assert!(!is_pipe_closed(&other));
    }
}
