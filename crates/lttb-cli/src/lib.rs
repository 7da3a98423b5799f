// lttb-cli: argument parsing, logging setup and the query loop for
// lt-paradigm.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use lttb_core::Direction;
use lttb_paradigm::{ParadigmOptions, ParadigmSession};

/// List the paradigm cells of a compiled transducer that match each query.
///
/// Reads one pattern per line (`lemma<tag><*>`, `*<n><*>`, ...) and writes
/// `analysis:surface` lines.
#[derive(Parser, Debug, Clone)]
#[command(name = "lt-paradigm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ParadigmArgs {
    /// Treat the transducer as an analyser (default: generator)
    #[arg(short, long)]
    pub analyser: bool,

    /// Drop results whose analysis carries TAG (repeatable)
    #[arg(short, long = "exclude", value_name = "TAG")]
    pub exclude: Vec<String>,

    /// Sort the output lines of each query
    #[arg(short, long)]
    pub sort: bool,

    /// Treat NUL as a query terminator and write NUL after each answer
    #[arg(short = 'z', long)]
    pub null_flush: bool,

    /// Verbosity level (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Compiled transducer file (or $LTTB_PARADIGM_FST)
    #[arg(value_name = "FST", env = "LTTB_PARADIGM_FST")]
    pub fst: PathBuf,

    /// Query file (default: stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

impl ParadigmArgs {
    /// 0 = errors only, 1 = warnings (default), 2 = info, 3+ = debug and below.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    pub fn direction(&self) -> Direction {
        if self.analyser {
            Direction::Analysis
        } else {
            Direction::Generation
        }
    }

    pub fn options(&self) -> ParadigmOptions {
        let mut options = ParadigmOptions::new()
            .with_direction(self.direction())
            .with_sort(self.sort);
        for tag in &self.exclude {
            options = options.exclude(tag.clone());
        }
        options
    }
}

pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger. Safe to call more than once.
pub fn init_logging(verbosity: u8) {
    let _ = Builder::new()
        .filter_level(level_filter(verbosity))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Counters for one run of the query loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub queries: usize,
    pub lines: usize,
    pub errors: usize,
}

/// Read the next query into `buf`, without its terminator.
///
/// Returns `None` at end of input, otherwise whether the query ended with
/// a NUL byte.
fn read_query<R: BufRead>(
    reader: &mut R,
    null_flush: bool,
    buf: &mut Vec<u8>,
) -> io::Result<Option<bool>> {
    buf.clear();
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok((!buf.is_empty()).then_some(false));
        }
        match available
            .iter()
            .position(|&b| b == b'\n' || (null_flush && b == 0))
        {
            Some(i) => {
                let nul = available[i] == 0;
                buf.extend_from_slice(&available[..i]);
                reader.consume(i + 1);
                return Ok(Some(nul));
            }
            None => {
                let len = available.len();
                buf.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}

/// Answer every query from `reader`, writing results to `writer`.
///
/// Output is flushed after each query. Malformed patterns are logged and
/// produce no output; only I/O failures end the loop.
pub fn serve<R: BufRead, W: Write>(
    session: &ParadigmSession,
    mut reader: R,
    mut writer: W,
    null_flush: bool,
) -> io::Result<QueryStats> {
    let mut stats = QueryStats::default();
    let mut buf = Vec::new();

    while let Some(ended_with_nul) = read_query(&mut reader, null_flush, &mut buf)? {
        let text = match std::str::from_utf8(&buf) {
            Ok(t) => t.trim_end_matches('\r'),
            Err(e) => {
                log::warn!("skipping query that is not valid UTF-8: {e}");
                stats.errors += 1;
                ""
            }
        };

        if !text.trim().is_empty() {
            stats.queries += 1;
            match session.query(text) {
                Ok(lines) => {
                    for line in &lines {
                        writeln!(writer, "{line}")?;
                    }
                    stats.lines += lines.len();
                }
                Err(e) => {
                    log::warn!("invalid pattern '{text}': {e}");
                    stats.errors += 1;
                }
            }
        } else if !(null_flush && ended_with_nul) {
            continue;
        }

        if null_flush {
            writer.write_all(b"\0")?;
        }
        writer.flush()?;
    }

    log::debug!(
        "{} queries, {} lines, {} errors",
        stats.queries,
        stats.lines,
        stats.errors
    );
    Ok(stats)
}

fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(p) => Box::new(BufReader::new(
            File::open(p).with_context(|| format!("cannot open input {}", p.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("cannot create output {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Load the transducer named by `args` and serve queries until end of input.
pub fn run(args: &ParadigmArgs) -> anyhow::Result<QueryStats> {
    let session = ParadigmSession::open(&args.fst, args.options())
        .with_context(|| format!("cannot start a session on {}", args.fst.display()))?;
    log::info!(
        "loaded {} ({} states, {} direction)",
        args.fst.display(),
        session.transducer().state_count(),
        session.direction()
    );

    let input = open_input(args.input.as_deref())?;
    let output = open_output(args.output.as_deref())?;
    serve(&session, input, output, args.null_flush).context("query loop failed")
}

/// Print an error message and exit with code 1.
pub fn fatal(err: &anyhow::Error) -> ! {
    eprintln!("error: {err:#}");
    process::exit(1);
}
