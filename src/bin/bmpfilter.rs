//! bmpfilter CLI - apply one filter to a BMP image
//!
//! Runs an interactive numbered menu by default, or a single filter when
//! `--filter` is given.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{ArgAction, Parser};
use log::{debug, info, warn};

use bmpfilter::{
    BitmapError, DecodeRequest, EnlargeMode, Filter, FilterKind, Limits, ParamKind,
    Permissiveness, Unstoppable, header_fields, write_bmp_file,
};

/// Apply a vignette, clarendon, grayscale, rotation, enlarge, contrast,
/// lighten, darken or primaries filter to an uncompressed BMP.
#[derive(Parser, Debug)]
#[command(name = "bmpfilter")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    bmpfilter                                  Interactive menu
    bmpfilter sample.bmp                       Interactive menu for sample.bmp
    bmpfilter sample.bmp -f grayscale          Grayscale to new_sample.bmp
    bmpfilter sample.bmp -f 5 -p -1            Rotate counter-clockwise once
    bmpfilter sample.bmp -f enlarge -p 2 -o big.bmp
    bmpfilter sample.bmp --info                Print header fields")]
struct Args {
    /// Input BMP file (prompted for when omitted)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output BMP file
    #[arg(short, long, value_name = "OUTPUT", default_value = "new_sample.bmp")]
    output: PathBuf,

    /// Run one filter and exit (name or menu number 1-10)
    #[arg(short, long, value_parser = FilterKind::from_str, requires = "input")]
    filter: Option<FilterKind>,

    /// Filter parameter: scaling factor, rotation count or enlarge scale
    #[arg(short, long, allow_hyphen_values = true)]
    param: Option<String>,

    /// Enlarge keeps the input size and samples at scaled coordinates
    #[arg(long)]
    resample: bool,

    /// Also require the declared file size to match the input length
    #[arg(long, conflicts_with = "permissive")]
    strict: bool,

    /// Ignore the declared file size and the BM tag
    #[arg(long)]
    permissive: bool,

    /// Refuse to decode images with more pixels than this
    #[arg(long, value_name = "N")]
    max_pixels: Option<u64>,

    /// Print the input's header fields and exit
    #[arg(long, requires = "input")]
    info: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

/// Decode/output settings shared by one-shot and interactive runs.
struct Session {
    output: PathBuf,
    permissiveness: Permissiveness,
    limits: Limits,
    enlarge_mode: EnlargeMode,
}

impl Session {
    fn from_args(args: &Args) -> Self {
        let permissiveness = if args.strict {
            Permissiveness::Strict
        } else if args.permissive {
            Permissiveness::Permissive
        } else {
            Permissiveness::Standard
        };
        Self {
            output: args.output.clone(),
            permissiveness,
            limits: Limits {
                max_pixels: args.max_pixels,
                ..Limits::default()
            },
            enlarge_mode: if args.resample {
                EnlargeMode::Resample
            } else {
                EnlargeMode::Magnify
            },
        }
    }

    /// Decode `input`, apply `filter`, write the configured output.
    fn run(&self, input: &Path, filter: Filter) -> Result<(), BitmapError> {
        let data = fs::read(input)?;
        let grid = DecodeRequest::new(&data)
            .with_limits(&self.limits)
            .with_permissiveness(self.permissiveness)
            .decode(Unstoppable)?;
        info!(
            "decoded {}: {}x{}",
            input.display(),
            grid.width(),
            grid.height()
        );

        let filtered = filter.with_enlarge_mode(self.enlarge_mode).apply(&grid)?;
        debug!(
            "{} produced {}x{}",
            filter.kind(),
            filtered.width(),
            filtered.height()
        );

        write_bmp_file(&self.output, &filtered)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.quiet {
        log::LevelFilter::Error
    } else {
        match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let session = Session::from_args(&args);
    // clap enforces that --info and --filter come with an input path.
    let result = match (args.info, args.filter, args.input.as_deref()) {
        (true, _, Some(input)) => print_header(input),
        (false, Some(kind), Some(input)) => {
            run_once(&session, input, kind, args.param.as_deref())
        }
        _ => interactive(
            &session,
            args.input.clone(),
            &mut io::stdin().lock(),
            &mut io::stdout().lock(),
        )
        .map_err(BitmapError::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_header(input: &Path) -> Result<(), BitmapError> {
    let data = fs::read(input)?;
    for (name, value) in header_fields(&data)? {
        println!("{name:>18}: {value}");
    }
    Ok(())
}

fn run_once(
    session: &Session,
    input: &Path,
    kind: FilterKind,
    param: Option<&str>,
) -> Result<(), BitmapError> {
    let filter = kind.with_param(param)?;
    session.run(input, filter)?;
    println!(
        "Applied {} to {}, wrote {}",
        kind.label(),
        input.display(),
        session.output.display()
    );
    Ok(())
}

// ── Interactive menu ────────────────────────────────────────────────

/// Print `message`, read one trimmed line. `None` on end of input.
fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    message: &str,
) -> io::Result<Option<String>> {
    writeln!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_menu(out: &mut impl Write, current: &Path) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "IMAGE PROCESSING MENU")?;
    writeln!(out, "0) Change image (current: {})", current.display())?;
    for kind in FilterKind::ALL {
        writeln!(out, "{}) {}", kind.menu_number(), kind.label())?;
    }
    Ok(())
}

fn interactive(
    session: &Session,
    input: Option<PathBuf>,
    lines: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "BMP image processing")?;
    let mut current = match input {
        Some(path) => path,
        None => match prompt(lines, out, "Enter input BMP filename")? {
            Some(name) => PathBuf::from(name),
            None => return Ok(()),
        },
    };

    loop {
        print_menu(out, &current)?;
        let Some(selection) = prompt(lines, out, "Enter menu selection (Q to quit):")? else {
            return Ok(());
        };

        if selection.eq_ignore_ascii_case("q") {
            writeln!(out, "Thank you for using the program!")?;
            return Ok(());
        }
        if selection == "0" {
            if let Some(name) = prompt(lines, out, "Enter new input BMP filename")? {
                current = PathBuf::from(name);
            }
            continue;
        }

        let Some(kind) = selection.parse::<u8>().ok().and_then(FilterKind::from_menu) else {
            writeln!(out, "No filter matches {selection:?}")?;
            continue;
        };

        let param = match (kind.param(), kind.default_param()) {
            (ParamKind::None, _) | (_, Some(_)) => None,
            (param_kind, None) => {
                let message = param_kind.prompt().unwrap_or("Enter parameter");
                match prompt(lines, out, message)? {
                    Some(raw) => Some(raw),
                    None => return Ok(()),
                }
            }
        };

        let outcome = kind
            .with_param(param.as_deref())
            .and_then(|filter| session.run(&current, filter));
        match outcome {
            Ok(()) => writeln!(
                out,
                "Successfully applied {}! Output written to {}",
                kind.label(),
                session.output.display()
            )?,
            Err(e) => {
                warn!("{} failed on {}: {e}", kind.name(), current.display());
                writeln!(out, "{} failed: {e}", kind.label())?;
            }
        }
    }
}
