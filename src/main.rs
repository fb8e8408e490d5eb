//! uCode Disasm CLI
//!
//! Command-line tool for listing iAPX 432 execution-unit microcode images.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use ucode_disasm::listing::{self, JsonFormatter, ListingFormatter, TextFormatter};
use ucode_disasm::{
    analyze, DisasmOptions, Disassembler, ListingOptions, MicrocodeImage, TraceFaultResolution,
};

/// iAPX 432 execution-unit microcode disassembler.
///
/// Lists a 4096-word control-store image with decoded fields, inbound
/// call/branch/conditional-branch markers and block separators.
#[derive(Parser, Debug)]
#[command(name = "ucode-dis")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Microcode image (one hex word per line, or raw with --binary)
    #[arg(required_unless_present_any = ["patterns", "opcode"])]
    image: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Image is raw big-endian words instead of hex text
    #[arg(short, long)]
    binary: bool,

    /// Which of the overlapping trace-fault encodings to keep
    #[arg(long, default_value = "set-trace-fault", env = "UCODE_TRACE_FAULT")]
    resolution: Resolution,

    /// Do not insert blank lines at block boundaries
    #[arg(long)]
    no_separators: bool,

    /// Do not print the S/B/C reference column
    #[arg(long)]
    no_flags: bool,

    /// Print the cross-reference tables after the listing
    #[arg(short, long)]
    xref: bool,

    /// Print the compiled pattern table and exit
    #[arg(long)]
    patterns: bool,

    /// Disassemble a single hex opcode and exit
    #[arg(long, value_name = "HEX")]
    opcode: Option<String>,

    /// Decode image words on all cores
    #[arg(long)]
    parallel: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON document
    Json,
}

/// Trace-fault resolution options.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Resolution {
    /// Keep "Set Trace Fault"
    SetTraceFault,
    /// Keep "Access Destination"
    AccessDestination,
}

impl From<Resolution> for TraceFaultResolution {
    fn from(r: Resolution) -> Self {
        match r {
            Resolution::SetTraceFault => Self::SetTraceFault,
            Resolution::AccessDestination => Self::AccessDestination,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging if verbose
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("ucode_disasm=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let options = DisasmOptions {
        trace_fault: args.resolution.into(),
        parallel: args.parallel,
    };
    let disassembler =
        Disassembler::new(&options).context("building the microinstruction decode table")?;

    if args.patterns {
        print!("{}", listing::format_patterns(disassembler.patterns()));
        return Ok(());
    }

    if let Some(text) = &args.opcode {
        let opcode = parse_opcode(text)?;
        println!("{:04x}  {}", opcode, disassembler.disassemble(opcode));
        return Ok(());
    }

    let Some(path) = &args.image else {
        bail!("no image given");
    };
    let image = if args.binary {
        MicrocodeImage::load_binary(path)
    } else {
        MicrocodeImage::load(path)
    }
    .with_context(|| format!("loading {}", path.display()))?;

    let analysis = analyze(&disassembler, &image, &options);

    match args.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::with_options(ListingOptions {
                separators: !args.no_separators,
                flags: !args.no_flags,
            });
            print!("{}", formatter.format_listing(&analysis));
            if args.xref {
                println!();
                print!("{}", listing::format_xref(&analysis.refs));
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new().format_listing(&analysis));
        }
    }

    Ok(())
}

fn parse_opcode(text: &str) -> anyhow::Result<u16> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u16::from_str_radix(digits, 16).with_context(|| format!("'{text}' is not a 16-bit hex opcode"))
}
