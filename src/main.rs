//! # Termica CLI
//!
//! Command-line interface for ESC/POS receipt printers.
//!
//! ## Usage
//!
//! ```bash
//! # Print an EAN-13 barcode (check digit computed) over Bluetooth
//! termica barcode ean13 400638133393
//!
//! # UPC-A on a network printer, HRI text above and below
//! termica --tcp 192.168.1.50 barcode upca 03600029145 --text both
//!
//! # Centered bold line, then cut
//! termica --cut text "THANK YOU" --center --bold
//!
//! # Print a logo on a 58mm printer
//! termica --profile pos58 image logo.png --center
//!
//! # Save the job bytes instead of printing
//! termica --out job.bin barcode ean8 9638507
//!
//! # List built-in printer profiles
//! termica profiles
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `termica=info`).

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use termica::{
    Cut, PrintJob, PrinterCapabilities, Symbology, TermicaError, TextPosition,
    barcode::Barcode,
    elements::{BarcodeElement, RasterImage, TextRun},
    protocol::text::Alignment,
    transport::{Backoff, BluetoothTransport, TcpConnection, bluetooth},
};
use tracing::info;

/// Termica - ESC/POS thermal printer utility
#[derive(Parser, Debug)]
#[command(name = "termica")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("output").args(["device", "tcp", "out"])))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bluetooth RFCOMM device path (default output)
    #[arg(long, global = true)]
    device: Option<PathBuf>,

    /// Network printer, HOST or HOST:PORT (port defaults to 9100)
    #[arg(long, global = true, value_name = "HOST:PORT")]
    tcp: Option<String>,

    /// Write the job bytes to a file instead of printing
    #[arg(long, global = true, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Printer profile: pos58, pos80, mobile180, or a JSON file
    #[arg(long, global = true, default_value = "pos80")]
    profile: String,

    /// Connection attempts for --tcp
    #[arg(long, global = true, default_value_t = 3)]
    retries: u32,

    /// Lines to feed after printing
    #[arg(long, global = true, default_value_t = 3)]
    feed: u8,

    /// Partial cut after printing
    #[arg(long, global = true)]
    cut: bool,

    /// Full cut after printing
    #[arg(long, global = true, conflicts_with = "cut")]
    full_cut: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a retail barcode
    Barcode {
        /// Symbology
        kind: Kind,

        /// Digits, with or without the check digit
        code: String,

        /// Barcode width in millimeters
        #[arg(long, default_value_t = 40.0)]
        width_mm: f32,

        /// Bar height in millimeters
        #[arg(long, default_value_t = 12.0)]
        height_mm: f32,

        /// Human-readable digits: none, above, below, both (or 0-3)
        #[arg(long, default_value = "below")]
        text: TextPosition,

        /// Center on the paper
        #[arg(long)]
        center: bool,
    },

    /// Print a line of text
    Text {
        text: String,

        #[arg(long, conflicts_with = "right")]
        center: bool,

        #[arg(long)]
        right: bool,

        #[arg(long)]
        bold: bool,

        /// Character size multiplier (1-8)
        #[arg(long, default_value_t = 1)]
        size: u8,
    },

    /// Print an image file as a thresholded bitmap
    Image {
        path: PathBuf,

        /// Pixels darker than this print black (0-255)
        #[arg(long, default_value_t = 128)]
        threshold: u8,

        #[arg(long)]
        center: bool,
    },

    /// List built-in printer profiles
    Profiles,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Ean13,
    Ean8,
    Upca,
}

impl From<Kind> for Symbology {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Ean13 => Symbology::Ean13,
            Kind::Ean8 => Symbology::Ean8,
            Kind::Upca => Symbology::UpcA,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "termica=info".into()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), TermicaError> {
    let cli = Cli::parse();
    let caps = PrinterCapabilities::parse(&cli.profile)?;

    let cut = match (cli.cut, cli.full_cut) {
        (_, true) => Some(Cut::Full),
        (true, _) => Some(Cut::Partial),
        _ => None,
    };
    let mut job = PrintJob::new(&caps).feed(cli.feed).cut_with(cut);

    match &cli.command {
        Commands::Profiles => {
            for p in PrinterCapabilities::built_in() {
                println!(
                    "{:<14} {} dpi, {}mm ({} dots), {} chars/line",
                    p.name,
                    p.dpi,
                    p.width_mm,
                    p.width_dots(),
                    p.chars_per_line
                );
            }
            return Ok(());
        }

        Commands::Barcode {
            kind,
            code,
            width_mm,
            height_mm,
            text,
            center,
        } => {
            let barcode =
                Barcode::new(&caps, (*kind).into(), code, *width_mm, *height_mm, *text)?;
            info!(symbology = %barcode.symbology(), code = barcode.code(), "barcode validated");
            let element = BarcodeElement::new(barcode, &caps)?;
            job.push(if *center { element.center() } else { element })?;
        }

        Commands::Text {
            text,
            center,
            right,
            bold,
            size,
        } => {
            let mut run = TextRun::new(text.as_str()).size(*size, *size)?;
            if *bold {
                run = run.bold();
            }
            let alignment = match (center, right) {
                (true, _) => Alignment::Center,
                (_, true) => Alignment::Right,
                _ => Alignment::Left,
            };
            job.push(run.align(alignment))?;
        }

        Commands::Image {
            path,
            threshold,
            center,
        } => {
            let img = image::open(path)
                .map_err(|e| TermicaError::Format(format!("{}: {}", path.display(), e)))?
                .to_luma8();
            let raster = RasterImage::from_luma(&img, *threshold)?;
            job.push(if *center { raster.center() } else { raster })?;
        }
    }

    send(&cli, &job)
}

fn send(cli: &Cli, job: &PrintJob) -> Result<(), TermicaError> {
    if let Some(out) = &cli.out {
        let bytes = job.to_bytes()?;
        fs::write(out, &bytes)?;
        println!("Wrote {} bytes to {}", bytes.len(), out.display());
        return Ok(());
    }

    if let Some(addr) = &cli.tcp {
        let backoff = Backoff::new(
            cli.retries.max(1),
            Duration::from_millis(200),
            2.0,
            Duration::from_secs(2),
        )?;
        let mut conn =
            TcpConnection::connect_with_backoff(addr, TcpConnection::default_timeout(), &backoff)?;
        job.render_to(&mut conn)?;
        println!("Printed to {}", conn.peer_addr());
        return Ok(());
    }

    let device = cli
        .device
        .clone()
        .unwrap_or_else(|| PathBuf::from(bluetooth::DEFAULT_DEVICE));
    if bluetooth::is_valid_mac(&device.to_string_lossy()) {
        return Err(TermicaError::Config(format!(
            "{} is a Bluetooth address; bind it first with `rfcomm bind 0 {}` and pass /dev/rfcomm0",
            device.display(),
            device.display()
        )));
    }
    let mut transport = BluetoothTransport::open(&device)?;
    job.render_to(&mut transport)?;
    println!("Printed to {}", device.display());
    Ok(())
}
