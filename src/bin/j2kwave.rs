//! j2kwave CLI - JPEG 2000 wavelet inspection utility.
//!
//! Prints subband decomposition layouts, probes JP2/J2K files, and lists the
//! built-in wavelet filter capabilities.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use j2kwave_rs::stream::{BeBufferedFile, BinaryDataInput, OpenMode};
use j2kwave_rs::wavelet::{
    Filter53, Filter97, FilterId, SubbandTree, WaveletFilter,
};

/// JPEG 2000 wavelet decomposition and stream inspection
#[derive(Parser)]
#[command(name = "j2kwave")]
#[command(author = "j2kwave-rs contributors")]
#[command(version)]
#[command(about = "Inspect JPEG 2000 wavelet decompositions and codestream files", long_about = None)]
#[command(after_help = "EXAMPLES:
    j2kwave layout -w 640 -H 480 --levels 5
    j2kwave layout -w 17 -H 17 --levels 3 --filter w5x3 --origin-x 1
    j2kwave probe -i image.jp2
    j2kwave filters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the subband layout for a tile component
    ///
    /// Builds the dyadic decomposition tree for the given geometry and
    /// prints every subband in packet-building order.
    #[command(visible_alias = "l")]
    Layout {
        /// Component width in samples
        #[arg(short, long)]
        width: u32,

        /// Component height in samples
        #[arg(short = 'H', long)]
        height: u32,

        /// Number of decomposition levels
        #[arg(short, long, default_value = "5")]
        levels: u8,

        /// Wavelet filter
        #[arg(short, long, default_value = "w5x3", value_enum)]
        filter: FilterChoice,

        /// Horizontal offset on the reference canvas
        #[arg(long, default_value = "0")]
        origin_x: u32,

        /// Vertical offset on the reference canvas
        #[arg(long, default_value = "0")]
        origin_y: u32,
    },

    /// Identify a JP2 container or raw J2K codestream
    ///
    /// Reads the file signature through a big-endian buffered stream.
    #[command(visible_alias = "p")]
    Probe {
        /// Input file path
        #[arg(short, long, help = "Path to the file to inspect")]
        input: PathBuf,
    },

    /// List the built-in wavelet filters and their capabilities
    #[command(visible_alias = "f")]
    Filters,
}

#[derive(Clone, ValueEnum)]
enum FilterChoice {
    /// 5/3 reversible filter
    W5x3,
    /// 9/7 irreversible filter
    W9x7,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Layout {
            width,
            height,
            levels,
            filter,
            origin_x,
            origin_y,
        } => print_layout(width, height, levels, &filter, origin_x, origin_y),
        Commands::Probe { input } => probe_file(&input),
        Commands::Filters => list_filters(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_layout(
    width: u32,
    height: u32,
    levels: u8,
    filter: &FilterChoice,
    origin_x: u32,
    origin_y: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = match filter {
        FilterChoice::W5x3 => FilterId::Reversible5x3,
        FilterChoice::W9x7 => FilterId::Irreversible9x7,
    };
    let tree = SubbandTree::new(width, height, origin_x, origin_y, levels, &[id], &[id])?;

    println!(
        "{}x{} component, {} decomposition levels, {:?} filter",
        width, height, levels, id
    );
    println!();
    println!("res  band  position      size          gain");
    for leaf in tree.leaves() {
        let sb = tree.get(leaf);
        println!(
            "{:>3}  {:<4?}  ({:>5},{:>5})  {:>5}x{:<5}  2^{}",
            sb.res_lvl, sb.orientation, sb.ulx, sb.uly, sb.width, sb.height, sb.an_gain_exp
        );
    }
    Ok(())
}

fn probe_file(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = BeBufferedFile::open(input, OpenMode::Read)?;
    let length = stream.length()?;

    println!("File: {:?}", input);
    println!("Size: {} bytes", length);

    // A JP2 file starts with the signature box (length 12, type "jP  ",
    // content 0x0D0A870A); a raw codestream starts with the SOC marker.
    let first = stream.read_u32()?;
    if first == 0x0000_000C {
        let box_type = stream.read_u32()?;
        let content = stream.read_u32()?;
        if box_type == 0x6A50_2020 && content == 0x0D0A_870A {
            println!("Format: JP2 Container (JPEG 2000)");
            return Ok(());
        }
        println!("Format: Unknown (box-structured, no JP2 signature)");
        return Ok(());
    }
    if (first >> 16) == 0xFF4F {
        println!("Format: JPEG 2000 Codestream");
        // SIZ follows SOC in any valid codestream.
        let marker = (first & 0xFFFF) as u16;
        if marker == 0xFF51 {
            let _lsiz = stream.read_u16()?;
            let _rsiz = stream.read_u16()?;
            let xsiz = stream.read_u32()?;
            let ysiz = stream.read_u32()?;
            println!("  Canvas: {}x{}", xsiz, ysiz);
        }
        return Ok(());
    }

    println!("Format: Unknown");
    Ok(())
}

fn list_filters() -> Result<(), Box<dyn std::error::Error>> {
    println!("Built-in wavelet filters:");
    println!();
    for filter in [&Filter53 as &dyn WaveletFilter, &Filter97] {
        println!("  {:?}", filter.id());
        println!(
            "    Implementation: {:?}, samples: {:?}, reversible: {}",
            filter.implementation(),
            filter.data_type(),
            filter.is_reversible()
        );
        println!(
            "    Analysis support:  low -{}/+{}, high -{}/+{}",
            filter.analysis_low_negative_support(),
            filter.analysis_low_positive_support(),
            filter.analysis_high_negative_support(),
            filter.analysis_high_positive_support()
        );
        println!(
            "    Synthesis support: low -{}/+{}, high -{}/+{}",
            filter.synthesis_low_negative_support(),
            filter.synthesis_low_positive_support(),
            filter.synthesis_high_negative_support(),
            filter.synthesis_high_positive_support()
        );
        println!();
    }
    Ok(())
}
