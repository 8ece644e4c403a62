//! UMI monitor CLI.
//!
//! This binary drives the monitor outside a live RTL simulation. It performs:
//! 1. **Trace replay:** Seeds memory with a program image, replays a recorded packet
//!    trace through the dispatcher, and exits with the program's exit code.
//! 2. **Address decoding:** Splits a global address into its fields and names the
//!    region it resolves to under the configured address map.

use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;
use umi_monitor_core::config::Config;
use umi_monitor_core::sim::loader;
use umi_monitor_core::{
    GlobalAddr, Monitor, MonitorError, MonitorResult, QueueTransport, System, UmiPacket,
};

#[derive(Parser, Debug)]
#[command(
    name = "umi-monitor",
    author,
    version,
    about = "Software UMI memory agent and console/exit monitor",
    long_about = "Replay a recorded UMI packet trace against a program image, or decode global addresses.\n\nLogging is controlled by RUST_LOG (default: warn) and goes to stderr.\n\nExamples:\n  umi-monitor run --image hello.bin --trace hello.json\n  umi-monitor run --image hello.elf --trace hello.json --crossbar 0x01 --responses out.jsonl\n  umi-monitor decode 0x00CCCC00C0000000"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a packet trace against a program image.
    Run {
        /// Program image (raw binary or ELF) seeded at memory offset 0.
        #[arg(short, long)]
        image: PathBuf,

        /// Packet trace: a JSON array of `{cmd, dstaddr, srcaddr, data}` objects.
        #[arg(short, long)]
        trace: PathBuf,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write response packets here, one JSON object per line.
        #[arg(long)]
        responses: Option<PathBuf>,

        /// Use the crossbar-routed address map with this selector byte.
        #[arg(long, value_parser = parse_selector)]
        crossbar: Option<u8>,
    },

    /// Decode a global address against the address map.
    Decode {
        /// Address, decimal or `0x`-prefixed hex.
        #[arg(value_parser = parse_u64)]
        address: u64,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use the crossbar-routed address map with this selector byte.
        #[arg(long, value_parser = parse_selector)]
        crossbar: Option<u8>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Run {
            image,
            trace,
            config,
            responses,
            crossbar,
        } => cmd_run(&image, &trace, config.as_deref(), responses.as_deref(), crossbar),
        Commands::Decode {
            address,
            config,
            crossbar,
        } => cmd_decode(address, config.as_deref(), crossbar).map(|()| 0),
    };

    match result {
        Ok(code) => process::exit(code as i32),
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr `tracing` subscriber, honouring `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Replays `trace` against `image` and returns the program's exit code.
///
/// Console output goes to stdout; statistics go to stderr once the run ends. A trace
/// that runs out before the program terminates is an error.
fn cmd_run(
    image: &Path,
    trace: &Path,
    config: Option<&Path>,
    responses: Option<&Path>,
    crossbar: Option<u8>,
) -> MonitorResult<u32> {
    let config = load_config(config, crossbar)?;
    let program = loader::load_image(image)?;
    let packets = load_trace(trace)?;

    info!(
        image = %image.display(),
        bytes = program.len(),
        packets = packets.len(),
        "starting trace replay"
    );

    let mut monitor = Monitor::new(&config, QueueTransport::replay(packets))?;
    monitor.initialize_memory(0, &program)?;

    let result = monitor.run();
    let _ = std::io::stdout().flush();

    if let Some(path) = responses {
        write_responses(path, monitor.transport().sent())?;
    }
    eprintln!("\n{}", monitor.stats());

    let code = result?;
    eprintln!("[*] Exit code {code}");
    Ok(code)
}

/// Prints the field split of `address` and the region it resolves to.
fn cmd_decode(address: u64, config: Option<&Path>, crossbar: Option<u8>) -> MonitorResult<()> {
    let config = load_config(config, crossbar)?;
    let system = System::with_console(&config, Box::new(std::io::sink()))?;
    let addr = GlobalAddr::new(address);

    println!("address   {addr}");
    println!("reserved  {:#04x}", addr.selector());
    println!("chip_id   {:#06x}", addr.chip_id());
    println!("offset    {:#012x}", addr.offset());
    match system.bus.region_name(address) {
        Some(name) => println!("region    {name}"),
        None => println!("region    <unmapped>"),
    }
    Ok(())
}

/// Loads the configuration file (or defaults) and applies the `--crossbar` override.
fn load_config(path: Option<&Path>, crossbar: Option<u8>) -> MonitorResult<Config> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| MonitorError::Config(format!("{}: {e}", path.display())))?;
            Config::from_json(&json)?
        }
        None => Config::default(),
    };

    if let Some(selector) = crossbar {
        config.address_map.selector = selector;
        config.validate()?;
    }
    Ok(config)
}

fn load_trace(path: &Path) -> MonitorResult<Vec<UmiPacket>> {
    let json = fs::read_to_string(path)
        .map_err(|e| MonitorError::Transport(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&json)
        .map_err(|e| MonitorError::Transport(format!("{}: {e}", path.display())))
}

fn write_responses(path: &Path, packets: &[UmiPacket]) -> MonitorResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for packet in packets {
        let line =
            serde_json::to_string(packet).map_err(|e| MonitorError::Output(e.to_string()))?;
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

fn parse_u64(s: &str) -> Result<u64, String> {
    let s = s.replace('_', "");
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn parse_selector(s: &str) -> Result<u8, String> {
    let value = parse_u64(s)?;
    match u8::try_from(value) {
        Ok(0) => Err("crossbar selector must be non-zero".to_string()),
        Ok(selector) => Ok(selector),
        Err(_) => Err(format!("crossbar selector {value:#x} does not fit in 8 bits")),
    }
}
