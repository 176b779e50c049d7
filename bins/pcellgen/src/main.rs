use anyhow::Context;
use clap::Parser as ClapParser;
use pcells::{DeviceParameters, GeneratorOptions, Pdk};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    eprintln!("technology: {:?}", &args.tech);
    eprintln!("parameters: {:?}", &args.params);
    match args.out {
        Some(ref out) => eprintln!("output: {:?}", out),
        None => eprintln!("output: stdout"),
    }
    pcellgen(args)?;
    eprintln!("Generation complete.");

    Ok(())
}

/// Arguments to [`pcellgen`].
#[derive(ClapParser)]
#[command(
    version,
    about,
    long_about = "Generate the layout of a parametric cell from a technology file"
)]
pub struct Args {
    /// The path to the technology JSON file.
    #[arg(short, long)]
    tech: PathBuf,
    /// The path to a JSON file holding the device parameters.
    ///
    /// The `cell` field selects the device: `nmos`, `rsil` or `cmim`.
    params: PathBuf,
    /// The path to a TOML file of generator options.
    #[arg(long)]
    options: Option<PathBuf>,
    /// Emit flat GDS boundary and text records instead of geometry elements.
    #[arg(long)]
    gds: bool,
    /// The path where the output JSON should be saved.
    ///
    /// If unspecified, the output will be written to stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// Generate the cell described by `args` and write it as JSON.
pub fn pcellgen(args: Args) -> anyhow::Result<()> {
    let options = match args.options {
        Some(ref path) => GeneratorOptions::load(path)
            .with_context(|| format!("Failed to load generator options from {:?}.", path))?,
        None => GeneratorOptions::default(),
    };
    let pdk = Pdk::load(&args.tech, options)
        .with_context(|| format!("Failed to load technology from {:?}.", &args.tech))?;

    let json = fs::read_to_string(&args.params)
        .with_context(|| format!("Failed to read parameters from {:?}.", &args.params))?;
    let params = DeviceParameters::from_json_str(&json)
        .with_context(|| "Failed to parse device parameters.")?;
    tracing::info!(cell = params.cell_name(), "generating cell");

    let generation = pdk
        .generate(&params)
        .with_context(|| format!("Failed to generate {}.", params.cell_name()))?;
    for issue in generation.issues.iter() {
        eprintln!("{issue}");
    }

    let output = if args.gds {
        let records = layir::gds::flatten(&generation.elements)
            .with_context(|| "Failed to flatten geometry to GDS records.")?;
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string_pretty(generation.as_ref())?
    };

    if let Some(path) = args.out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, output)
            .with_context(|| format!("Failed to write output to {:?}.", path))?;
    } else {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{output}").with_context(|| "Failed to write output to stdout.")?;
    }

    Ok(())
}
