use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use quill_rs::draw::{Document, RenderSettings, ToTypst};
use quill_rs::Circuit;

mod logging;

use logging::LoggingLevel;

#[derive(Parser, Debug)]
#[clap(version, about = "Draw quantum circuits as typst markup for the quill package.")]
struct Cli {
    /// Logging level, case insensitive.
    #[arg(
        long,
        value_enum,
        ignore_case = true,
        env = "LOGGING_LEVEL",
        default_value = "info",
        global = true
    )]
    logging_level: LoggingLevel,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Debug)]
enum Command {
    /// Draw a circuit as a typst `quantum-circuit`.
    Draw {
        /// Circuit file, or `-` to read the standard input.
        #[arg(default_value = "-")]
        input: String,
        /// Write the drawing to this file instead of the standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,
        /// Write `quantum-circuit(...)` instead of `#quantum-circuit(...)`.
        #[arg(long)]
        no_leading_hash: bool,
        /// Prepend the imports of the `physica` and `quill` packages.
        #[arg(long)]
        imports: bool,
    },
    /// Write a typst document with one page per circuit.
    Document {
        /// Circuit files, one section each.
        #[arg(required = true)]
        inputs: Vec<String>,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,
    },
    /// Print the resolved circuit as JSON.
    Parse {
        /// Circuit file, or `-` to read the standard input.
        #[arg(default_value = "-")]
        input: String,
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,
    },
}

/// How circuits are written. Guessed from the file extension when not given.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum InputFormat {
    /// OpenQASM 2.
    #[default]
    Qasm,
    /// The JSON serialization of a circuit.
    Json,
}

impl InputFormat {
    fn guess(format: Option<Self>, input: &str) -> Self {
        format.unwrap_or_else(|| match Path::new(input).extension() {
            Some(extension) if extension == "json" => Self::Json,
            _ => Self::Qasm,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logging(cli.logging_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Draw {
            input,
            output,
            format,
            no_leading_hash,
            imports,
        } => {
            let (_, circuit) = load_circuit(&input, format)?;
            let settings = RenderSettings {
                leading_hash: !no_leading_hash,
                imports,
            };
            let typst = circuit
                .to_typst(settings)
                .with_context(|| format!("Failed to draw circuit from {input}"))?;
            write_output(output.as_deref(), &typst)
        }
        Command::Document {
            inputs,
            output,
            format,
        } => {
            let mut document = Document::new();
            for input in &inputs {
                let (source, circuit) = load_circuit(input, format)?;
                let title = Path::new(input)
                    .file_stem()
                    .map_or_else(|| input.clone(), |stem| stem.to_string_lossy().into_owned());
                document.add_section(title, source, circuit);
            }
            let typst = document.to_typst().context("Failed to draw document")?;
            write_output(Some(&output), &typst)
        }
        Command::Parse { input, format } => {
            let (_, circuit) = load_circuit(&input, format)?;
            let json = serde_json::to_string_pretty(&circuit)
                .context("Failed to serialize circuit to JSON")?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Read a circuit from a file, or from the standard input if `input` is `-`. Returns the source
/// along with the circuit.
fn load_circuit(input: &str, format: Option<InputFormat>) -> anyhow::Result<(String, Circuit)> {
    let source = if input == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read standard input")?;
        source
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?
    };

    let format = InputFormat::guess(format, input);
    tracing::debug!(input, ?format, "loading circuit");
    let circuit = match format {
        InputFormat::Qasm => Circuit::from_str(&source)
            .with_context(|| format!("Failed to resolve OpenQASM program from {input}"))?,
        InputFormat::Json => serde_json::from_str(&source)
            .with_context(|| format!("Failed to deserialize circuit from {input}"))?,
    };
    tracing::info!(
        input,
        qubits = circuit.num_qubits(),
        operations = circuit.operations().len(),
        "loaded circuit"
    );
    Ok((source, circuit))
}

fn write_output(output: Option<&Path>, typst: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, typst)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => println!("{typst}"),
    }
    Ok(())
}
