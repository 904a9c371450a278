use std::{path::PathBuf, process::exit};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

use pilgen::circuits;
use pilgen_core::{
    host::toolchain::{Field, Toolchain, DEFAULT_COMMAND, DEFAULT_OUTPUT_DIR},
    pil::{builder::Circuit, program::Program},
    utils::errors::ToolchainError,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: PilgenCommand,
}

#[derive(Subcommand)]
enum PilgenCommand {
    /// Write a circuit's PIL to `<output>/<circuit>.pil`
    Emit(EmitArgs),

    /// Write a circuit's PIL and prove it with powdr
    Prove(ProveArgs),

    /// List the bundled circuits
    List,
}

#[derive(Args, Debug)]
struct EmitArgs {
    /// Name of the circuit (see `pilgen list`)
    circuit: String,

    /// Number of rows in the constraint table
    #[arg(short, long, default_value_t = 1024)]
    rows: usize,

    /// Directory generated files are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Skip column redefinition and fixed-column length checks
    #[arg(long)]
    no_validate: bool,
}

#[derive(Args, Debug)]
struct ProveArgs {
    #[command(flatten)]
    emit: EmitArgs,

    /// Field to prove over: `bn254` (halo2-mock) or `gl` (estark-starky)
    #[arg(short, long)]
    field: Field,

    /// powdr executable
    #[arg(long, env = "POWDR_PATH", default_value = DEFAULT_COMMAND)]
    powdr: String,
}

fn main() {
    let log_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_filter(log_filter),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        PilgenCommand::Emit(args) => emit_command(args).map(|_| ()),
        PilgenCommand::Prove(args) => prove_command(args),
        PilgenCommand::List => {
            for circuit in circuits::circuits() {
                println!("{}", circuit.name());
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        // Surface the prover's own exit code rather than a generic failure.
        if let Some(ToolchainError::Failed { code, .. }) = e.downcast_ref::<ToolchainError>() {
            eprintln!("Error: {e:#}");
            exit(code.unwrap_or(1));
        }
        eprintln!("Error: {e:#}");
        exit(1);
    }
}

fn load_program(args: &EmitArgs) -> Result<(Box<dyn Circuit>, Program)> {
    let circuit = circuits::find(&args.circuit).with_context(|| {
        format!(
            "Unknown circuit `{}`; run `pilgen list` to see the available ones",
            args.circuit
        )
    })?;
    let program = circuit
        .program(args.rows)
        .with_context(|| format!("Failed to build circuit `{}`", args.circuit))?;

    if args.no_validate {
        debug!("skipping validation");
    } else {
        program
            .validate()
            .with_context(|| format!("Circuit `{}` failed validation", args.circuit))?;
    }
    Ok((circuit, program))
}

fn emit_command(args: EmitArgs) -> Result<PathBuf> {
    debug!("emit_command: {args:?}");
    let (circuit, program) = load_program(&args)?;
    let toolchain = Toolchain::new(vec![DEFAULT_COMMAND.to_string()], &args.output);
    let path = toolchain.write(circuit.name(), &program.assemble())?;
    info!("Generated PIL: {}", path.display());
    Ok(path)
}

fn prove_command(args: ProveArgs) -> Result<()> {
    debug!("prove_command: {args:?}");
    let (circuit, program) = load_program(&args.emit)?;
    let toolchain = Toolchain::new(vec![args.powdr.clone()], &args.emit.output);

    info!(
        "Proving `{}` over {} with {}",
        circuit.name(),
        args.field,
        args.field.backend()
    );
    toolchain.run(circuit.name(), &program, args.field)?;
    Ok(())
}
