//! Hands an assembled program to the external `powdr` toolchain.

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use strum_macros::{Display, EnumIter, EnumString};

use crate::{pil::program::Program, utils::errors::ToolchainError};

pub const DEFAULT_COMMAND: &str = "powdr";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// The field a program is proven over. Each field implies its own proving backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Bn254,
    #[strum(serialize = "gl")]
    Goldilocks,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Backend {
    #[strum(serialize = "halo2-mock")]
    Halo2Mock,
    #[strum(serialize = "estark-starky")]
    EStarkStarky,
}

impl Field {
    pub fn backend(self) -> Backend {
        match self {
            Field::Bn254 => Backend::Halo2Mock,
            Field::Goldilocks => Backend::EStarkStarky,
        }
    }
}

/// Where artifacts are written and which executable proves them. `command` is the program
/// followed by any fixed leading arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
    command: Vec<String>,
    output_dir: PathBuf,
}

impl Toolchain {
    pub fn new(command: Vec<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            output_dir: output_dir.into(),
        }
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.pil"))
    }

    /// Write `pil` to `<output_dir>/<name>.pil`, creating the directory if needed.
    pub fn write(&self, name: &str, pil: &str) -> Result<PathBuf, ToolchainError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ToolchainError::Io {
            path: self.output_dir.display().to_string(),
            source,
        })?;

        let path = self.artifact_path(name);
        fs::write(&path, pil).map_err(|source| ToolchainError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!("wrote {}", path.display());
        Ok(path)
    }

    /// `<command> pil <path> -o <output_dir> -f --field <field> --prove-with <backend>`
    pub fn command(&self, path: &Path, field: Field) -> Result<Command, ToolchainError> {
        let (program, leading) = self.command.split_first().ok_or(ToolchainError::EmptyCommand)?;
        let mut cmd = Command::new(program);
        cmd.args(leading)
            .arg("pil")
            .arg(path)
            .arg("-o")
            .arg(&self.output_dir)
            .arg("-f")
            .args(["--field", &field.to_string()])
            .args(["--prove-with", &field.backend().to_string()]);
        Ok(cmd)
    }

    /// Run the toolchain on an already written artifact. A non-zero exit is an error.
    pub fn invoke(&self, path: &Path, field: Field) -> Result<(), ToolchainError> {
        let mut cmd = self.command(path, field)?;
        let program = cmd.get_program().to_string_lossy().to_string();
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().to_string())
            .collect();
        tracing::debug!("Command: {program} {}", args.join(" "));

        let status = cmd.status().map_err(|source| ToolchainError::Spawn {
            program: program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(ToolchainError::Failed {
                program,
                code: status.code(),
            });
        }
        Ok(())
    }

    /// Assemble `program`, write it as `<name>.pil` and prove it over `field`.
    #[tracing::instrument(skip_all, fields(name = name, field = %field))]
    pub fn run(&self, name: &str, program: &Program, field: Field) -> Result<PathBuf, ToolchainError> {
        let path = self.write(name, &program.assemble())?;
        self.invoke(&path, field)?;
        Ok(path)
    }
}
