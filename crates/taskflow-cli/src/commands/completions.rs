use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Generator, Shell};

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

const BIN_NAME: &str = "taskflow";

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Self::Bash,
            CompletionShell::Zsh => Self::Zsh,
            CompletionShell::Fish => Self::Fish,
            CompletionShell::PowerShell => Self::PowerShell,
        }
    }
}

/// Writes to stdout, to `output_path`, or into it when it is a directory
pub fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let Some(path) = output_path else {
        return write_completions(shell, &mut io::stdout().lock());
    };

    let target = completion_target(shell, path);
    write_completions(shell, &mut File::create(&target)?)?;
    println!("{}", target.display());
    Ok(())
}

pub fn render_completions(shell: CompletionShell) -> Vec<u8> {
    let mut buffer = Vec::new();
    generate(Shell::from(shell), &mut Cli::command(), BIN_NAME, &mut buffer);
    buffer
}

/// `taskflow.bash`, `_taskflow`, ... inside a directory; the path itself otherwise
pub fn completion_target(shell: CompletionShell, path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(Shell::from(shell).file_name(BIN_NAME))
    } else {
        path.to_path_buf()
    }
}

fn write_completions(shell: CompletionShell, out: &mut impl Write) -> Result<(), CliError> {
    out.write_all(&render_completions(shell))?;
    out.flush()?;
    Ok(())
}
