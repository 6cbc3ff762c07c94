use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct CommandLine {
    /// Where to write the icons (defaults to the directory of this executable)
    #[clap(long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[clap(long, num_args = 0)]
    debug: bool,
}

/// The directory containing the running executable.
fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    exe.parent()
        .map(|dir| dir.to_path_buf())
        .context("The executable has no parent directory")
}

fn run(command_line: CommandLine, out: &mut impl Write) -> Result<()> {
    let dir = match command_line.output {
        Some(dir) => dir,
        None => executable_dir()?,
    };
    debug!(dir = %dir.display(), "Writing favicons");

    dice_favicon::export_all(&dir, |path| {
        writeln!(out, "Created: {}", path.display())?;
        Ok(())
    })?;

    writeln!(out, "\nAll favicons generated successfully!")?;
    Ok(())
}

pub fn main() -> ExitCode {
    // Parse command line options before we configure logging so we can set the
    // default level
    let command_line = CommandLine::parse();

    let default_filter = if command_line.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match run(command_line, &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_run_reports_each_file() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let dir = tmp.path().to_string_lossy().to_string();
        let mut out = Vec::new();

        run(
            CommandLine::parse_from(["dice-favicon", "--output", dir.as_str()]),
            &mut out,
        )?;

        let out = String::from_utf8(out)?;
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 9);
        for (line, output) in lines.iter().zip(dice_favicon::OUTPUTS) {
            let expected = tmp.path().join(output.file_name);
            assert_eq!(*line, format!("Created: {}", expected.display()));
            assert!(expected.is_file());
        }
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "All favicons generated successfully!");
        Ok(())
    }

    #[test]
    fn test_run_fails_on_unwritable_output() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"")?;
        let dir = blocker.to_string_lossy().to_string();
        let mut out = Vec::new();

        let result = run(
            CommandLine::parse_from(["dice-favicon", "--output", dir.as_str()]),
            &mut out,
        );

        assert!(result.is_err());
        assert!(!String::from_utf8(out)?.contains("successfully"));
        Ok(())
    }
}
