//! qmesh-export - quantized mesh export tool
//!
//! Converts a single-mesh glTF/GLB file (typically gltfpack output) to a .qmesh file

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use qmesh_export::{mesh, ExportConfig};

const MIB: usize = 1024 * 1024;

/// Largest accepted `--arena-size`, in MiB
const MAX_ARENA_MIB: u64 = 4096;

#[derive(Parser)]
#[command(name = "qmesh-export")]
#[command(about = "Convert a single-mesh glTF/GLB file (typically gltfpack output) to a quantized .qmesh file")]
#[command(version)]
struct Cli {
    /// Input glTF/GLB file
    input: PathBuf,

    /// Output .qmesh file
    output: PathBuf,

    /// Conversion memory in MiB (at most 4096)
    #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u64).range(0..=MAX_ARENA_MIB))]
    arena_size: u64,

    /// Reject files not produced by gltfpack (other generators are accepted by default)
    #[arg(long)]
    require_gltfpack: bool,

    /// Ignore published position bounds and scan the vertex data
    #[arg(long)]
    rescan_bounds: bool,
}

impl Cli {
    fn config(&self) -> ExportConfig {
        ExportConfig {
            arena_capacity: usize::try_from(self.arena_size)
                .unwrap_or(usize::MAX)
                .saturating_mul(MIB),
            require_gltfpack: self.require_gltfpack,
            force_bounds_scan: self.rescan_bounds,
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing::info!("Converting {:?} -> {:?}", cli.input, cli.output);
    match mesh::convert_gltf(&cli.input, &cli.output, &cli.config()) {
        Ok(()) => {
            tracing::info!("Done!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let _ = report_error(&mut std::io::stderr().lock(), &err);
            ExitCode::FAILURE
        }
    }
}

/// Print an error and its cause chain
fn report_error(w: &mut impl Write, err: &anyhow::Error) -> std::io::Result<()> {
    writeln!(w, "error: {err}")?;
    for cause in err.chain().skip(1) {
        writeln!(w, "  caused by: {cause}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_report_error_prints_chain() {
        let err = anyhow::anyhow!("Model must be merged into a single mesh (found 2 meshes)")
            .context("Failed to convert mesh: \"scene.glb\"");
        let mut out = Vec::new();
        report_error(&mut out, &err).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "error: Failed to convert mesh: \"scene.glb\"\n  \
             caused by: Model must be merged into a single mesh (found 2 meshes)\n"
        );
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["qmesh-export", "in.glb", "out.qmesh"]).unwrap();
        assert_eq!(cli.config(), ExportConfig::default());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "qmesh-export",
            "in.glb",
            "out.qmesh",
            "--arena-size",
            "2",
            "--require-gltfpack",
            "--rescan-bounds",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.arena_capacity, 2 * MIB);
        assert!(config.require_gltfpack);
        assert!(config.force_bounds_scan);
    }

    #[test]
    fn test_cli_rejects_oversized_arena() {
        let err = Cli::try_parse_from([
            "qmesh-export",
            "in.glb",
            "out.qmesh",
            "--arena-size",
            "18446744073709551615",
        ])
        .err()
        .expect("oversized arena should be rejected");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from([
            "qmesh-export",
            "in.glb",
            "out.qmesh",
            "--arena-size",
            "4096",
        ])
        .unwrap();
        assert_eq!(cli.config().arena_capacity, 4096 * MIB);
    }

    #[test]
    fn test_help_describes_generator_check_as_opt_in() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("typically gltfpack output"), "help: {help}");
        assert!(help.contains("accepted by default"), "help: {help}");
    }

    #[test]
    fn test_cli_requires_output() {
        assert!(Cli::try_parse_from(["qmesh-export", "in.glb"]).is_err());
    }
}
