use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use manifest_native::{
    build_manifest, load_manifest, write_manifest, BuildOptions, DiskFs, ManifestIndex,
    ParseCache, SlotStrategy,
};

#[derive(Parser)]
#[command(name = "manifest-native", about = "Extract and query component library manifests")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble the manifest of a source library.
    Build {
        #[arg(long, env = "LIBRARY_ROOT")]
        library: PathBuf,
        #[arg(long, env = "MANIFEST_PATH", default_value = "manifest.json")]
        out: PathBuf,
        /// Use the linear slot scanner instead of html5ever.
        #[arg(long)]
        scan_slots: bool,
    },
    /// Run one tool against a built manifest and print the result.
    Query {
        #[arg(long, env = "MANIFEST_PATH")]
        manifest: PathBuf,
        tool: String,
        #[arg(default_value = "{}")]
        args: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Build {
            library,
            out,
            scan_slots,
        } => {
            let mut options = BuildOptions::new(library);
            if scan_slots {
                options.slot_strategy = SlotStrategy::Scan;
            }

            let manifest = match build_manifest(&options, &DiskFs, &mut ParseCache::new()) {
                Ok(manifest) => manifest,
                Err(e) => {
                    error!(error = %e, "cannot build manifest");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = write_manifest(&out, &manifest) {
                error!(error = %e, "cannot write manifest");
                return ExitCode::FAILURE;
            }

            println!(
                "wrote {} ({} components, library {})",
                out.display(),
                manifest.components.len(),
                manifest.source_library_version
            );
            ExitCode::SUCCESS
        }
        Command::Query {
            manifest,
            tool,
            args,
        } => {
            let manifest = match load_manifest(&manifest) {
                Ok(manifest) => manifest,
                Err(e) => {
                    error!(error = %e, "cannot load manifest");
                    return ExitCode::FAILURE;
                }
            };

            let result = ManifestIndex::new(manifest).call_tool_json(&tool, &args);
            match serde_json::to_string_pretty(&result) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(error = %e, "cannot serialize tool result");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
