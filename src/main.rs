use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use snowflake_tf::batch::{convert_directory, convert_file, FileOutcome};
use snowflake_tf::ConvertOptions;

#[derive(Parser)]
#[command(name = "snowflake-tf")]
#[command(author, version, about = "Convert Snowflake DDL into Terraform resources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single SQL file
    Convert {
        /// Path to the .sql file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the Terraform file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        naming: NamingArgs,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Convert every SQL file under a directory, writing <stem>.tf beside each
    ConvertDir {
        /// Directory to search recursively
        #[arg(short, long)]
        dir: PathBuf,

        /// File extension of the SQL files
        #[arg(long, default_value = "sql")]
        extension: String,

        #[command(flatten)]
        naming: NamingArgs,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(clap::Args)]
struct NamingArgs {
    /// Name resources <NAME> instead of <SCHEMA>_<NAME>
    #[arg(long)]
    no_schema_prefix: bool,

    /// Database name to replace with the DATABASE variable in bodies (repeatable)
    #[arg(long = "database-token", value_name = "NAME")]
    database_tokens: Vec<String>,
}

impl NamingArgs {
    fn into_options(self) -> ConvertOptions {
        ConvertOptions {
            schema_prefix: !self.no_schema_prefix,
            database_tokens: self.database_tokens,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            naming,
            verbose,
        } => {
            let conversion = convert_file(&input, &naming.into_options())?;

            if verbose {
                eprintln!(
                    "Converted {} objects into {} resources",
                    conversion.objects.len(),
                    conversion.resources.len()
                );
                for diagnostic in &conversion.diagnostics {
                    eprintln!("Skipped {}", diagnostic);
                }
            }

            match output {
                Some(path) => {
                    std::fs::write(&path, &conversion.output)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    if verbose {
                        eprintln!("Wrote {}", path.display());
                    }
                }
                None => print!("{}", conversion.output),
            }
        }
        Commands::ConvertDir {
            dir,
            extension,
            naming,
            verbose,
        } => {
            let reports = convert_directory(&dir, &extension, &naming.into_options())?;

            let mut failed = 0;
            for report in &reports {
                match &report.outcome {
                    FileOutcome::Converted {
                        output,
                        objects,
                        resources,
                        diagnostics,
                    } => {
                        println!(
                            "{} -> {} ({} objects, {} resources)",
                            report.input.display(),
                            output.display(),
                            objects,
                            resources
                        );
                        if verbose {
                            for diagnostic in diagnostics {
                                eprintln!("  Skipped {}", diagnostic);
                            }
                        }
                    }
                    FileOutcome::Failed(e) => {
                        failed += 1;
                        println!("{} failed: {:#}", report.input.display(), e);
                    }
                }
            }

            println!(
                "Converted {} of {} files",
                reports.len() - failed,
                reports.len()
            );
        }
    }

    Ok(())
}
