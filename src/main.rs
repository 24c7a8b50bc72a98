//! teipeople command-line tool
//!
//! `extract`でスタンドオフ文書を生成し、`rewrite`で対象文書の参照を書き換えます。
//! `run`はその2つを順番に実行します。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use teipeople::{
    Config, ConfigBuilder, Extractor, IdPolicy, Rewriter, SheetSelector, TeiPeopleError,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "teipeople",
    about = "Build a TEI standoff person list and point TEI documents at it"
)]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the spreadsheet into the standoff person list
    Extract,
    /// Strip embedded person lists and qualify person references in target files
    Rewrite,
    /// Extract, then rewrite
    Run,
}

#[derive(Args)]
struct Options {
    /// Project root (targets are matched directly under it)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Spreadsheet path (default: <root>/_temp/PersName database.xlsx)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Standoff document path (default: <root>/metadata/people.xml)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Target file name pattern
    #[arg(long, global = true)]
    pattern: Option<String>,

    /// Indentation width of the standoff document
    #[arg(long, global = true)]
    indent: Option<usize>,

    /// Read the sheet at this index (0-based) instead of the first one
    #[arg(long, global = true, conflicts_with = "sheet_name")]
    sheet_index: Option<usize>,

    /// Read the sheet with this name instead of the first one
    #[arg(long, global = true)]
    sheet_name: Option<String>,

    /// Fail on rows with an empty identifier
    #[arg(long, global = true)]
    strict_ids: bool,
}

impl Options {
    fn into_config(self) -> Result<Config, TeiPeopleError> {
        let mut builder = ConfigBuilder::new(self.root);
        if let Some(input) = self.input {
            builder = builder.with_input(input);
        }
        if let Some(output) = self.output {
            builder = builder.with_output(output);
        }
        if let Some(pattern) = self.pattern {
            builder = builder.with_target_pattern(pattern);
        }
        if let Some(indent) = self.indent {
            builder = builder.with_indent(indent);
        }
        if let Some(index) = self.sheet_index {
            builder = builder.with_sheet_selector(SheetSelector::Index(index));
        }
        if let Some(name) = self.sheet_name {
            builder = builder.with_sheet_selector(SheetSelector::Name(name));
        }
        if self.strict_ids {
            builder = builder.with_id_policy(IdPolicy::Strict);
        }
        builder.build()
    }
}

fn extract(config: &Config) -> Result<(), TeiPeopleError> {
    let report = Extractor::new(config).run()?;
    info!(
        entries = report.entries,
        written = report.written,
        skipped_blank = report.skipped_blank,
        forename_misses = report.forename_misses,
        surname_misses = report.surname_misses,
        empty_ids = report.empty_ids,
        "Extraction finished."
    );
    Ok(())
}

fn rewrite(config: &Config) -> Result<(), TeiPeopleError> {
    let report = Rewriter::new(config).run()?;
    info!(
        files_found = report.files_found,
        files_changed = report.files_changed,
        listings_removed = report.listings_removed,
        references_qualified = report.references_qualified,
        "Rewrite finished."
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = cli.options.into_config().and_then(|config| match cli.command {
        Commands::Extract => extract(&config),
        Commands::Rewrite => rewrite(&config),
        Commands::Run => extract(&config).and_then(|_| rewrite(&config)),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
