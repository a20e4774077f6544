//! Command-line interface for the aligner.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{run_batch, BatchSummary, InputKind};
use crate::config::{AlignConfig, DictionaryProfile, LanguageSpec, DEFAULT_MIN_FRAGMENT_LEN};
use crate::emitter::{Canonicalizer, Layout, RecordWriter};
use crate::error::{AlignerError, Result};
use crate::tabular::read_term_rows;
use crate::tmx::TmxMode;
use crate::validate::{validate_rows, Expectations};

/// LexLink aligner - Extract bilingual legal term and sentence pairs.
#[derive(Parser)]
#[command(name = "lexlink-aligner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align the language variants of bilingual treaty XML files.
    Treaty {
        /// Treaty XML files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Source language code
        #[arg(long, default_value = "nl-nl")]
        source: String,

        /// Target language code
        #[arg(long, default_value = "fr-fr")]
        target: String,

        /// Minimum paragraph length in characters
        #[arg(long, default_value_t = DEFAULT_MIN_FRAGMENT_LEN)]
        min_fragment: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Extract segment pairs from TMX translation memories.
    Tmx {
        /// TMX files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// What the translation units contain
        #[arg(long, value_enum, default_value_t = TmxMode::Terms)]
        mode: TmxMode,

        /// Source language code
        #[arg(long, default_value = "nl-nl")]
        source: String,

        /// Target language code; further tags matching it may follow, comma separated
        #[arg(long, default_value = "en-gb", value_delimiter = ',')]
        target: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Assign ids to a flat term list and drop exact duplicates.
    Clean {
        /// Term list (CSV or TSV)
        file: PathBuf,

        /// Source language code written to records
        #[arg(long, default_value = "nl-nl")]
        source: String,

        /// Target language code written to records
        #[arg(long, default_value = "de-de")]
        target: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Validate a flat term dataset.
    Validate {
        /// Dataset (CSV or TSV)
        file: PathBuf,

        /// Expected source language code
        #[arg(long, default_value = "nl-nl")]
        source: String,

        /// Expected target language code
        #[arg(long, default_value = "de-de")]
        target: String,

        /// Dictionary profile (YAML) with the expected metadata
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Write the report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Output options shared by the extracting subcommands.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output file for the record stream
    #[arg(short, long)]
    pub output: PathBuf,

    /// Write tab-separated instead of comma-separated values
    #[arg(long)]
    pub tsv: bool,

    /// Append pair type, reference and origin columns
    #[arg(long)]
    pub extended: bool,

    /// Dictionary profile (YAML) with provenance defaults
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Write the duplicate report as JSON to this file
    #[arg(long)]
    pub duplicates: Option<PathBuf>,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Treaty {
            files,
            source,
            target,
            min_fragment,
            output,
        } => {
            let config = AlignConfig::new(LanguageSpec::new(&source)?, LanguageSpec::new(&target)?)
                .with_min_fragment_len(min_fragment);
            let languages = (config.source.code.clone(), config.target.code.clone());
            extract_command(&files, InputKind::Treaty(config), languages, &output)
        }
        Commands::Tmx {
            files,
            mode,
            source,
            target,
            output,
        } => {
            let source = LanguageSpec::new(&source)?;
            let target = target_spec(&target)?;
            let languages = (source.code.clone(), target.code.clone());
            let kind = InputKind::Tmx {
                source,
                target,
                mode,
            };
            extract_command(&files, kind, languages, &output)
        }
        Commands::Clean {
            file,
            source,
            target,
            output,
        } => {
            let languages = (LanguageSpec::new(&source)?.code, LanguageSpec::new(&target)?.code);
            extract_command(&[file], InputKind::TermList, languages, &output)
        }
        Commands::Validate {
            file,
            source,
            target,
            profile,
            report,
        } => validate_command(&file, &source, &target, profile.as_deref(), report.as_deref()),
    }
}

/// Build the target language from its code and extra tags.
fn target_spec(tags: &[String]) -> Result<LanguageSpec> {
    let (code, aliases) = tags
        .split_first()
        .ok_or_else(|| AlignerError::InvalidLanguageTag(String::new()))?;
    LanguageSpec::new(code)?.with_aliases(aliases)
}

fn load_profile(path: Option<&Path>) -> Result<DictionaryProfile> {
    match path {
        Some(path) => DictionaryProfile::load(path),
        None => Ok(DictionaryProfile::default()),
    }
}

/// Execute a treaty, tmx or clean run.
fn extract_command(
    files: &[PathBuf],
    kind: InputKind,
    (source_lang, target_lang): (String, String),
    args: &OutputArgs,
) -> Result<()> {
    let profile = load_profile(args.profile.as_deref())?;
    ensure_parent_dir(&args.output)?;

    println!(
        "{} {} file(s), {} {} {}",
        style("Processing").bold(),
        files.len(),
        style(&source_lang).cyan(),
        style("->").dim(),
        style(&target_lang).cyan()
    );
    println!();

    let delimiter = if args.tsv { b'\t' } else { b',' };
    let layout = if args.extended {
        Layout::Extended
    } else {
        Layout::Canonical
    };
    let file = BufWriter::new(File::create(&args.output)?);
    let mut writer = RecordWriter::new(file, delimiter, layout)?;
    let mut canonicalizer = Canonicalizer::new(source_lang, target_lang, profile);

    // Create progress spinner
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let summary = match run_batch(files, &kind, &mut canonicalizer, &mut writer, |path| {
        pb.set_message(format!("Processing {}...", path.display()));
    }) {
        Ok(summary) => summary,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Writing output...");
    let finished = writer.finish();
    pb.finish_and_clear();
    finished?;

    if let Some(path) = &args.duplicates {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, canonicalizer.duplicates())?;
    }

    print_summary(&summary);

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        args.output.display()
    );

    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    for outcome in &summary.files {
        match &outcome.error {
            None => println!(
                "  {} {} ({} pairs, {} records)",
                style("ok").green(),
                outcome.path.display(),
                outcome.pairs,
                outcome.records
            ),
            Some(error) => println!(
                "  {} {}: {}",
                style("failed").red().bold(),
                outcome.path.display(),
                error
            ),
        }
    }
    println!();
    println!("  Records: {}", style(summary.records).green());
    if summary.duplicates > 0 {
        println!("  Duplicates: {}", style(summary.duplicates).yellow().bold());
    }
    let failed = summary.failures().count();
    if failed > 0 {
        println!("  Failed files: {}", style(failed).red().bold());
    }
}

/// Execute the validate command.
fn validate_command(
    file: &Path,
    source: &str,
    target: &str,
    profile: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<()> {
    let expect = Expectations {
        source_lang: LanguageSpec::new(source)?.code,
        target_lang: LanguageSpec::new(target)?.code,
        profile: load_profile(profile)?,
    };

    let rows = read_term_rows(file)?;
    let report = validate_rows(&rows, &expect);

    println!(
        "{} {} ({} rows)",
        style("Validated").bold(),
        style(file.display()).cyan(),
        report.total_rows
    );
    println!("  Empty ids: {}", count_style(report.empty_ids));
    println!("  Empty external refs: {}", report.empty_external_refs);
    println!("  Exact duplicate pairs: {}", count_style(report.exact_duplicate_pairs));
    println!("  Repeated source terms: {}", report.duplicate_source_terms.len());
    println!("  Repeated target terms: {}", report.duplicate_target_terms.len());
    for inconsistency in &report.inconsistencies {
        println!(
            "  {} {} rows differ from '{}'",
            style(&inconsistency.field).yellow(),
            inconsistency.count,
            inconsistency.expected
        );
    }

    if let Some(path) = report_path {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &report)?;
    }

    println!();
    if report.is_clean() {
        println!("{}", style("Dataset is clean").green().bold());
    } else {
        println!("{}", style("Dataset has problems").red().bold());
    }

    Ok(())
}

fn count_style(count: usize) -> console::StyledObject<usize> {
    if count == 0 {
        style(count).green()
    } else {
        style(count).red().bold()
    }
}

/// Fail early if the output's parent directory does not exist.
fn ensure_parent_dir(output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(AlignerError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Output directory does not exist: {}", parent.display()),
            )));
        }
    }
    Ok(())
}
