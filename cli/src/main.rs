//! autoalt CLI - fill image alt text in rendered content blocks

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use autoalt::{
    AltTextFilter, BlockDescriptor, FilterReport, FilterResult, MediaLibrary, PatchOptions,
    RenderedBlock, RuleSet,
};

/// Blocks handed to the parallel filter per progress step.
const BATCH_CHUNK: usize = 64;

#[derive(Parser)]
#[command(name = "autoalt")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Fill missing image alt text in rendered content blocks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that needs a rule set.
#[derive(Args)]
struct RuleArgs {
    /// Rule set JSON file (built-in WordPress rules if not specified)
    #[arg(long, value_name = "FILE", env = "AUTOALT_RULES")]
    rules: Option<PathBuf>,

    /// Ignore block types that have no explicit rule
    #[arg(long)]
    no_fallback: bool,
}

impl RuleArgs {
    fn load(&self) -> Result<RuleSet, Box<dyn std::error::Error>> {
        let mut rules = match &self.rules {
            Some(path) => RuleSet::from_path(path)?,
            None => RuleSet::wordpress(),
        };
        if self.no_fallback {
            rules.fallback_enabled = false;
        }
        Ok(rules)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fill alt text in one rendered block
    Process {
        /// Block JSON file ({"blockName": ..., "attrs": {...}})
        #[arg(long, value_name = "FILE")]
        block: PathBuf,

        /// Rendered HTML fragment
        #[arg(long, value_name = "FILE")]
        html: PathBuf,

        /// Media library JSON file ([{"id", "alt", "url"}, ...])
        #[arg(long, value_name = "FILE")]
        media: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Patch every tag sharing an image URL, not only the first
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Fill alt text in many rendered blocks
    Batch {
        /// JSON array of {"block": {...}, "html": "..."}
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Media library JSON file
        #[arg(long, value_name = "FILE")]
        media: PathBuf,

        /// Output file for the JSON results (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Patch every tag sharing an image URL, not only the first
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Print the image identifiers found in a block
    Extract {
        /// Block JSON file
        #[arg(long, value_name = "FILE")]
        block: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Check whether a block type is an image block
    Classify {
        /// Block type name (e.g., "core/image")
        #[arg(value_name = "TYPE")]
        type_name: String,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Print the built-in rule set as JSON
    Rules {
        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            block,
            html,
            media,
            output,
            all,
            rules,
        } => cmd_process(&block, &html, &media, output.as_deref(), all, &rules),
        Commands::Batch {
            input,
            media,
            output,
            all,
            rules,
        } => cmd_batch(&input, &media, output.as_deref(), all, &rules),
        Commands::Extract { block, rules } => cmd_extract(&block, &rules),
        Commands::Classify { type_name, rules } => cmd_classify(&type_name, &rules),
        Commands::Rules { compact } => cmd_rules(compact),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_filter(rules: &RuleArgs, all: bool) -> Result<AltTextFilter, Box<dyn std::error::Error>> {
    let options = if all {
        PatchOptions::new().replace_all()
    } else {
        PatchOptions::new()
    };
    Ok(AltTextFilter::new()
        .with_rules(rules.load()?)
        .with_patch_options(options))
}

fn read_block(path: &Path) -> Result<BlockDescriptor, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    let block = serde_json::from_str(&json)
        .map_err(|e| format!("Invalid block file {}: {}", path.display(), e))?;
    Ok(block)
}

fn cmd_process(
    block: &Path,
    html: &Path,
    media: &Path,
    output: Option<&Path>,
    all: bool,
    rules: &RuleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_filter(rules, all)?;
    let block = read_block(block)?;
    let fragment = fs::read_to_string(html)?;
    let library = MediaLibrary::from_path(media)?;

    let result = filter.process_with_report(&fragment, &block, &library);

    if let Some(path) = output {
        fs::write(path, &result.content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
        print_report(&result.report);
    } else {
        print!("{}", result.content);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    media: &Path,
    output: Option<&Path>,
    all: bool,
    rules: &RuleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_filter(rules, all)?;
    let library = MediaLibrary::from_path(media)?;
    let blocks: Vec<RenderedBlock> = serde_json::from_str(&fs::read_to_string(input)?)
        .map_err(|e| format!("Invalid batch file {}: {}", input.display(), e))?;

    let pb = ProgressBar::new(blocks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Filtering blocks...");

    let mut results: Vec<FilterResult> = Vec::with_capacity(blocks.len());
    for chunk in blocks.chunks(BATCH_CHUNK) {
        results.extend(filter.process_batch(chunk, &library));
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    let json = serde_json::to_string_pretty(&results)?;
    if let Some(path) = output {
        fs::write(path, &json)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    let mut total = FilterReport::new();
    for result in &results {
        total.merge(&result.report);
    }
    let changed = results.iter().filter(|r| r.report.changed()).count();
    eprintln!(
        "\n{} {} of {} blocks changed",
        "Done!".green().bold(),
        changed,
        results.len()
    );
    print_report(&total);

    Ok(())
}

fn print_report(report: &FilterReport) {
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!("{}: {}", "Images found".bold(), report.images_found);
    eprintln!("{}: {}", "Patched".bold(), report.patched);
    eprintln!("{}: {}", "Already described".bold(), report.already_described);
    eprintln!("{}: {}", "No description".bold(), report.missing_description);
    eprintln!("{}: {}", "No URL".bold(), report.missing_url);
    eprintln!("{}: {}", "No matching tag".bold(), report.unmatched);
}

fn cmd_extract(block: &Path, rules: &RuleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rules = rules.load()?;
    let block = read_block(block)?;

    let ids = autoalt::extract_ids(&block, &rules);
    println!("{}", serde_json::to_string(&ids)?);

    Ok(())
}

fn cmd_classify(type_name: &str, rules: &RuleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rules = rules.load()?;

    if rules.classify(Some(type_name)) {
        println!("{} {}", type_name.bold(), "is an image block".green());
    } else {
        println!("{} {}", type_name.bold(), "is not an image block".yellow());
    }

    Ok(())
}

fn cmd_rules(compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let rules = RuleSet::wordpress();
    let json = if compact {
        serde_json::to_string(&rules)?
    } else {
        rules.to_json()?
    };
    println!("{}", json);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "autoalt".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Image alt text filter for rendered content blocks");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/autoalt".dimmed());
    println!("License: MIT");
}
