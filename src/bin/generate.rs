use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::debug;
use tml_site::site::{build, BuildOptions};
use tml_site::validate::{SchemaValidator, Xmllint};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const FALLBACK_TEMPLATE_DIR: &str = "templates";

/// Generate a static course site from a TML document.
#[derive(Parser, Debug)]
#[command(name = "generate", version, about)]
struct Args {
    /// Course document (TML/XML)
    tml: PathBuf,

    /// Directory receiving index.html, the lesson pages and course.yaml
    out_dir: PathBuf,

    /// Directory with template overrides
    #[arg(env = "TML_TEMPLATE_DIR")]
    template_dir: Option<PathBuf>,

    /// XSD schema checked with xmllint before parsing
    #[arg(long, env = "TML_SCHEMA")]
    schema: Option<PathBuf>,

    /// Skip schema validation
    #[arg(long)]
    no_validate: bool,

    /// Remove the output directory before generating
    #[arg(long)]
    clean: bool,

    /// Seed for the matching and ordering shuffles
    #[arg(long)]
    seed: Option<u64>,
}

fn template_dir(arg: Option<PathBuf>) -> Option<PathBuf> {
    arg.or_else(|| {
        let fallback = PathBuf::from(FALLBACK_TEMPLATE_DIR);
        fallback.is_dir().then_some(fallback)
    })
}

fn clean_output_dir(out_dir: &Path) -> anyhow::Result<()> {
    if fs::metadata(out_dir).is_ok() {
        fs::remove_dir_all(out_dir)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    debug!("{:?}", args);

    if args.clean {
        clean_output_dir(&args.out_dir).context("failed to clean output directory")?;
    }

    let options = BuildOptions {
        template_dir: template_dir(args.template_dir),
        seed: args.seed,
    };
    let validator = Xmllint::new(args.schema);
    let validator = (!args.no_validate).then_some(&validator as &dyn SchemaValidator);

    let summary = build(&args.tml, &args.out_dir, validator, &options)?;

    println!(
        "created {BOLD}{}{RESET} lesson pages in {BOLD}{}{RESET}",
        summary.lessons.len(),
        args.out_dir.display()
    );
    println!("index: {}", summary.index.display());
    println!("manifest: {}", summary.manifest.display());

    Ok(())
}
