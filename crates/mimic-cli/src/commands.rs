//! Command implementations for the mimic CLI

use std::path::{Path, PathBuf};

use clap::Args;
use mimic_core::ClassPool;
use mimic_engine::{MimicCreator, MimicReport};
use tracing::{debug, info};

use crate::config::{MimicConfig, MimicPair};
use crate::{CliError, Result};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// JSON class model to read
    pub model: PathBuf,

    /// Class whose shape is copied; repeat together with `--destination`
    #[arg(short, long, requires = "destination")]
    pub source: Vec<String>,

    /// Class that receives the copied members, paired with the `--source` at the same position
    #[arg(short, long, requires = "source")]
    pub destination: Vec<String>,

    /// Where to write the updated model (overrides the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// JSON class model to read
    pub model: PathBuf,

    /// Only print this class
    pub class: Option<String>,
}

pub fn load_pool(path: &Path) -> Result<ClassPool> {
    debug!("Loading class model from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(ClassPool::from_json(&text)?)
}

/// Mimics every requested pair, in order, then writes the model.
///
/// Pairs come from `--source/--destination` when given, zipped by position,
/// from the config otherwise. The first failing pair aborts the command and nothing is
/// written.
pub fn apply_command(args: ApplyArgs, config: &MimicConfig) -> Result<Vec<MimicReport>> {
    if args.source.len() != args.destination.len() {
        return Err(CliError::InvalidInput(format!(
            "got {} --source but {} --destination; they must be given in pairs",
            args.source.len(),
            args.destination.len()
        )));
    }
    let pairs = if args.source.is_empty() {
        config.pairs.clone()
    } else {
        args.source
            .into_iter()
            .zip(args.destination)
            .map(|(source, destination)| MimicPair::new(source, destination))
            .collect()
    };
    if pairs.is_empty() {
        return Err(CliError::InvalidInput(
            "nothing to mimic: pass --source/--destination or list [[pairs]] in the config"
                .to_string(),
        ));
    }

    let pool = load_pool(&args.model)?;
    let creator = MimicCreator::new();
    let mut reports = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        let src = pool.require(&pair.source)?;
        let dst = pool.require(&pair.destination)?;
        let report = creator.mimic_class_report(&src, &dst)?;
        if config.output.report {
            info!(
                "{} -> {}: {}",
                pair.source,
                pair.destination,
                serde_json::to_string(&report)?
            );
        }
        reports.push(report);
    }

    let json = pool.to_json()?;
    match args.output.as_ref().or(config.output.path.as_ref()) {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(reports)
}

pub fn show_command(args: ShowArgs, _config: &MimicConfig) -> Result<()> {
    let pool = load_pool(&args.model)?;
    let names = match args.class {
        Some(name) => vec![pool.require(&name)?.name()],
        None => pool.names(),
    };
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let handle = pool.require(name.as_str())?;
        println!("{}", handle.snapshot());
    }
    Ok(())
}
