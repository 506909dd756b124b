//! CLI command implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use buildmaster_compiler::{MasterConfig, PipelineBuilder, ProjectCompiler, ProjectRegistry};
use buildmaster_config::{HttpAuthFile, parse_master};
use tracing::{info, warn};

/// Parse and compile the master configuration at `path`.
fn load(path: &Path, httpauth: Option<&Path>) -> Result<MasterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let credentials = match httpauth.map(Path::to_path_buf).or_else(HttpAuthFile::default_path) {
        Some(auth_path) => HttpAuthFile::load(&auth_path)
            .with_context(|| format!("Failed to read credentials: {}", auth_path.display()))?,
        None => {
            warn!("No home directory found, repository credentials are disabled");
            HttpAuthFile::default()
        }
    };
    info!(entries = credentials.len(), "Loaded repository credentials");

    let file = parse_master(&content, &credentials)
        .with_context(|| format!("Failed to parse master config: {}", path.display()))?;

    let mut pipelines = PipelineBuilder::new();
    if let Some(interpreter) = &file.master.interpreter {
        pipelines = pipelines.with_interpreter(interpreter);
    }
    let compiler = ProjectCompiler::new(Arc::new(file.master)).with_pipeline_builder(pipelines);

    let mut registry = ProjectRegistry::from_configs(file.projects)?;
    let master = compiler
        .compile_all(&mut registry)
        .with_context(|| format!("Failed to compile master config: {}", path.display()))?;
    Ok(master)
}

pub fn validate(path: &Path, httpauth: Option<&Path>) -> Result<()> {
    match load(path, httpauth) {
        Ok(master) => {
            println!(
                "Configuration is valid: {} schedulers, {} builders, {} notifiers",
                master.schedulers.len(),
                master.builders.len(),
                master.notifiers.len()
            );
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    }
}

pub fn compile(path: &Path, httpauth: Option<&Path>, pretty: bool) -> Result<()> {
    let master = load(path, httpauth)?;
    let json = if pretty {
        serde_json::to_string_pretty(&master)?
    } else {
        serde_json::to_string(&master)?
    };
    println!("{}", json);
    Ok(())
}
