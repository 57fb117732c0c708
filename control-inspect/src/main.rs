/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

mod config;
mod error;
mod report;

use crate::config::Config;
use crate::error::InspectError;
use broker_control::{ManagementRegistry, ResourceKind};
use clap::{Parser, ValueEnum};
use static_topology::StaticTopology;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(about = "Inspect a broker topology through its control adapters")]
struct InspectArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Registry that only logs; stands in for a real management object server.
struct LoggingRegistry;

impl ManagementRegistry for LoggingRegistry {
    fn register(&self, kind: ResourceKind, id: &str, name: &str) -> Result<(), String> {
        info!(kind = kind.as_str(), id, name, "management object registered");
        Ok(())
    }

    fn deregister(&self, kind: ResourceKind, id: &str) {
        info!(kind = kind.as_str(), id, "management object deregistered");
    }
}

fn main() -> Result<(), InspectError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = InspectArgs::parse();
    info!(config = args.config.as_str(), "Started control-inspect");

    let config_path = PathBuf::from(&args.config);
    let contents = fs::read_to_string(&config_path).map_err(|e| InspectError::Config {
        path: args.config.clone(),
        reason: format!("File not found: {e}"),
    })?;
    let config: Config = json5::from_str(&contents).map_err(|e| InspectError::Config {
        path: args.config.clone(),
        reason: format!("Unable to parse config file: {e}"),
    })?;

    let topology_path = resolve_relative(&config_path, &config.topology.file_path);
    let registry: Arc<dyn ManagementRegistry> = Arc::new(LoggingRegistry);
    let topology = StaticTopology::load(&topology_path, &config.control, Some(registry))?;

    let engine = topology
        .engine_control()
        .ok_or_else(|| InspectError::Render("engine has no control adapter".to_string()))?;
    let report = report::inspect(&engine)?;

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|e| InspectError::Render(e.to_string()))?,
        OutputFormat::Text => report::render_text(&report),
    };
    println!("{rendered}");

    topology.teardown();
    Ok(())
}

/// Resolves `file_path` against the directory holding `config_path` unless absolute.
fn resolve_relative(config_path: &Path, file_path: &str) -> PathBuf {
    let file_path = Path::new(file_path);
    if file_path.is_absolute() {
        return file_path.to_path_buf();
    }
    config_path
        .parent()
        .map(|dir| dir.join(file_path))
        .unwrap_or_else(|| file_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::resolve_relative;
    use std::path::{Path, PathBuf};

    #[test]
    fn relative_topology_paths_follow_the_config_file() {
        assert_eq!(
            resolve_relative(Path::new("control-inspect/config/inspect.json5"), "topology.json5"),
            PathBuf::from("control-inspect/config/topology.json5")
        );
        assert_eq!(
            resolve_relative(Path::new("inspect.json5"), "/etc/topology.json5"),
            PathBuf::from("/etc/topology.json5")
        );
    }
}
