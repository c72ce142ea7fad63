//! Escape-rate sweep command.
//!
//! Runs the full sweep the settings file describes: for every trial and every
//! total-attack-edge count, inject attackers, measure the escape rate at each
//! walk length, and roll the graph back. The report carries one table per
//! trial plus a per-cell average table.

use super::config::{default_config_path, ExperimentConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use sybilgauge::experiment::{run_escape, AttackConfig};
use sybilgauge::graph::load_edge_list;
use sybilgauge::report::SweepTable;
use sybilgauge::sample::draw_sample;
use tracing::info;

pub fn execute(
    graph_path: PathBuf,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path.unwrap_or_else(default_config_path);
    let config = if config_path.exists() {
        ExperimentConfig::load(&config_path)?
    } else {
        info!(path = %config_path.display(), "no settings file found, writing defaults");
        ExperimentConfig::create_default(&config_path)?;
        ExperimentConfig::load(&config_path)?
    };

    let mut graph = load_edge_list(&graph_path)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sample = draw_sample(&graph, config.experiment.sample_size, &mut rng)?;

    let walk_lengths = config.walk_length.values();
    let clusters = config.attackers.clusters;
    let mut trial_tables = Vec::new();

    for trial in 0..config.experiment.trials {
        let mut table = SweepTable::new(walk_lengths.clone());
        for total_edges in config.attack_edges.values() {
            let attack = AttackConfig {
                clusters,
                cluster_size: config.attackers.cluster_size,
                attack_edges_per_cluster: total_edges as usize / clusters,
            };
            let mut cells = Vec::with_capacity(walk_lengths.len());
            for &walk_length in &walk_lengths {
                let outcome = run_escape(
                    &mut graph,
                    &sample,
                    &attack,
                    walk_length as usize,
                    config.experiment.r0,
                    &mut rng,
                )?;
                info!(
                    trial,
                    attack_edges = total_edges,
                    walk_length,
                    escapes = outcome.escape_count,
                    walks = outcome.walk_count,
                    "escape cell measured"
                );
                cells.push(outcome.escape_count as f64);
            }
            table.push_row(total_edges.to_string(), cells);
        }
        trial_tables.push(table);
    }

    let output = output.unwrap_or_else(|| PathBuf::from("escape_report.tsv"));
    let mut out = BufWriter::new(File::create(&output)?);
    for table in &trial_tables {
        table.write_tsv(&mut out)?;
    }
    if let Some(averaged) = SweepTable::averaged(&trial_tables) {
        averaged.write_tsv(&mut out)?;
    }
    out.flush()?;
    info!(path = %output.display(), "escape report written");

    Ok(())
}
