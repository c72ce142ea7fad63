//! Served-rate sweep command.
//!
//! Sweeps the walk length on the unmodified graph: every trial collects tails
//! over R rounds per walk length and counts served suspect/verifier pairs.
//! The report has one row per trial plus an average row.

use super::config::{default_config_path, ExperimentConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use sybilgauge::experiment::run_utility;
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

    let graph = load_edge_list(&graph_path)?;
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
    let mut trials_table = SweepTable::new(walk_lengths.clone());
    let mut per_trial_cells: Vec<Vec<f64>> = Vec::new();

    for trial in 1..=config.experiment.trials {
        let mut cells = Vec::with_capacity(walk_lengths.len());
        for &walk_length in &walk_lengths {
            let outcome = run_utility(
                &graph,
                &sample,
                walk_length as usize,
                config.experiment.r0,
                &mut rng,
            )?;
            info!(
                trial,
                walk_length,
                served = outcome.served_pairs,
                pairs = outcome.total_pairs,
                "utility cell measured"
            );
            cells.push(outcome.served_pairs as f64);
        }
        trials_table.push_row(trial.to_string(), cells.clone());
        per_trial_cells.push(cells);
    }

    let trials = config.experiment.trials as f64;
    let average: Vec<f64> = (0..walk_lengths.len())
        .map(|column| {
            per_trial_cells
                .iter()
                .map(|cells| cells[column])
                .sum::<f64>()
                / trials
        })
        .collect();
    let mut average_table = SweepTable::new(walk_lengths.clone());
    average_table.push_row("average", average);

    let output = output.unwrap_or_else(|| PathBuf::from("utility_report.tsv"));
    let mut out = BufWriter::new(File::create(&output)?);
    trials_table.write_tsv(&mut out)?;
    average_table.write_tsv(&mut out)?;
    out.flush()?;
    info!(path = %output.display(), "utility report written");

    Ok(())
}
