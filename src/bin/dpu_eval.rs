//! Generates a communication network, partitions it with every configured
//! strategy, and reports how often a BFS walk crosses partition boundaries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use dpu_partition::config::EvalConfig;
use dpu_partition::evaluation::{ReportStatus, ReportSummary, run_evaluation};
use dpu_partition::graph::NodeId;

#[derive(Debug, Parser)]
#[command(name = "dpu-eval", about = "Compare DPU partition strategies on a random network")]
struct Args {
    /// JSON config file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    nodes: Option<usize>,
    #[arg(long)]
    partitions: Option<usize>,
    #[arg(long)]
    max_per_partition: Option<usize>,
    /// Seed of the random strategy.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    graph_seed: Option<u64>,
    #[arg(long)]
    start_node: Option<NodeId>,
    #[arg(long)]
    max_depth: Option<u32>,
    #[arg(long)]
    max_out_degree: Option<usize>,
    /// Exact solver budget; 0 removes the limit.
    #[arg(long)]
    time_budget_ms: Option<u64>,
    /// Skip the exact strategy.
    #[arg(long)]
    no_exact: bool,
    /// Do not fix node 0 to partition 0 in the exact model.
    #[arg(long)]
    no_pin: bool,
    /// Print one JSON report instead of a table.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn into_config(self) -> Result<(EvalConfig, bool)> {
        let mut cfg = match &self.config {
            Some(path) => EvalConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => EvalConfig::default(),
        };
        if let Some(v) = self.nodes {
            cfg.num_nodes = v;
        }
        if let Some(v) = self.partitions {
            cfg.num_partitions = v;
        }
        if let Some(v) = self.max_per_partition {
            cfg.max_per_partition = v;
        }
        if let Some(v) = self.seed {
            cfg.rng_seed = v;
        }
        if let Some(v) = self.graph_seed {
            cfg.graph_seed = v;
        }
        if let Some(v) = self.start_node {
            cfg.start_node = v;
        }
        if let Some(v) = self.max_depth {
            cfg.max_depth = v;
        }
        if self.max_out_degree.is_some() {
            cfg.max_out_degree = self.max_out_degree;
        }
        if let Some(ms) = self.time_budget_ms {
            cfg.exact.time_budget_ms = (ms > 0).then_some(ms);
        }
        if self.no_exact {
            cfg.exact.enabled = false;
        }
        if self.no_pin {
            cfg.exact.pin_first_to_zero = false;
        }
        Ok((cfg, self.json))
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a EvalConfig,
    path: &'a [NodeId],
    strategies: Vec<ReportSummary>,
}

fn print_table(path: &[NodeId], rows: &[ReportSummary]) {
    println!("path ({} nodes): {:?}", path.len(), path);
    println!();
    println!(
        "{:<20} {:>7} {:>9} {:>10}  {}",
        "strategy", "score", "edge cut", "time (ms)", "result"
    );
    for row in rows {
        let num = |v: Option<usize>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        let result = match row.status {
            ReportStatus::Ok => "ok".to_string(),
            ReportStatus::Failed => row.error.clone().unwrap_or_default(),
        };
        println!(
            "{:<20} {:>7} {:>9} {:>10}  {}",
            row.strategy,
            num(row.score),
            num(row.edge_cut),
            row.elapsed_ms,
            result
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let (cfg, json) = Args::parse().into_config()?;
    log::debug!("config: {cfg:?}");
    let run = run_evaluation(&cfg).context("evaluation could not start")?;
    let rows = run.summaries();

    if json {
        let report = JsonReport {
            config: &cfg,
            path: &run.path,
            strategies: rows,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&run.path, &rows);
        if let Some(best) = run.best() {
            println!();
            println!("best: {}", best.strategy);
        }
    }
    Ok(())
}
