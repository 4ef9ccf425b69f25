use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use shortlist_cli::{init_tracing, report_failure, ConfigArgs};
use shortlist_core::training::{group_by_query, load_queries, load_training_pairs};
use shortlist_recommend::eval::{evaluate, predict, write_predictions};
use shortlist_recommend::request::DEFAULT_TOP_K;
use shortlist_recommend::Recommender;

#[derive(Parser, Debug)]
#[command(name = "shortlist-eval", about = "Measure Recall@K on labelled queries and export test predictions")]
struct Cli {
    /// Cut-off for Recall@K (also the number of recommendations requested).
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    k: usize,

    /// Labelled `Query,Assessment_url` CSV; defaults to `data.training_path`.
    #[arg(long)]
    labelled: Option<PathBuf>,

    /// Unlabelled CSV with a `Query` column to generate predictions for.
    #[arg(long, requires = "out")]
    predict: Option<PathBuf>,

    /// Where to write `Query,Assessment_url` predictions.
    #[arg(long, requires = "predict")]
    out: Option<PathBuf>,

    /// Optional JSON report output path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Skip Recall@K and only run predictions.
    #[arg(long, requires = "predict")]
    skip_eval: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

fn progress(len: usize, unit: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!("{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} {{msg}}"))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn short(query: &str) -> String {
    query.chars().take(60).collect()
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    anyhow::ensure!(cli.k > 0, "--k must be at least 1");
    let settings = cli.config.settings()?;
    let recommender = Recommender::from_settings(&settings).context("failed to start recommender")?;

    if !cli.skip_eval {
        let labelled_path = cli.labelled.clone().unwrap_or_else(|| settings.data.training_path());
        let labelled = group_by_query(&load_training_pairs(&labelled_path)?);
        println!("📊 Evaluating {} labelled queries (Recall@{})", labelled.len(), cli.k);

        let pb = progress(labelled.len(), "queries")?;
        let report = evaluate(&recommender, &labelled, cli.k, |q| {
            pb.set_message(format!("{} → {:.3}", short(&q.query), q.recall));
            pb.inc(1);
        })?;
        pb.finish_and_clear();

        for q in &report.per_query {
            println!("  {:.3}  {}/{}  {}", q.recall, q.hits, q.relevant, short(&q.query));
        }
        println!("\n✅ Mean Recall@{}: {:.3}", report.k, report.mean_recall);
        if let Some(path) = &cli.report {
            report.write_json(path)?;
            println!("📝 Report written to {}", path.display());
        }
    }

    if let (Some(input), Some(out)) = (&cli.predict, &cli.out) {
        let queries = load_queries(input)?;
        println!("\n🔮 Generating predictions for {} queries", queries.len());
        let pb = progress(queries.len(), "queries")?;
        let rows = predict(&recommender, &queries, cli.k, |q, n| {
            pb.set_message(format!("{} ({n})", short(q)));
            pb.inc(1);
        })?;
        pb.finish_and_clear();
        write_predictions(out, &rows)?;
        println!("✅ Saved {} predictions to {}", rows.len(), out.display());
    }
    Ok(())
}
