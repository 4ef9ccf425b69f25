use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use shortlist_cli::{init_tracing, report_failure, ConfigArgs};
use shortlist_recommend::request::DEFAULT_TOP_K;
use shortlist_recommend::{validate_request, RecommendationResponse, Recommender};

#[derive(Parser, Debug)]
#[command(name = "shortlist-recommend", about = "Recommend assessments for a hiring query or job description")]
struct Cli {
    /// Natural-language query or job description.
    #[arg(required_unless_present = "health")]
    query: Option<String>,

    /// Number of recommendations (1-10).
    #[arg(long, short = 'k', default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Print the response as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Print a readiness summary instead of recommending.
    #[arg(long)]
    health: bool,

    #[command(flatten)]
    config: ConfigArgs,
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
    let query = cli.query.as_deref().unwrap_or_default();
    if !cli.health {
        // Reject bad input before paying for startup.
        validate_request(query, cli.top_k)?;
    }
    let settings = cli.config.settings()?;
    let recommender = Recommender::from_settings(&settings).context("failed to start recommender")?;

    if cli.health {
        println!("{}", serde_json::to_string_pretty(&recommender.health())?);
        return Ok(());
    }

    let ranked = recommender.recommend(query, cli.top_k)?;
    if cli.json {
        let response = RecommendationResponse::build(query, &ranked, recommender.context().catalog());
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("🔍 {query}");
    if ranked.is_empty() {
        println!("No matching assessments.");
    }
    for (i, rec) in ranked.iter().enumerate() {
        let s = &rec.scores;
        println!("\n  {}. {}  score={:.4}", i + 1, rec.name, rec.final_score);
        println!("     {}", rec.id);
        println!(
            "     history={:.2} name={:.2} category={:.2} embedding={:.3}",
            s.historical, s.name_overlap, s.category_alignment, s.embedding_similarity
        );
        if let Some(record) = recommender.context().catalog().get(&rec.id) {
            let types: Vec<&str> = record.test_types.iter().map(|t| t.label()).collect();
            println!(
                "     {} | {} min | remote={}",
                types.join(", "),
                record.duration_minutes().unwrap_or(0),
                shortlist_core::types::yes_no::label(record.remote_support)
            );
        }
    }
    Ok(())
}
