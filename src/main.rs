// src/main.rs — Oramind entry point

use std::sync::Arc;

use clap::Parser;

use oramind::api::{self, ApiState};
use oramind::cli::{Cli, Commands};
use oramind::engine::{Engine, EngineRegistry};
use oramind::infra::config::Config;
use oramind::infra::logger;
use oramind::retrieval::DocIndex;
use oramind::tasks::{anomaly, backup, optimizer, security};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Respects RUST_LOG
    logger::init_logging("info");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    if let Some(provider) = cli.provider {
        config.engine.provider = provider;
    }

    let engine = Engine::from_settings(&config.engine)?;
    tracing::info!(
        provider = engine.provider_name(),
        "LLM engine configured"
    );

    let registry = Arc::new(EngineRegistry::new(engine));
    let index = Arc::new(DocIndex::builtin());
    let data_dir = config.data.resolve();
    std::fs::create_dir_all(&data_dir).ok();

    match cli.command {
        Commands::Serve { port } => {
            let mut api_settings = config.api.clone();
            if let Some(port) = port {
                api_settings.port = port;
            }
            let state = ApiState {
                registry,
                index,
                settings: config.engine.clone(),
                log_file: data_dir.join("synthetic_logs.json"),
                data_dir,
            };
            api::start_server(&api_settings, state).await
        }
        Commands::Audit => {
            let audit = security::audit_security(&registry.current(), &index, &data_dir).await;
            println!("{}", serde_json::to_string_pretty(&audit)?);
            Ok(())
        }
        Commands::Anomalies => {
            let log_file = data_dir.join("synthetic_logs.json");
            let (results, stats) =
                anomaly::detect_anomalies(&registry.current(), &index, &log_file).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "results": results,
                    "stats": stats,
                }))?
            );
            Ok(())
        }
        Commands::Optimize { sql, plan } => {
            let advice =
                optimizer::optimize_query(&registry.current(), &index, &sql, &plan).await?;
            println!("{}", serde_json::to_string_pretty(&advice)?);
            Ok(())
        }
        Commands::Backup { rpo, rto, budget } => {
            let plan =
                backup::recommend_backup(&registry.current(), &index, &rpo, &rto, &budget).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Commands::Chat { query } => {
            let context = index.retrieve(&query, 3).join("\n");
            let answer = registry
                .current()
                .generate(
                    &query,
                    Some(&context),
                    Some("You are an expert Oracle DBA. Answer clearly, structured and professional."),
                )
                .await?;
            println!("{}", answer.trim());
            Ok(())
        }
    }
}
