use clap::Parser;
use flight_aggregator::adapters::HttpFetcher;
use flight_aggregator::config::LogFormat;
use flight_aggregator::core::pipeline::{FlightPipeline, FlightService};
use flight_aggregator::utils::error::{ErrorSeverity, FlightError};
use flight_aggregator::utils::{logger, validation::Validate};
use flight_aggregator::{AppConfig, CliConfig, Command, HealthProbe};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入並驗證配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting flight-aggregator");
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling");
            ctrl_c.cancel();
        }
    });

    match run(cli.command, config, &cancel).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(
                "❌ Query failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 4, // 查無資料
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn run(command: Command, config: AppConfig, cancel: &CancellationToken) -> Result<(), FlightError> {
    if let Command::Health = command {
        let fetcher = HttpFetcher::new(config.timeout(), config.error_body_limit())?;
        let report = HealthProbe::new(config, Arc::new(fetcher)).check(cancel).await;
        print_json(&report)?;
        if !report.is_ok() {
            std::process::exit(2);
        }
        return Ok(());
    }

    let service = FlightService::new(FlightPipeline::from_config(config)?);

    match command {
        Command::List => print_json(&service.list(cancel).await?),
        Command::Id { id } => print_json(&service.find_by_id(cancel, &id).await?),
        Command::Number { number } => print_json(&service.find_by_number(cancel, &number).await?),
        Command::Passenger { name } => print_json(&service.find_by_passenger(cancel, &name).await?),
        Command::Destination { departure, arrival } => print_json(
            &service
                .find_by_destination(cancel, &departure, &arrival)
                .await?,
        ),
        Command::Price { price } => print_json(&service.find_by_price(cancel, price).await?),
        Command::Sorted { by } => print_json(&service.sorted(cancel, by).await?),
        Command::Health => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), FlightError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
