use anyhow::Context;
use clap::Parser;
use isams_rest_client::utils::logger;
use isams_rest_client::{run_session, CliArgs, RequestCounter, RunMonitor};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose());
    } else {
        logger::init_cli_logger(args.verbose());
    }

    tracing::info!("Starting isams-rest-client");

    let pause = args.pause;
    let monitor = RunMonitor::new(RequestCounter::new(), args.monitor);
    if monitor.system_stats_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let outcome = match args.into_config() {
        Ok(config) => {
            tracing::debug!("Client config: {:?}", config);
            if config.has_placeholder_credentials() {
                tracing::warn!("Client id or secret still holds the sample placeholder");
            }
            run_session(&config, &monitor).await
        }
        Err(e) => Err(e),
    };

    let exit_code = match &outcome {
        Ok(report) => {
            tracing::info!(
                "✅ Retrieved {} HR data sets and {} employees",
                report.reference_data.len(),
                report.employee_ids.len()
            );
            0
        }
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e.user_friendly_message(),
                e.category(),
                e.severity()
            );
            if let Some(api_path) = e.api_path() {
                tracing::error!("Request: {}", api_path);
            }
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            e.exit_code()
        }
    };

    // 無論成功與否都輸出請求次數與耗時
    monitor.log_phase("Final");
    println!("{}", monitor.summary());

    if pause {
        println!("Press Enter to exit...");
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .context("Failed to read from stdin")?;
    }

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
