use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use skv_compare_common::{check_health, format_file_size, parse_excel_response, Summary, DOWNLOAD_FILE_NAME};
use skv_tender_compare::{cli, client, compare, config, error, report, server};
use cli::{Cli, Commands};
use client::ReqwestTransport;
use compare::CompareOptions;
use config::Config;
use error::{CompareError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool, serving: bool) {
    let fallback = if verbose {
        "skv_tender_compare=debug,skv_compare_common=debug,tower_http=debug"
    } else if serving {
        "skv_tender_compare=info,tower_http=info"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template("  [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, matches!(cli.command, Commands::Serve { .. }));
    let mut config = Config::load()?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            println!("🔀 skv-compare - 比較プロキシ");
            println!("  待ち受け: http://{}", config.bind);
            println!("  転送先:   {}\n", config.backend_url);
            server::run(&config).await?;
        }

        Commands::Compare { skv, tender, output, url, health_url } => {
            println!("📊 skv-compare - 比較\n");

            // 1. ファイル読み込み
            println!("[1/3] ファイルを読み込み中...");
            let skv_file = compare::load_upload(&skv)?;
            let tender_file = compare::load_upload(&tender)?;
            println!("✔ SKV:  {} ({})", skv_file.name, format_file_size(skv_file.size));
            println!("✔ 入札: {} ({})\n", tender_file.name, format_file_size(tender_file.size));

            // 2. 比較実行
            let options = CompareOptions {
                url: url.unwrap_or(config.backend_url.clone()),
                health_url: health_url.unwrap_or(config.health_url.clone()),
                retry: config.retry_options(),
            };
            println!("[2/3] 比較中... ({})", options.url);
            let bar = progress_bar();
            let transport = ReqwestTransport::new();
            let outcome = compare::run_comparison(&transport, &options, skv_file, tender_file, |value| {
                bar.set_position(u64::from(value))
            })
            .await;
            match &outcome {
                Ok(_) => bar.finish_with_message("完了"),
                Err(_) => bar.abandon_with_message("失敗"),
            }
            let state = outcome?;
            let result = state
                .result()
                .ok_or_else(|| CompareError::Comparison("結果がありません".into()))?;
            if let Some(message) = state.success() {
                println!("✔ {}\n", message);
            }

            // 3. 保存
            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| PathBuf::from(DOWNLOAD_FILE_NAME));
            std::fs::write(&output, &result.blob[..])?;
            println!("✔ 結果を保存: {}", output.display());
            println!("  {}", report::render_summary(&Summary::of(result)));

            println!("\n✅ 比較完了");
        }

        Commands::Preview { input, search, json } => {
            if !input.exists() {
                return Err(CompareError::FileNotFound(input.display().to_string()));
            }
            let blob: Arc<[u8]> = std::fs::read(&input)?.into();
            let result = parse_excel_response(blob);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("📄 {}\n", input.display());
                println!("{}\n", report::render_summary(&Summary::of(&result)));
                print!("{}", report::render_tables(&result, search.as_deref()));
            }
        }

        Commands::Health { url } => {
            let url = url.unwrap_or(config.health_url.clone());
            let status = check_health(&ReqwestTransport::new(), &url).await;
            if status.is_healthy {
                println!("✅ バックエンド稼働中: {}", url);
            } else {
                let reason = status.error.unwrap_or_default();
                return Err(CompareError::Comparison(format!("バックエンド停止中: {} ({})", url, reason)));
            }
        }

        Commands::Config { set_backend_url, show } => {
            if let Some(url) = set_backend_url {
                config.set_backend_url(url)?;
                println!("✔ 比較APIのURLを保存しました");
            }

            if show {
                println!("設定ファイル: {}", Config::config_path()?.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
