use clap::Parser;
use track_sign::utils::error::ErrorSeverity;
use track_sign::utils::logger;
use track_sign::{
    CliConfig, ConfigProvider, JsonRenderer, LogRenderer, NullRenderer, RenderTarget, Renderer,
    SchedulerStats, SignConfig, SignError, SignReceiver,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting track-sign receiver");
    tracing::debug!("CLI args: {:?}", cli);

    // 載入並驗證配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!(
        "🔧 {} on {}, {} fps, rotate {}s, renderer {}",
        config.transport().as_str().to_uppercase(),
        config.bind_address(),
        config.fps().max(track_sign::domain::ports::MIN_FPS),
        config.result_rotate_secs(),
        config.renderer.as_str()
    );

    let outcome = match config.renderer {
        RenderTarget::Log => serve(&config, LogRenderer::new()).await,
        RenderTarget::Json => serve(&config, JsonRenderer::new(std::io::stdout())).await,
        RenderTarget::None => serve(&config, NullRenderer).await,
    };

    match outcome {
        Ok(stats) => {
            tracing::info!("👋 Stopped after {} frames", stats.ticks);
        }
        Err(e) => {
            tracing::error!(
                "❌ Receiver failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn serve<R: Renderer + 'static>(config: &SignConfig, renderer: R) -> Result<SchedulerStats, SignError> {
    let receiver = SignReceiver::bind(config, renderer).await?;
    tracing::info!("✅ Listening on {}", receiver.local_addr()?);

    let handle = receiver.shutdown_handle();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("🛑 Shutdown signal received");
        handle.shutdown();
    });

    receiver.run().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!("Cannot install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
