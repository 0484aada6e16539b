use clap::Parser;
use menu_bot::app::webhook;
use menu_bot::utils::error::{ErrorSeverity, MenuError};
use menu_bot::utils::{logger, validation::Validate};
use menu_bot::{build_bot, load_sites, ServeArgs, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let args = ServeArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting menu-bot");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    if let Err(e) = run(args).await {
        tracing::error!(
            "❌ menu-bot stopped: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(args: ServeArgs) -> Result<(), MenuError> {
    let mut settings = Settings::from_file(&args.config)?;

    // 命令列覆蓋設定
    if let Some(sites) = args.sites {
        settings.sites_file = sites;
    }
    if let Some(bind) = args.bind {
        settings.server.bind_address = bind;
    }

    settings.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    tracing::debug!("Settings: {:?}", settings);

    let sites = load_sites(&settings.sites_file)?;
    let bot = build_bot(&settings, sites)?;
    let app = webhook::router(bot, &settings.server.endpoint);

    let listener = TcpListener::bind(&settings.server.bind_address)
        .await
        .map_err(MenuError::IoError)?;
    tracing::info!(
        "🌐 Listening on {} (endpoint {})",
        settings.server.bind_address,
        settings.server.endpoint
    );

    webhook::serve(listener, app).await
}
