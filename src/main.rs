use clap::Parser;
use pgconv::utils::{logger, validation::Validate};
use pgconv::{AppConfig, Cli, ConvertEngine, LocalStorage, PgSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Configuration errors happen before the logger exists; stderr only.
    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    logger::init_cli_logger(
        cli.verbose,
        config.logging.level(),
        config.logging.file.as_deref(),
    )?;

    tracing::info!("Starting PostgreSQL data format converter");
    if cli.verbose {
        tracing::debug!("CLI options: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let request = match cli.to_request(&config) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Could not resolve the run options: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };
    tracing::info!("Output format: {}", request.format);

    let source = match PgSource::connect(&config.postgresql).await {
        Ok(source) => {
            tracing::info!("Successfully connected to PostgreSQL");
            source
        }
        Err(e) => {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let engine = ConvertEngine::new(source, LocalStorage::new());

    #[cfg(feature = "mongodb-load")]
    let engine = match &request.destination {
        pgconv::core::Destination::MongoUri(uri) => {
            match pgconv::adapters::mongo::MongoSink::connect(uri).await {
                Ok(sink) => {
                    tracing::info!("Connected to MongoDB at {}", uri);
                    engine.with_sink(Box::new(sink))
                }
                Err(e) => {
                    tracing::error!("Failed to connect to MongoDB: {}", e);
                    eprintln!("❌ {}", e.user_friendly_message());
                    std::process::exit(e.exit_code());
                }
            }
        }
        _ => engine,
    };

    match engine.run(&request).await {
        Ok(destination) => {
            tracing::info!("✅ Conversion process completed successfully!");
            tracing::info!("📁 Output saved to: {}", destination);
            println!("✅ Conversion process completed successfully!");
            println!("📁 Output saved to: {}", destination);
        }
        Err(e) => {
            tracing::error!("❌ Conversion process failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
