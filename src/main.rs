use box_packer::utils::logger;
use box_packer::{CliConfig, PackerConfig, PackingError, PackingService};
use clap::Parser;

fn exit_with(err: &PackingError) -> ! {
    match serde_json::to_string(&err.to_response()) {
        Ok(body) => println!("{}", body),
        Err(e) => eprintln!("❌ Failed to encode error response: {}", e),
    }

    // 422-class answers are a normal "cannot pack" outcome, not a crash
    let exit_code = if err.status_hint() == 422 { 2 } else { 1 };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting box-packer");
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let config = match PackerConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            std::process::exit(1);
        }
    };

    let request = match cli.read_request() {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Could not read packing request: {}", e);
            exit_with(&e);
        }
    };

    let service = match PackingService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("❌ Failed to initialise packing pipeline: {}", e);
            std::process::exit(1);
        }
    };

    match service.handle(&request).await {
        Ok(result) => match serde_json::to_string(&result) {
            Ok(body) => println!("{}", body),
            Err(e) => {
                tracing::error!("Failed to encode packing result: {}", e);
                exit_with(&PackingError::from(e));
            }
        },
        Err(e) => {
            tracing::info!(code = e.error_code(), "Packing finished without a box: {}", e);
            exit_with(&e);
        }
    }
}
