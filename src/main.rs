//! IDE Opener worker entry point

use ide_opener::config::WorkerConfig;

#[tokio::main]
async fn main() {
    let config = match WorkerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = ide_opener::run(config).await {
        log::error!("Worker stopped: {}", e);
        eprintln!("Worker stopped: {}", e);
        std::process::exit(1);
    }
}
