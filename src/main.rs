use clap::Parser;

use linkstat::cli::{Cli, Commands};
use linkstat::config::{StaticConfig, init_config};
use linkstat::runtime::run_server;
use linkstat::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::GenerateConfig { output } => {
            match output {
                Some(path) => {
                    StaticConfig::default()
                        .save_to_file(&path)
                        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
                    println!("Sample configuration written to {}", path);
                }
                None => print!("{}", StaticConfig::generate_sample_config()),
            }
            Ok(())
        }
        Commands::Serve => {
            let config = init_config(cli.config.as_deref())?;

            // 日志 guard 必须存活到进程结束，否则队列中的日志会丢失
            let _log_guard = init_logging(&config.logging)?;

            run_server().await.inspect_err(|e| {
                tracing::error!("Server exited with error: {:#}", e);
            })
        }
    }
}
