use clap::Parser;

use viewcounter::cli::{Cli, Commands};
use viewcounter::config::{get_config, init_config_from};
use viewcounter::runtime::modes;
use viewcounter::system::logging::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());
    let config = get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("[ERROR] Failed to initialize logging: {:#}", e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = modes::run_server().await {
                match e.downcast_ref::<viewcounter::errors::ViewCounterError>() {
                    Some(err) => eprintln!("{}", err.format_colored()),
                    None => eprintln!("[ERROR] {:#}", e),
                }
                std::process::exit(1);
            }
        }
        Some(cmd) => {
            // CLI 模式只输出警告以上的日志，避免干扰命令输出
            let mut logging = config.logging.clone();
            logging.level = "warn".to_string();
            logging.file = None;
            let _guard = init_logging(&logging).ok();

            if let Err(e) = modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        }
    }
}
