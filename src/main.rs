use chrono::Utc;
use env_logger::Env;
use log::error;
use std::io::Write;
use structopt::StructOpt;
use tiny_crud_sqlite::command_line_interface::CliOptions;
use tiny_crud_sqlite::database_init;
use tiny_crud_sqlite::warp_api;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().filter_or("RUST_LOG", "info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let cli_options = CliOptions::from_args();

    let conn = database_init::open_database(&cli_options.database).unwrap_or_else(|err| {
        error!("Failed to initialize database, {}", err);
        std::process::exit(1);
    });

    // Start web framework
    if let Err(err) = warp_api::run_server(&cli_options, conn.clone()).await {
        error!("{}", err);
        std::process::exit(1);
    }

    if let Err(err) = database_init::close_database(conn) {
        error!("{}", err);
        std::process::exit(1);
    }
}
