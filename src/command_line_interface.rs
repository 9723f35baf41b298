use std::net::IpAddr;
use std::net::SocketAddr;
use std::path::PathBuf;
use structopt::clap::AppSettings;
use structopt::StructOpt;

#[derive(StructOpt, Debug, Clone)]
#[structopt(
    name = "tiny-crud-sqlite",
    about = "A minimal CRUD HTTP service for items, backed by a single SQLite table.",
    setting = AppSettings::DeriveDisplayOrder,
    setting = AppSettings::UnifiedHelpMessage,
)]
pub struct CliOptions {
    /// Port to listen to.
    #[structopt(short, long, default_value = "3000", env = "PORT")]
    pub port: u16,

    /// Network interface to listen on.
    /// The default "0.0.0.0" accepts connections on all interfaces,
    /// use "127.0.0.1" to only serve apps from within the same computer.
    #[structopt(
        short,
        long,
        default_value = "0.0.0.0",
        name = "NETWORK_INTERFACE",
        env = "TINY_CRUD_ADDRESS"
    )]
    pub address: IpAddr,

    /// SQLite database file to store items in. It is created if it doesn't exist yet.
    #[structopt(
        short,
        long,
        default_value = "tiny.db",
        name = "DATABASE_FILE",
        env = "TINY_CRUD_DATABASE",
        parse(from_os_str)
    )]
    pub database: PathBuf,
}

impl CliOptions {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}
