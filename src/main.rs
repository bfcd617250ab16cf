use log::error;
use std::env;

#[tokio::main]
async fn main() {
    if env::var_os("RUST_LOG").is_none() {
        unsafe {
            env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    if let Err(e) = gigbook::cli::run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}
