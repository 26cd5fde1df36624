use std::sync::LazyLock;

pub mod api;
pub mod client;
pub mod configs;
pub mod constants;
pub mod middlewares;
pub mod modules;
#[cfg(test)]
pub mod test;
pub mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    let _ = env_logger::try_init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});
