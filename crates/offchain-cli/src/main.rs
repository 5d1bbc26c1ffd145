use anyhow::anyhow;
use clap::Parser;

mod cmd;
mod env;
mod metavar;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match dotenvy::dotenv() {
        Err(e) if !e.not_found() => return Err(anyhow!(e).context("fail to parse .env")),
        _ => {}
    }

    cmd::Cmd::parse().execute().await
}
