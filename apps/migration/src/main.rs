//! Migration CLI tool.

mod migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    sea_orm_migration::cli::run_cli(migrator::Migrator).await;
}
