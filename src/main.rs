/// Profile Directory - search and leaderboard server
use profile_directory::{config::ServerConfig, context::AppContext, error::DirectoryResult, server};

#[tokio::main]
async fn main() -> DirectoryResult<()> {
    let config = ServerConfig::from_env()?;
    profile_directory::init_tracing(&config.logging.level);

    let ctx = AppContext::new(config).await?;

    server::serve(ctx).await
}
