use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    planpilot_cli::cli::run().await
}
