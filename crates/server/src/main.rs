#[tokio::main]
async fn main() -> anyhow::Result<()> {
    carebot_server::start().await
}
