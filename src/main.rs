use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    quip::run().await
}
