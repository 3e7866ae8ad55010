#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rfpnav_server::start().await
}
