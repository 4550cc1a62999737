#[tokio::main]
async fn main() -> anyhow::Result<()> {
    patternlab_lib::run().await
}
