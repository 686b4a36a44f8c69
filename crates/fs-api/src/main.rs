#[tokio::main]
async fn main() {
    if let Err(err) = fs_api::run().await {
        tracing::error!(error = %err, "fs-api failed");
        std::process::exit(1);
    }
}
