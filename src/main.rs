#[tokio::main]
async fn main() {
    infra_classifier_lib::init_tracing();

    if let Err(e) = infra_classifier_lib::run().await {
        tracing::error!("Fatal: {e}");
        std::process::exit(1);
    }
}
