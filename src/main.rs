#[tokio::main]
async fn main() {
    if let Err(err) = taskboard::app::run().await {
        eprintln!("taskboard failed: {}", err);
        std::process::exit(1);
    }
}
