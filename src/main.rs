#[tokio::main]
async fn main() {
    if let Err(e) = clinic_backend::run().await {
        eprintln!("fatal: {}", e);
        std::process::exit(1);
    }
}
