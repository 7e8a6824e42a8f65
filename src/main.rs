#[tokio::main]
async fn main() {
    if let Err(e) = battle_server::run_with_config().await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}
