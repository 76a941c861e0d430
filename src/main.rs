use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = loadmark::cli::Cli::parse();
    if let Err(e) = loadmark::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
