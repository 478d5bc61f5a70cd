//! Binary entrypoint for `blcli`.

#[tokio::main(flavor = "current_thread")]
async fn main() {
    std::process::exit(blcli::run().await);
}
