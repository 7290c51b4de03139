mod adapter;
mod api;
mod handles;
mod host;
mod presentation;
mod setup;
mod supervisor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    host::run().await
}
