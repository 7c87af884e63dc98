pub mod context;
pub mod lifecycle;

pub use lifecycle::{run_check, run_list, run_sync, Command};

pub async fn run(command: Command) -> anyhow::Result<()> {
    lifecycle::run(command).await
}
