use anyhow::Result;

fn main() -> Result<()> {
    poolchain::cli::run()
}
