use anyhow::Result;

fn main() -> Result<()> {
    aictx::cli::run()
}
