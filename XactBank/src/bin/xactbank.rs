fn main() -> anyhow::Result<()> {
    xactbank::cli::run_cli()
}
