fn main() -> color_eyre::eyre::Result<()> {
    vault_template::cli::main()
}
