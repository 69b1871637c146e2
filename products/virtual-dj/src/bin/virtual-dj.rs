use {
    clap::Parser,
    dj_base::log,
    std::process::ExitCode,
    virtual_dj::Cli,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match virtual_dj::run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("virtual-dj: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
