#[derive(Debug, Clone, clap::Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    #[arg(help = "PEM certificate bundle used to validate the API server")]
    cacert: String,

    #[arg(short, long, default_value = "false")]
    #[arg(help = "Print the pretty-printed best stories list instead of titles")]
    raw: bool,

    #[arg(short, long, default_value = "false")]
    #[arg(help = "Log to console")]
    log_to_console: bool,
}

fn run(args: &Args) -> anyhow::Result<()> {
    if args.raw {
        let body = hackernews::get_raw_best_stories(&args.cacert)?;
        println!("{}", body);
        return Ok(());
    }

    let titles = hackernews::get_titles(&args.cacert)?;
    tracing::info!(num_titles = titles.len(), "Got titles");
    for title in titles {
        println!("{}", title);
    }

    Ok(())
}

fn main() -> std::process::ExitCode {
    use clap::Parser;
    let args = Args::parse();

    let config = hackernews::config::config();
    let _guard = hackernews::logging::init(
        config.log_to_console || args.log_to_console,
        config.log_dir.as_deref(),
    );

    tracing::info!(config =? config, args =? args, "Starting hackernews");

    match run(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error =? e, "Error when fetching best stories");
            eprintln!("Error: {:#}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
