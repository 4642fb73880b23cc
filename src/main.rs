use waterfall::cli;

fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "waterfall=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let code = match cli::parse_args(std::env::args().skip(1)).and_then(cli::run) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };
    std::process::exit(code);
}
