use clap::Parser;
use tracing_subscriber::EnvFilter;
use trucks_barges_coach::{attachments, repl, Cli, Coach, Command, GeminiGateway};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trucks_barges_coach=warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if cli.command == Some(Command::Topics) {
        repl::print_topics();
        return Ok(());
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let gateway = GeminiGateway::new(cli.gemini_config())?;
    tracing::info!(model = gateway.model(), "starting reflection session");

    let mut coach = Coach::new(gateway, cli.coach_config());
    for image in attachments::load_images(cli.images.as_slice())? {
        coach.attach_image(image);
    }

    repl::run(&rt, &mut coach)
}
