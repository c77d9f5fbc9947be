use clap::Parser;
use vi_registro::cli::{BancadaCommand, Cli, Commands, OiCommand};
use vi_registro::commands::{self, oi::NewOiArgs, Context};
use vi_registro::config::Config;
use vi_registro::error::Result;
use vi_registro::logging::{init_logging, Verbosity};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(Verbosity::from_count(cli.verbose));

    if let Err(e) = run(cli).await {
        tracing::debug!("{:?}", e);
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => Config::default_dir()?,
    };
    let mut ctx = Context::load(config_dir)?;

    match cli.command {
        Commands::Login {
            username,
            banco,
            password,
        } => commands::auth::login(&mut ctx, username, banco, password).await,

        Commands::Logout => commands::auth::logout(&ctx),

        Commands::Whoami => commands::auth::whoami(&ctx),

        Commands::Catalogs => commands::auth::catalogs(&ctx).await,

        Commands::Oi { command } => match command {
            OiCommand::New {
                code,
                q3,
                alcance,
                pma,
            } => {
                let args = NewOiArgs {
                    code,
                    q3,
                    alcance,
                    pma,
                };
                commands::oi::create(&ctx, args).await
            }
            OiCommand::List => commands::oi::list(&ctx).await,
            OiCommand::Open { id } => commands::oi::open(&ctx, id).await,
            OiCommand::Show { id } => commands::oi::show(&ctx, id).await,
            OiCommand::Close => commands::oi::close(&ctx),
        },

        Commands::Bancada { command } => match command {
            BancadaCommand::Add { input } => commands::bancada::add(&ctx, input).await,
            BancadaCommand::Edit { id, input } => commands::bancada::edit(&ctx, id, input).await,
            BancadaCommand::Delete { id, yes } => commands::bancada::delete(&ctx, id, yes).await,
            BancadaCommand::Preview { id, class } => {
                commands::bancada::preview(&ctx, id, class).await
            }
        },

        Commands::Excel {
            oi,
            password,
            output,
        } => commands::excel::generate(&ctx, oi, password, output)
            .await
            .map(|_| ()),

        Commands::Config { set_api_url, show } => {
            commands::settings::run(&mut ctx, set_api_url, show)
        }
    }
}
