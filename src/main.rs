mod actions;
mod directory;

use actions::ActionContext;
use chrono::Local;
use clap::{Parser, Subcommand};
use directory::StaticDirectory;
use hubot_calamari::{query::leave_list, shared_cache, Calamari};
use hubot_core::{
    config::{self, Config, HubotConfig},
    error::HubotError,
    message::{ChatMessage, User},
    traits::WorkerContext,
};
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hubot", version, about = "Hubot: who is on leave today")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a message as if it came from chat and print Hubot's reply.
    Ask {
        /// Slug of the user posting the message.
        #[arg(long, default_value = "user-guest")]
        actor: String,
        /// Thread the message is posted in.
        #[arg(long, default_value = "thread-cli")]
        thread: String,
        /// The message to post.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// List everyone in the org on leave today.
    Leave,
    /// Prefetch upcoming leave for everyone in the org.
    Warm,
    /// Show configuration and directory summary.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _guard = init_tracing(&cfg.hubot);

    let directory = StaticDirectory::new(cfg.users.clone()).with_bot(&cfg.hubot.bot_slug);
    let calamari = Calamari::from_config(&cfg.leave, shared_cache(cfg.leave.cache_capacity));
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Ask {
            actor,
            thread,
            message,
        } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: hubot ask <message>");
            }
            if !cfg.leave.is_configured() {
                warn!("Calamari is not configured, leave answers will be empty");
            }

            let ctx = ActionContext {
                worker: &directory,
                calamari: &calamari,
                config: &cfg,
                today,
            };
            let actor_id = match directory.get_user_by_slug(&actor).await? {
                Some(user) => user.id,
                None => {
                    warn!(actor = %actor, "actor is not in the directory");
                    actor
                }
            };
            let message = ChatMessage::new(&actor_id, &thread, &message.join(" "));
            let whispers = actions::handle(&ctx, &message).await?;
            if whispers.is_empty() {
                eprintln!("({} has nothing to say)", cfg.hubot.name);
            }
            for whisper in whispers {
                println!("{}", whisper.message);
            }
        }
        Commands::Leave => {
            require_calamari(&cfg)?;
            let users = org_users(&directory, &cfg).await?;
            println!("{}", leave_list(&calamari, &users, today).await);
        }
        Commands::Warm => {
            require_calamari(&cfg)?;
            let users = org_users(&directory, &cfg).await?;
            calamari.update_leave(&users, today).await;
            println!(
                "Cached leave for {} of {} users",
                calamari.cache().lock().await.len(),
                users.len()
            );
        }
        Commands::Status => {
            println!("{} Status Check\n", cfg.hubot.name);
            println!("Config: {}", cli.config);
            println!("Bot user: {}", cfg.hubot.bot_slug);
            println!("Org: {} (@{})", cfg.org.slug, cfg.org.email_domain);
            println!();
            println!(
                "  calamari: {}",
                if cfg.leave.is_configured() {
                    "configured"
                } else {
                    "missing instance or token"
                }
            );
            println!("  api: {}", cfg.leave.api_base_url());
            println!(
                "  retries: {} x {}ms",
                cfg.leave.max_retries, cfg.leave.retry_delay_ms
            );
            println!("  cache capacity: {} users", cfg.leave.cache_capacity);
            println!();

            let users = org_users(&directory, &cfg).await?;
            println!(
                "  directory: {} users, {} in {}",
                directory.users().len(),
                users.len(),
                cfg.org.slug
            );
        }
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
///
/// When a log directory is configured, logs go to a daily rolling file there;
/// the returned guard must be held until exit so buffered lines are flushed.
fn init_tracing(cfg: &HubotConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    if cfg.log_dir.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(config::shellexpand(&cfg.log_dir), "hubot.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn require_calamari(cfg: &Config) -> Result<(), HubotError> {
    if !cfg.leave.is_configured() {
        return Err(HubotError::Leave(format!(
            "Calamari is not configured. Set instance and token under [leave] in the config \
             file, or the {} and {} env vars.",
            config::ENV_CALAMARI_INSTANCE,
            config::ENV_CALAMARI_TOKEN
        )));
    }
    Ok(())
}

async fn org_users(
    directory: &StaticDirectory,
    cfg: &Config,
) -> anyhow::Result<Vec<User>> {
    Ok(actions::org_users(directory, &cfg.org, &cfg.hubot.bot_slug, None).await?)
}
