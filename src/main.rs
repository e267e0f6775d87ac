mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use fitfolio::config::{ConfigError, FirebaseConfig};
use fitfolio::error::AppError;
use fitfolio::events::{App, UiEvent};
use fitfolio::identity::firebase::FirebaseAuthClient;
use fitfolio::payload::SelectedFile;
use fitfolio::store::firestore::FirestoreClient;
use fitfolio::ui::{Surface, ids};
use tracing_subscriber::EnvFilter;

use terminal::TerminalSurface;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("missing {0}; pass --{0} or set FITFOLIO_{1}")]
    MissingCredential(&'static str, &'static str),
    #[error(transparent)]
    App(#[from] AppError),
}

#[derive(Parser, Debug)]
#[command(name = "fitfolio", about = "Fitness profile and progress-photo client")]
struct Cli {
    #[arg(long, global = true, env = "FITFOLIO_EMAIL")]
    email: Option<String>,

    #[arg(long, global = true, env = "FITFOLIO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and its profile document.
    Signup {
        #[arg(long)]
        name: String,
    },
    /// Check credentials.
    Login,
    Profile(ProfileCommand),
    Photos(PhotosCommand),
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    /// Replace the stored goal.
    Goal { goal: String },
}

#[derive(Args, Debug)]
struct PhotosCommand {
    #[command(subcommand)]
    command: PhotosSubcommand,
}

#[derive(Subcommand, Debug)]
enum PhotosSubcommand {
    List,
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    Delete {
        index: usize,
    },
    /// Print the full data URL of one photo.
    Show {
        index: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FirebaseConfig::from_env()?;
    let provider = Arc::new(FirebaseAuthClient::new(&config).map_err(AppError::from)?);
    let store = Arc::new(FirestoreClient::new(&config).map_err(AppError::from)?);
    let surface = Arc::new(TerminalSurface::new());
    let mut app = App::new(provider, store, surface.clone());

    let email = cli
        .email
        .ok_or(CliError::MissingCredential("email", "EMAIL"))?;
    let password = cli
        .password
        .ok_or(CliError::MissingCredential("password", "PASSWORD"))?;

    if let Command::Signup { name } = &cli.command {
        fill(surface.as_ref(), &[(ids::SIGNUP_NAME, name), (ids::SIGNUP_EMAIL, &email), (ids::SIGNUP_PASSWORD, &password)]);
        app.dispatch(UiEvent::SignupSubmitted).await?;
        return Ok(());
    }

    fill(surface.as_ref(), &[(ids::LOGIN_EMAIL, &email), (ids::LOGIN_PASSWORD, &password)]);
    app.dispatch(UiEvent::LoginSubmitted).await?;

    match cli.command {
        Command::Signup { .. } | Command::Login => Ok(()),
        Command::Profile(profile) => run_profile(&mut app, surface.as_ref(), profile).await,
        Command::Photos(photos) => run_photos(&mut app, photos).await,
    }
}

fn fill(surface: &dyn Surface, values: &[(&str, &String)]) {
    for (id, value) in values {
        let _ = surface.set_field_value(id, value);
    }
}

async fn run_profile(app: &mut App, surface: &dyn Surface, cmd: ProfileCommand) -> Result<(), CliError> {
    match cmd.command {
        ProfileSubcommand::Show => {
            app.profiles().load_profile(surface).await?;
            for id in [ids::USERNAME, ids::EMAIL, ids::GOAL] {
                let value = surface.field_value(id).map_err(AppError::from)?;
                println!("{id}: {value}");
            }
        }
        ProfileSubcommand::Goal { goal } => {
            let _ = surface.set_field_value(ids::GOAL, &goal);
            app.dispatch(UiEvent::SaveProfileClicked).await?;
        }
    }
    Ok(())
}

async fn run_photos(app: &mut App, cmd: PhotosCommand) -> Result<(), CliError> {
    app.gallery_mut().load().await?;
    match cmd.command {
        PhotosSubcommand::List => {}
        PhotosSubcommand::Add { files } => {
            let files = files.iter().map(SelectedFile::from_path).collect();
            app.dispatch(UiEvent::SavePhotosClicked(files)).await?;
        }
        PhotosSubcommand::Delete { index } => {
            app.dispatch(UiEvent::DeletePhotoClicked(index)).await?;
        }
        PhotosSubcommand::Show { index } => {
            app.dispatch(UiEvent::PhotoClicked(index)).await?;
        }
    }
    Ok(())
}
