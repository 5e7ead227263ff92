//! Command dispatch
//!
//! Data commands all go through [`Session::client`], which makes sure an
//! access key is set up before a package manager is built.

use anyhow::Result;
use std::io::Write;

use crate::auth::Authenticator;
use crate::cli::Commands;
use crate::credentials::SecretStore;
use crate::launcher::UriLauncher;
use crate::package::ClientFactory;
use crate::prompt::Prompt;
use crate::registry::SearchQuery;

pub mod configure;
pub mod info;
pub mod install;
pub mod list;
pub mod outdated;
pub mod search;
pub mod uninstall;
pub mod update;

pub struct Session<S, P, L, F> {
    auth: Authenticator<S, P, L>,
    factory: F,
}

impl<S, P, L, F> Session<S, P, L, F>
where
    S: SecretStore,
    P: Prompt,
    L: UriLauncher,
    F: ClientFactory,
{
    pub fn new(auth: Authenticator<S, P, L>, factory: F) -> Self {
        Self { auth, factory }
    }

    pub fn auth(&self) -> &Authenticator<S, P, L> {
        &self.auth
    }

    /// Ensure an access key is configured, then connect with it.
    ///
    /// A user who skips setup still gets a client; the registry decides
    /// what an anonymous caller may do.
    pub async fn client<W: Write>(&self, out: &mut W) -> Result<F::Client> {
        let credential = self.auth.ensure_authenticated(out).await?;
        if credential.is_none() {
            tracing::debug!("continuing without an access key");
        }
        self.factory.connect(credential)
    }

    pub async fn run<W: Write>(&self, command: Commands, out: &mut W) -> Result<()> {
        match command {
            Commands::Configure => configure::run(&self.auth, out).await,
            Commands::Logout => configure::logout(&self.auth, out),
            Commands::List => {
                let client = self.client(out).await?;
                list::run(&client, out).await
            }
            Commands::Outdated => {
                let client = self.client(out).await?;
                outdated::run(&client, out).await
            }
            Commands::Install { package, version } => {
                let client = self.client(out).await?;
                install::run(&client, &package, version.as_deref(), out).await
            }
            Commands::Update { package, version } => {
                let client = self.client(out).await?;
                update::run(&client, &package, version.as_deref(), out).await
            }
            Commands::Uninstall { package } => {
                let client = self.client(out).await?;
                uninstall::run(&client, &package, out).await
            }
            Commands::Search {
                query,
                sort,
                direction,
            } => {
                let client = self.client(out).await?;
                let query = SearchQuery {
                    text: query,
                    sort,
                    direction,
                };
                search::run(&client, &query, out).await
            }
            Commands::Info { package } => {
                let client = self.client(out).await?;
                info::run(&client, &package, out).await
            }
        }
    }
}
