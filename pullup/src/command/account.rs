use clap::Parser;
use eyre::Result;
use pullup_client::ApiProvider;

mod login;
mod logout;
mod register;

#[derive(Parser, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    Login(login::Cmd),
    Register(register::Cmd),
    /// Log in with a CAS ticket
    Cas { ticket: String },
    Logout,
    /// Who the server thinks you are
    Status,
}

impl Cmd {
    pub(crate) async fn run(self, api: &ApiProvider) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.run(api).await,
            Self::Register(cmd) => cmd.run(api).await,
            Self::Cas { ticket } => {
                let session = api.cas_login(&ticket).await?;
                login::greet(session.user.as_ref());
                Ok(())
            }
            Self::Logout => logout::run(api).await,
            Self::Status => {
                if !api.is_logged_in() {
                    println!("You are not logged in.");
                    return Ok(());
                }
                let user = api.current_user().await?;
                let kind = if user.is_organization {
                    "organization"
                } else {
                    "student"
                };
                println!("{} (@{}), {kind} {}", user.display_name, user.username, user.id);
                Ok(())
            }
        }
    }
}
