use clap::Parser;
use eyre::Result;
use pullup_client::domain::{Credentials, User};
use pullup_client::utils::{read_input, read_input_hidden};
use pullup_client::ApiProvider;
use pullup_common::domain::Role;

#[derive(Parser, Debug)]
#[clap(infer_subcommands = true)]
pub struct Cmd {
    #[arg(long, short)]
    pub email: Option<String>,
    #[arg(long, short)]
    pub password: Option<String>,
    /// Log in as an organization instead of a student
    #[arg(long)]
    pub org: bool,
}

pub(crate) fn greet(user: Option<&User>) {
    match user {
        Some(user) => println!("Logged in as {}!", user.display_name),
        None => println!("Logged in!"),
    }
}

impl Cmd {
    pub async fn run(self, api: &ApiProvider) -> Result<()> {
        if api.is_logged_in() {
            println!("You are already logged in.");
            return Ok(());
        }

        let email = match self.email {
            Some(v) => v,
            None => read_input("email")?,
        };
        let password = match self.password {
            Some(v) => v,
            None => read_input_hidden("password")?,
        };

        let credentials = Credentials {
            role: if self.org { Role::Org } else { Role::Student },
            email,
            password,
        };

        let session = api.login(&credentials).await?;
        greet(session.user.as_ref());

        Ok(())
    }
}
