use clap::Parser;
use eyre::{Context, Result};
use pullup_client::domain::Registration;
use pullup_client::utils::{read_input, read_input_hidden};
use pullup_client::ApiProvider;
use pullup_common::domain::Role;

#[derive(Parser, Debug)]
#[clap(infer_subcommands = true)]
pub struct Cmd {
    #[arg(short, long)]
    name: Option<String>,
    #[arg(short, long)]
    email: Option<String>,
    #[arg(short, long)]
    password: Option<String>,
    /// Register an organization instead of a student
    #[arg(long)]
    org: bool,
    /// What the organization is about
    #[arg(long, requires = "org")]
    description: Option<String>,
}

impl Cmd {
    pub async fn run(self, api: &ApiProvider) -> Result<()> {
        let name = match self.name {
            Some(v) => v,
            None => read_input("name")?,
        };
        let email = match self.email {
            Some(v) => v,
            None => read_input("email")?,
        };
        let password = match self.password {
            Some(v) => v,
            None => read_input_hidden("password")?,
        };

        let registration = Registration {
            role: if self.org { Role::Org } else { Role::Student },
            name,
            email,
            password,
            description: self.description,
        };

        let session = api
            .register(&registration)
            .await
            .wrap_err("Failed to register")?;
        super::login::greet(session.user.as_ref());

        Ok(())
    }
}
