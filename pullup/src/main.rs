use clap::Parser;
use eyre::Result;
use pullup::command::PullupCmd;
use pullup::VERSION;

#[derive(Parser)]
#[command(
    author = "Sam Uherek",
    version = VERSION,
    about = "Browse and pull up to campus events",
    )]
struct Pullup {
    #[command(flatten)]
    options: pullup::command::Options,

    #[command(subcommand)]
    pullup: PullupCmd,
}

impl Pullup {
    fn run(self) -> Result<()> {
        self.pullup.run(self.options)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    Pullup::parse().run()
}
