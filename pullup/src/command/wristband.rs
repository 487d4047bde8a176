use clap::Parser;
use eyre::Result;
use pullup_client::domain::QrWristband;
use pullup_client::normalize::local_now;
use pullup_client::ApiProvider;

#[derive(Parser, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    /// Get the entry wristband for an event you pulled up to
    Generate { event_id: String },
    /// Check a scanned wristband code
    Validate { code: String },
    /// Your wristbands
    List,
}

fn print_wristband(wristband: &QrWristband) {
    println!(
        "event {:>5}  {}  {}",
        wristband.event_id,
        wristband.code,
        wristband.remaining_label(local_now())
    );
}

impl Cmd {
    pub(crate) async fn run(self, api: &ApiProvider) -> Result<()> {
        match self {
            Self::Generate { event_id } => {
                let wristband = api.generate_wristband(&event_id).await?;
                print_wristband(&wristband);
            }
            Self::Validate { code } => {
                let res = api.validate_wristband(&code).await?;
                if res.is_valid {
                    println!(
                        "Valid: student {} for event {}",
                        res.user_id.as_deref().unwrap_or("?"),
                        res.event_id.as_deref().unwrap_or("?")
                    );
                } else {
                    println!(
                        "Invalid: {}",
                        res.message.as_deref().unwrap_or("wristband not recognised")
                    );
                }
            }
            Self::List => {
                let wristbands = api.wristbands().await?;
                if wristbands.is_empty() {
                    println!("No wristbands.");
                }
                for w in &wristbands {
                    print_wristband(w);
                }
            }
        }

        Ok(())
    }
}
