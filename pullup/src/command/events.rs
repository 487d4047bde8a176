use clap::Parser;
use eyre::{eyre, Result};
use futures_util::future::try_join;
use pullup_client::domain::{Event, EventFilters, NewEvent};
use pullup_client::normalize::{parse_backend_date, parse_backend_time, PLACEHOLDER_IMAGE};
use pullup_client::utils::read_input_hidden;
use pullup_client::ApiProvider;
use time::macros::format_description;
use time::PrimitiveDateTime;

use super::comments::print_comment;

#[derive(Parser, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    /// List events
    List {
        /// Only private events
        #[arg(long, conflicts_with = "public")]
        private: bool,
        /// Only public events
        #[arg(long)]
        public: bool,
        /// Only events of this organization
        #[arg(long)]
        org: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        /// Events you pulled up to
        #[arg(long, conflicts_with = "organized")]
        mine: bool,
        /// Events your organization created
        #[arg(long)]
        organized: bool,
    },
    /// Show one event with its comments
    Show { id: String },
    /// Pull up to an event, or leave it again
    Pullup {
        id: String,
        /// Passcode of a private event
        #[arg(long, short)]
        password: Option<String>,
    },
    /// Create an event for your organization
    Create {
        #[arg(long, short)]
        title: String,
        #[arg(long, short, default_value = "")]
        description: String,
        #[arg(long, short, default_value = "")]
        location: String,
        /// MM/DD/YYYY
        #[arg(long)]
        date: String,
        /// e.g. "7:30 PM"
        #[arg(long)]
        time: String,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        private: bool,
        #[arg(long, short)]
        password: Option<String>,
    },
    Delete { id: String },
    /// Who pulled up to an event
    Attendees { id: String },
    /// Confirm, or with --undo unconfirm, a student's registration
    Confirm {
        event_id: String,
        student_id: String,
        #[arg(long)]
        undo: bool,
    },
    /// Save or unsave an event
    Save { id: String },
}

pub(crate) fn when(date_time: PrimitiveDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short] [month repr:short] [day padding:none], [hour repr:12 padding:none]:[minute] [period]"
    );
    date_time
        .format(&format)
        .unwrap_or_else(|_| date_time.to_string())
}

fn print_event(event: &Event) {
    let lock = if event.is_private { " [private]" } else { "" };
    let going = if event.user_pulled_up { " *" } else { "" };
    println!(
        "{:>5}  {}{lock}{going}\n       {} @ {} by {}, {} pulling up",
        event.id,
        event.title,
        when(event.date_time),
        event.location,
        event.organizer_name,
        event.pull_up_count
    );
}

fn print_event_details(event: &Event) {
    print_event(event);
    if !event.description.is_empty() {
        println!("\n{}", event.description);
    }
    if event.image_url != PLACEHOLDER_IMAGE {
        println!("\nImage: {}", event.image_url);
    }
}

fn parse_date_time(date: &str, time: &str) -> Result<PrimitiveDateTime> {
    let date = parse_backend_date(date).map_err(|e| eyre!(e))?;
    let time = parse_backend_time(time).map_err(|e| eyre!(e))?;
    Ok(PrimitiveDateTime::new(date, time))
}

impl Cmd {
    pub(crate) async fn run(self, api: &ApiProvider) -> Result<()> {
        match self {
            Self::List {
                private,
                public,
                org,
                limit,
                offset,
                mine,
                organized,
            } => {
                let events = if mine {
                    api.user_events().await?
                } else if organized {
                    api.organization_events().await?
                } else {
                    let filters = EventFilters {
                        is_private: match (private, public) {
                            (true, _) => Some(true),
                            (_, true) => Some(false),
                            _ => None,
                        },
                        organization_id: org,
                        limit,
                        offset,
                    };
                    api.events(&filters).await?
                };

                if events.is_empty() {
                    println!("No events found.");
                }
                for event in &events {
                    print_event(event);
                }
            }
            Self::Show { id } => {
                let (event, comments) = try_join(api.event(&id), api.comments(&id)).await?;
                let event = event.ok_or_else(|| eyre!("No event with id {id}"))?;

                print_event_details(&event);
                if !comments.is_empty() {
                    println!("\nComments:");
                }
                for comment in &comments {
                    print_comment(comment);
                }
            }
            Self::Pullup { id, password } => {
                let event = api
                    .event(&id)
                    .await?
                    .ok_or_else(|| eyre!("No event with id {id}"))?;
                let registered = event.user_pulled_up;
                let actor = api
                    .claims()
                    .map(|c| c.actor_id.to_string())
                    .unwrap_or_default();

                let password = match password {
                    Some(p) => Some(p),
                    None if !registered && event.requires_password_from(&actor) => {
                        Some(read_input_hidden("event password")?)
                    }
                    None => None,
                };

                let event = api
                    .toggle_pull_up(&id, registered, password.as_deref())
                    .await?;
                if event.user_pulled_up {
                    println!("You are pulling up to {}!", event.title);
                } else {
                    println!("You are no longer pulling up to {}.", event.title);
                }
            }
            Self::Create {
                title,
                description,
                location,
                date,
                time,
                image_url,
                private,
                password,
            } => {
                let password = match password {
                    None if private => Some(read_input_hidden("event password")?),
                    other => other,
                };
                let new = NewEvent {
                    title,
                    description,
                    location,
                    date_time: parse_date_time(&date, &time)?,
                    image_url,
                    is_private: private,
                    event_password: password,
                };

                let event = api.create_event(&new).await?;
                println!("Created event {}", event.id);
                print_event(&event);
            }
            Self::Delete { id } => {
                api.delete_event(&id).await?;
                println!("Deleted event {id}");
            }
            Self::Attendees { id } => {
                let attendees = api.event_attendees(&id).await?;
                if attendees.is_empty() {
                    println!("Nobody is pulling up yet.");
                }
                for a in attendees {
                    let mark = if a.is_confirmed { "confirmed" } else { "pending" };
                    println!("{:>5}  {} (@{}) {mark}", a.user_id, a.display_name, a.username);
                }
            }
            Self::Confirm {
                event_id,
                student_id,
                undo,
            } => {
                let attendee = api
                    .update_attendee_registration(&event_id, &student_id, !undo)
                    .await?;
                let state = if attendee.is_confirmed {
                    "confirmed"
                } else {
                    "unconfirmed"
                };
                println!("{} is {state} for event {}", attendee.display_name, attendee.event_id);
            }
            Self::Save { id } => {
                let event = api.toggle_saved(&id).await?;
                println!("Toggled saved for {}", event.title);
            }
        }

        Ok(())
    }
}
