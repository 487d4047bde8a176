use clap::Parser;
use eyre::Result;
use pullup_client::domain::{Comment, Vote};
use pullup_client::ApiProvider;

#[derive(Parser, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    List {
        event_id: String,
    },
    Add {
        event_id: String,
        text: String,
    },
    /// Vote on a comment. Voting the same way twice takes the vote back.
    Vote {
        comment_id: String,
        #[arg(long)]
        down: bool,
    },
}

pub(crate) fn print_comment(comment: &Comment) {
    let mine = match comment.user_vote {
        Some(Vote::Up) => " (you +1)",
        Some(Vote::Down) => " (you -1)",
        None => "",
    };
    println!(
        "{:>5}  {:+} @{}: {}{mine}",
        comment.id,
        comment.score(),
        comment.username,
        comment.text
    );
}

impl Cmd {
    pub(crate) async fn run(self, api: &ApiProvider) -> Result<()> {
        match self {
            Self::List { event_id } => {
                let comments = api.comments(&event_id).await?;
                if comments.is_empty() {
                    println!("No comments yet.");
                }
                for c in &comments {
                    print_comment(c);
                }
            }
            Self::Add { event_id, text } => {
                let comment = api.add_comment(&event_id, &text).await?;
                print_comment(&comment);
            }
            Self::Vote { comment_id, down } => {
                let vote = if down { Vote::Down } else { Vote::Up };
                let comment = api.toggle_comment_vote(&comment_id, vote).await?;
                print_comment(&comment);
            }
        }

        Ok(())
    }
}
