pub mod attendee;
pub mod comment;
pub mod event;
pub mod user;
pub mod wristband;

pub use attendee::Attendee;
pub use comment::{Comment, Vote};
pub use event::{Event, EventFilters, EventUpdate, NewEvent};
pub use user::{Credentials, ProfileUpdate, Registration, Session, User};
pub use wristband::{QrWristband, WristbandValidation};
