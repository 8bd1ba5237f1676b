pub mod flashcard;
pub mod review_session;
pub mod review_state;
pub mod sm2;
pub mod workout;

pub use flashcard::Flashcard;
pub use review_session::{ReviewSession, SessionCard};
pub use review_state::{Grade, ReviewState};
pub use sm2::{ReviewScheduler, Sm2Scheduler};
pub use workout::{Exercise, Workout, WorkoutSet};
