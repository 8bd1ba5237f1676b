//! Flashcard is a pair <front, back> plus its SM-2 scheduling state
use super::ReviewState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    pub review: ReviewState,
}

impl Flashcard {
    /// A never-reviewed card, due on `created_on`.
    pub fn new(front: impl Into<String>, back: impl Into<String>, created_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            front: front.into(),
            back: back.into(),
            review: ReviewState::new(created_on),
        }
    }
}
