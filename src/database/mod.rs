pub mod db;
pub mod flashcards;
pub mod workouts;
