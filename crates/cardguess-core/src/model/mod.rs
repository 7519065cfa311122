pub mod action;
pub mod bankroll;
pub mod card;
pub mod deck;
pub mod guess;
pub mod participant;
pub mod player;
pub mod round;
pub mod settlement;
