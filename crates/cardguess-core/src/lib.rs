#![deny(warnings)]
//! Rules, match flow and opponent modelling for a two-player card-guessing
//! bargaining game.

pub mod belief;
pub mod game;
pub mod model;
