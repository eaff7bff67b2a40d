#![warn(missing_docs)]

//! # `rulerift`
//!
//! The rules engine and computer opponents of Rule Rift, a two-player duel on an N×N grid.
//! Players take turns writing numbers `1..=N` into empty cells so that no row or column repeats a number
//! and every inequality printed between two neighboring cells holds once both are filled.
//! Once per game, instead of writing a number, a player may block an empty cell for good,
//! provided no blocked cell touches it and the unblocked cells stay connected.
//! The first side with no legal move loses.
//!
//! Begin by building a board with a [`LevelBuilder`](builder::LevelBuilder).
//! [`legal_moves`](moves::legal_moves) and the predicates in [`rules`] answer what may be played;
//! a [`Strategy`](strategy::Strategy) picks a move for the computer-controlled side.
//!
//! # Internals
//! Connectivity is the interesting part of the rules. The unblocked cells are viewed as a graph with an edge between orthogonal neighbors,
//! and a cell may only be blocked if it is not an articulation point ("cut vertex") of that graph.
//! [`Structure`](graph::Structure) computes the graph and its articulation points in one depth-first pass (Tarjan's low-link algorithm),
//! so move generation can check every candidate block of a position against one precomputed set.
//!
//! Strategies explore hypothetical moves by writing them into the board and reverting them on the way out,
//! instead of copying the board for every candidate; a move applied this way is undone when its guard is dropped,
//! whichever way the search leaves the branch.

pub use board::Board;
pub use builder::LevelBuilder;
pub use cell::{Cell, Relation, Value};
pub use game::Tokens;
pub use location::Location;
pub use moves::Move;
pub use shape::SquareStep;
pub use strategy::Strategy;

pub(crate) mod board;
mod tests;
pub(crate) mod location;
pub(crate) mod cell;
pub mod shape;
pub mod builder;
pub mod rules;
pub mod graph;
pub mod moves;
pub mod game;
pub mod strategy;
