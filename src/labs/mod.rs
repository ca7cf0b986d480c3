//! # Labs
//!
//! Small self-contained numeric and puzzle exercises. None of them share state;
//! each exposes plain functions over plain data so the CLI can drive them with
//! values from the config file or from flags.
//!
//! ## Components
//!
//! - [`sir`] - Discrete-time SIR epidemic simulation
//! - [`algebra`] - 3-D vector helpers and a tiny expression type
//! - [`newton`] - Newton's method iteration table and root finder
//! - [`sequence`] - Recursive sequence iteration with a console dot plot
//! - [`distribution`] - Sampling distribution of the mean or median
//! - [`cipher`] - Substitution cipher
//! - [`draw`] - Shuffled group draw with neighbour matchups

pub mod algebra;
pub mod cipher;
pub mod distribution;
pub mod draw;
pub mod newton;
pub mod sequence;
pub mod sir;
