//! In-process poll registry with linearizable operations.
//!
//! The registry manages polls, their per-option vote tallies, and per-user
//! vote eligibility, all behind a single lock so that every operation is
//! atomic with respect to every other. Each module focuses on a concrete
//! responsibility:
//!
//! - [`poll`] defines the `Poll` entity: a question, its ordered option
//!   labels, and a creation timestamp.
//! - [`registry`] provides [`registry::PollRegistry`], the concurrent state
//!   manager, and [`registry::RegistryError`] for its failure modes.
//! - [`cli`] parses the command-line interface for the demo driver.
//!
//! The binary in `main.rs` is a thin driver that walks the registry through
//! a scripted scenario and a burst of concurrent voters, printing each
//! outcome. Integration and unit tests use this crate directly to exercise
//! the registry's state transitions.

pub mod cli;
pub mod poll;
pub mod registry;
