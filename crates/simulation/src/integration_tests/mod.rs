//! Cross-system scenario tests driving the public surface: the plugin, the
//! `FixedUpdate` step, player actions, and the snapshot record.

mod amortization;
mod budget_cycle;
mod fire_response;
mod growth;
mod harness;
mod power_equivalence;

pub use harness::TestCity;
