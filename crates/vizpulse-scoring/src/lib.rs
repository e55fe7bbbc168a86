//! Social and review scoring for vizpulse.
//!
//! Folds per-channel social metrics into an aggregate, classifies each
//! aggregate metric into a fixed [`Band`], maps bands to dashboard microcopy,
//! and picks the single next action shown alongside a review snapshot. Every
//! function here is pure; thresholds are fixed policy constants.

pub mod aggregate;
pub mod bands;
pub mod microcopy;
pub mod next_action;
pub mod types;

pub use aggregate::aggregate_social;
pub use bands::score_social;
pub use microcopy::social_microcopy;
pub use next_action::next_action;
pub use types::{Band, BandSet, NextAction, PhraseSet, SocialAggregate};
