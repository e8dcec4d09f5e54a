//! Text front-ends that produce logical plans.

pub mod yaml;
