pub mod impact;

pub use impact::{compute_impacts, CoderImpact, WINDOW_BOUND};
