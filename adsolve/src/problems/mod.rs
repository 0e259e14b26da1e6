//! Concrete [`crate::model::ProblemModel`] instantiations.

pub mod all_interval;
pub mod langford;
pub mod quasigroup;
pub mod qwh;
pub mod smti;

pub use all_interval::AllIntervalModel;
pub use langford::{LangfordSkolemModel, Variant as LangfordVariant};
pub use quasigroup::QuasigroupModel;
pub use qwh::{CellKind, Qwh};
pub use smti::SmtiModel;
