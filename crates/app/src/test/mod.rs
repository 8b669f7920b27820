//! Test support shared by the app modules.

mod helpers;

pub(crate) use fakes::FakeCarts;
pub(crate) use helpers::*;
