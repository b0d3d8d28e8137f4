// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod error;
pub mod filter;
pub mod money;
pub mod query;
pub mod record;
pub mod render;
pub mod state;
pub mod view;

pub use error::*;
pub use filter::*;
pub use money::*;
pub use query::*;
pub use record::*;
pub use render::*;
pub use state::*;
pub use view::*;
