// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod aggregate;
pub mod model;
pub mod route;
pub mod state;
pub mod threshold;
pub mod view;

pub use aggregate::*;
pub use model::*;
pub use route::*;
pub use state::*;
pub use threshold::*;
pub use view::*;
