// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod cascade;
pub mod dial_plan;
pub mod model;
pub mod options;
pub mod password;
pub mod phone;
pub mod state;

pub use cascade::*;
pub use dial_plan::*;
pub use model::*;
pub use options::*;
pub use password::*;
pub use phone::*;
pub use state::*;
