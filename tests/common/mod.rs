#![allow(dead_code)]

pub use syncgraph_test_utils::builders;
pub use syncgraph_test_utils::fake_resource;
pub use syncgraph_test_utils::{init_tracing, with_timeout};

use std::sync::Arc;

use syncgraph::Resource;
use syncgraph_test_utils::fake_resource::FakeResource;

/// Upcast a list of fakes for `Engine::sync`.
pub fn resources(fakes: Vec<FakeResource>) -> Vec<Arc<dyn Resource>> {
    fakes.into_iter().map(FakeResource::into_dyn).collect()
}
