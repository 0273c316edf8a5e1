use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use syncgraph::engine::SyncContext;
use syncgraph::resource::{
    BoxFuture, Dependency, FieldError, FieldValue, Fields, Resource, ResourceBase,
};

/// A call observed on a [`FakeResource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Update(String),
    Delete(String),
}

/// Shared, ordered record of calls across a set of fake resources.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }

    pub fn updated(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(name) => Some(name),
                Call::Delete(_) => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(name) => Some(name),
                Call::Update(_) => None,
            })
            .collect()
    }
}

/// Tracks how many fake updates run at the same time.
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyProbe {
    current: Arc<AtomicUsize>,
    max: Arc<AtomicUsize>,
}

impl ConcurrencyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_seen(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

type UpdateFn = Box<dyn Fn(&Fields) -> anyhow::Result<String> + Send + Sync>;

/// A resource that:
/// - records every `update` / `delete` call in a shared [`CallLog`]
/// - runs a configurable update closure against its own fields
/// - can be told to fail, to sleep, or to report into a [`ConcurrencyProbe`].
pub struct FakeResource {
    base: ResourceBase,
    log: CallLog,
    on_update: UpdateFn,
    delete_error: Option<String>,
    delay: Option<Duration>,
    probe: Option<ConcurrencyProbe>,
}

impl FakeResource {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            base: ResourceBase::new(name),
            log: log.clone(),
            on_update: Box::new(|_| Ok(String::new())),
            delete_error: None,
            delay: None,
            probe: None,
        }
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.base = self.base.depends_on(Dependency::on(dep));
        self
    }

    pub fn depends_on_value(mut self, dep: &str, from_field: &str, to_field: &str) -> Self {
        self.base = self
            .base
            .depends_on(Dependency::with_value(dep, from_field, to_field));
        self
    }

    pub fn dependency(mut self, dep: Dependency) -> Self {
        self.base = self.base.depends_on(dep);
        self
    }

    pub fn field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.base = self.base.with_field(name, value);
        self
    }

    pub fn on_update(
        mut self,
        f: impl Fn(&Fields) -> anyhow::Result<String> + Send + Sync + 'static,
    ) -> Self {
        self.on_update = Box::new(f);
        self
    }

    pub fn status(self, status: &str) -> Self {
        let status = status.to_string();
        self.on_update(move |_| Ok(status.clone()))
    }

    pub fn fail_update(self, msg: &str) -> Self {
        let msg = msg.to_string();
        self.on_update(move |_| Err(anyhow!(msg.clone())))
    }

    pub fn fail_delete(mut self, msg: &str) -> Self {
        self.delete_error = Some(msg.to_string());
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn probe(mut self, probe: &ConcurrencyProbe) -> Self {
        self.probe = Some(probe.clone());
        self
    }

    pub fn fields(&self) -> &Fields {
        self.base.fields()
    }

    pub fn into_dyn(self) -> Arc<dyn Resource> {
        Arc::new(self)
    }
}

impl Resource for FakeResource {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn dependencies(&self) -> &[Dependency] {
        self.base.dependencies()
    }

    fn update<'a>(&'a self, _ctx: &'a SyncContext) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(async move {
            self.log.push(Call::Update(self.name().to_string()));
            if let Some(probe) = &self.probe {
                probe.enter();
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let result = (self.on_update)(self.base.fields());
            if let Some(probe) = &self.probe {
                probe.exit();
            }
            result
        })
    }

    fn delete<'a>(&'a self, _ctx: &'a SyncContext) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.log.push(Call::Delete(self.name().to_string()));
            match &self.delete_error {
                Some(msg) => Err(anyhow!(msg.clone())),
                None => Ok(()),
            }
        })
    }

    fn read_field(&self, field: &str) -> Option<FieldValue> {
        self.base.fields().get(field)
    }

    fn write_field(&self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        self.base.fields().set(field, value)
    }
}
