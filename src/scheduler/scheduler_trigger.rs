use crate::{jobs::JobTriggerDescriptor, scheduler::SchedulerJobRetryStrategy};

/// Descriptor that the scheduler submits on every firing, along with the retry strategy applied
/// to transient submission failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerTrigger {
    descriptor: JobTriggerDescriptor,
    retry_strategy: SchedulerJobRetryStrategy,
}

impl SchedulerTrigger {
    pub fn new(
        descriptor: JobTriggerDescriptor,
        retry_strategy: SchedulerJobRetryStrategy,
    ) -> Self {
        Self {
            descriptor,
            retry_strategy,
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &JobTriggerDescriptor {
        &self.descriptor
    }

    pub fn retry_strategy(&self) -> &SchedulerJobRetryStrategy {
        &self.retry_strategy
    }
}
