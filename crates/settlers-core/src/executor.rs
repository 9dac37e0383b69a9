//! Ordered, fail-fast execution of rule steps.

use crate::context::RequestContext;
use crate::error::ActionError;
use crate::events::Event;
use crate::rules::Step;
use tracing::debug;

/// An ordered list of steps run against one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step in order.
    ///
    /// The first failure ends the run and drops the context together with
    /// everything buffered so far; otherwise the buffered events are returned
    /// as the commit set.
    pub fn execute(&self, mut ctx: RequestContext<'_>) -> Result<Vec<Event>, ActionError> {
        for step in &self.steps {
            debug!(step = step.name(), buffered = ctx.events().len(), "running step");
            step.run(&mut ctx)?;
        }
        Ok(ctx.into_events())
    }
}

impl From<Vec<Step>> for Chain {
    fn from(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}
