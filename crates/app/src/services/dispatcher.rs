//! Actuator dispatcher — turns a verdict into concurrent host commands.

use std::sync::Arc;

use tokio::task::JoinSet;

use timer24h_domain::actuator::ActuatorClass;

use crate::ports::{ActuatorCommand, ActuatorRegistry};

/// Aggregated outcome of one dispatch, used for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Commands the host accepted.
    pub sent: usize,
    /// Commands the host rejected or that never completed.
    pub failed: usize,
    /// Actuators absent from the registry.
    pub missing: usize,
    /// Actuators whose class has no command for this intent.
    pub ignored: usize,
}

/// Sends the desired on/off intent to every configured actuator.
pub struct ActuatorDispatcher<R, C> {
    registry: R,
    commands: Arc<C>,
}

impl<R, C> ActuatorDispatcher<R, C>
where
    R: ActuatorRegistry,
    C: ActuatorCommand + 'static,
{
    /// Create a dispatcher.
    pub fn new(registry: R, commands: C) -> Self {
        Self {
            registry,
            commands: Arc::new(commands),
        }
    }

    /// Bring every actuator in `entities` to `desired_on`.
    ///
    /// Commands run concurrently; a failing actuator never prevents its
    /// siblings from being commanded. Waits for every outcome.
    pub async fn apply(&self, entities: &[String], desired_on: bool) -> DispatchReport {
        let mut report = DispatchReport::default();
        if entities.is_empty() {
            return report;
        }

        let states = self.registry.snapshot();
        let mut tasks = JoinSet::new();
        for entity in entities {
            if !states.contains(entity) {
                tracing::warn!(%entity, "actuator not found, skipping");
                report.missing += 1;
                continue;
            }
            let class = ActuatorClass::of(entity);
            let Some(call) = class.command(entity, desired_on) else {
                tracing::debug!(%entity, %class, desired_on, "no command for actuator");
                report.ignored += 1;
                continue;
            };
            let commands = Arc::clone(&self.commands);
            let entity = entity.clone();
            tasks.spawn(async move {
                tracing::debug!(%entity, %call, "invoking");
                let result = commands.invoke(call).await;
                (entity, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(()))) => report.sent += 1,
                Ok((entity, Err(err))) => {
                    tracing::warn!(%entity, %err, "actuator command failed");
                    report.failed += 1;
                }
                Err(err) => {
                    tracing::error!(%err, "actuator command task aborted");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            desired_on,
            sent = report.sent,
            failed = report.failed,
            missing = report.missing,
            "actuators updated"
        );
        report
    }
}
