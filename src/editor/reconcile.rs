use serde::Serialize;

use super::plan::{SavePlan, StopMutation};
use crate::api::StopAPI;
use crate::entities::{LocalId, ServerId};
use crate::error::Error;

/// A remote call that went through.
#[derive(Clone, Debug, PartialEq)]
pub enum Applied {
    Deleted(ServerId),
    Created {
        local: LocalId,
        id: ServerId,
        order: u32,
    },
    Updated {
        id: ServerId,
        order: u32,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SaveSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SaveSummary {
    fn record(&mut self, applied: &Applied) {
        match applied {
            Applied::Deleted(_) => self.deleted += 1,
            Applied::Created { .. } => self.created += 1,
            Applied::Updated { .. } => self.updated += 1,
        }
    }
}

pub async fn reconcile<A>(api: &A, tour_id: &str, plan: &SavePlan) -> Result<SaveSummary, Error>
where
    A: StopAPI + ?Sized,
{
    reconcile_with(api, tour_id, plan, |_| {}).await
}

/// Issues the planned calls one at a time, in plan order.
///
/// `on_applied` sees every call that succeeded. The first failure stops the
/// run and is returned; calls that already landed are not rolled back.
#[tracing::instrument(skip(api, plan, on_applied), fields(calls = plan.len()))]
pub async fn reconcile_with<A, F>(
    api: &A,
    tour_id: &str,
    plan: &SavePlan,
    mut on_applied: F,
) -> Result<SaveSummary, Error>
where
    A: StopAPI + ?Sized,
    F: FnMut(Applied),
{
    let mut summary = SaveSummary::default();

    for mutation in plan.iter() {
        let applied = match mutation {
            StopMutation::Delete(id) => {
                api.delete_stop(id).await?;
                tracing::debug!(%id, "deleted stop");
                Applied::Deleted(id.clone())
            }
            StopMutation::Create { local, input } => {
                let id = api.create_stop(tour_id, input).await?;
                tracing::debug!(%id, order = input.order, "created stop");
                Applied::Created {
                    local: *local,
                    id,
                    order: input.order,
                }
            }
            StopMutation::Update { id, input } => {
                let returned = api.update_stop(id, input).await?;
                if &returned != id {
                    tracing::warn!(%id, %returned, "server answered an update with another id");
                }
                tracing::debug!(%id, order = input.order, "updated stop");
                Applied::Updated {
                    id: id.clone(),
                    order: input.order,
                }
            }
        };

        summary.record(&applied);
        on_applied(applied);
    }

    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        deleted = summary.deleted,
        "route reconciled"
    );

    Ok(summary)
}
