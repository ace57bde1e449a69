use tracing::info;
use tutorsync_core::{
    errors::{TutorError, TutorResult},
    models::{
        absence::{AbsenceRequest, AbsenceStatus, CreateAbsenceRequest},
        AbsenceId, Sequence,
    },
};

use super::{calendar::CalendarService, ServiceContext};

pub struct AbsenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AbsenceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Files a pending absence. It vetoes availability only once approved.
    pub async fn request_absence(&self, request: CreateAbsenceRequest) -> TutorResult<AbsenceRequest> {
        if request.start_time >= request.end_time {
            return Err(TutorError::Validation(
                "Absence start must be before its end".to_string(),
            ));
        }

        let stores = &self.ctx.stores;
        if stores.teachers.get(request.teacher_id).await?.is_none() {
            return Err(TutorError::NotFound(format!(
                "Teacher {} not found",
                request.teacher_id
            )));
        }

        let id = stores.ids.next_id(Sequence::Absence).await?;
        let absence = stores
            .absences
            .insert(AbsenceRequest {
                id,
                teacher_id: request.teacher_id,
                start_time: request.start_time,
                end_time: request.end_time,
                status: AbsenceStatus::Pending,
            })
            .await?;

        info!(absence_id = absence.id, teacher_id = absence.teacher_id, "Requested absence");
        Ok(absence)
    }

    /// Moves an absence along its lifecycle. Approval closes the open slots
    /// the teacher still has inside the absence.
    pub async fn set_absence_status(&self, id: AbsenceId, status: AbsenceStatus) -> TutorResult<AbsenceRequest> {
        let stores = &self.ctx.stores;
        let current = stores
            .absences
            .find_one(id)
            .await?
            .ok_or_else(|| TutorError::NotFound(format!("Absence {} not found", id)))?;

        if !current.status.can_transition_to(status) {
            return Err(TutorError::Conflict(format!(
                "Absence {} cannot move from {} to {}",
                id, current.status, status
            )));
        }

        let absence = stores
            .absences
            .update_status(id, status)
            .await?
            .ok_or_else(|| TutorError::NotFound(format!("Absence {} not found", id)))?;

        if absence.status.vetoes_availability() {
            CalendarService::new(self.ctx)
                .close_open_slots_overlapping(absence.teacher_id, absence.start_time, absence.end_time)
                .await?;
        }

        info!(absence_id = id, from = %current.status, to = %status, "Updated absence status");
        Ok(absence)
    }
}
