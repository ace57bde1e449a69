use std::collections::BTreeSet;

use tracing::info;
use tutorsync_core::{
    errors::{TutorError, TutorResult},
    models::{
        regular_schedule::{RegularSchedule, RegularScheduleStatus},
        teacher::{CreateTeacherRequest, Teacher, UpdateRegularTimesResponse},
        Sequence, TeacherId,
    },
    time::{normalize_offset, normalize_offsets, Millis},
};
use tutorsync_db::repositories::regular_schedule::RegularScheduleQuery;

use super::{calendar::CalendarService, ServiceContext};

pub struct TeacherService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TeacherService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn create_teacher(&self, request: CreateTeacherRequest) -> TutorResult<Teacher> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(TutorError::Validation("Teacher name cannot be empty".to_string()));
        }

        let id = self.ctx.stores.ids.next_id(Sequence::Teacher).await?;
        let teacher = self
            .ctx
            .stores
            .teachers
            .insert(Teacher {
                id,
                name: name.to_string(),
                regular_times: normalize_offsets(request.regular_times),
                is_active: true,
            })
            .await?;

        info!(teacher_id = teacher.id, "Created teacher");
        Ok(teacher)
    }

    pub async fn get_teacher(&self, teacher_id: TeacherId) -> TutorResult<Teacher> {
        self.ctx
            .stores
            .teachers
            .get(teacher_id)
            .await?
            .ok_or_else(|| TutorError::NotFound(format!("Teacher {} not found", teacher_id)))
    }

    /// Replaces the teacher's weekly offsets. Future ad-hoc slots sitting on
    /// a newly added offset are removed unless booked.
    pub async fn update_regular_times(
        &self,
        teacher_id: TeacherId,
        regular_times: Vec<Millis>,
    ) -> TutorResult<UpdateRegularTimesResponse> {
        let current = self.get_teacher(teacher_id).await?;
        let previous: BTreeSet<Millis> = current
            .regular_times
            .iter()
            .map(|&t| normalize_offset(t))
            .collect();

        let regular_times = normalize_offsets(regular_times);
        let added: Vec<Millis> = regular_times
            .iter()
            .copied()
            .filter(|offset| !previous.contains(offset))
            .collect();

        let teacher = self
            .ctx
            .stores
            .teachers
            .update_regular_times(teacher_id, regular_times)
            .await?
            .ok_or_else(|| TutorError::NotFound(format!("Teacher {} not found", teacher_id)))?;

        let removed_slots = CalendarService::new(self.ctx)
            .deactivate_all_matching_regular_offsets(teacher_id, &added)
            .await?;

        Ok(UpdateRegularTimesResponse {
            teacher,
            removed_slots,
        })
    }

    pub async fn list_regular_schedules(&self, teacher_id: TeacherId) -> TutorResult<Vec<RegularSchedule>> {
        self.get_teacher(teacher_id).await?;

        Ok(self
            .ctx
            .stores
            .regular_schedules
            .find_all(RegularScheduleQuery {
                teacher_id: Some(teacher_id),
                ..RegularScheduleQuery::default()
            })
            .await?)
    }

    /// Commits one of the teacher's declared offsets to a recurring lesson.
    pub async fn register_regular_schedule(
        &self,
        teacher_id: TeacherId,
        regular_start_time: Millis,
    ) -> TutorResult<RegularSchedule> {
        let teacher = self.get_teacher(teacher_id).await?;
        let offset = normalize_offset(regular_start_time);

        if !teacher.offers_regular(offset) {
            return Err(TutorError::Validation(format!(
                "Teacher {} does not offer week offset {}",
                teacher_id, offset
            )));
        }

        let stores = &self.ctx.stores;
        let existing = stores
            .regular_schedules
            .find_one(RegularScheduleQuery {
                teacher_id: Some(teacher_id),
                regular_start_time: Some(offset),
                statuses: RegularScheduleStatus::committed(),
            })
            .await?;
        if existing.is_some() {
            return Err(TutorError::Conflict(format!(
                "Week offset {} of teacher {} is already committed",
                offset, teacher_id
            )));
        }

        let id = stores.ids.next_id(Sequence::RegularSchedule).await?;
        let schedule = stores
            .regular_schedules
            .insert(RegularSchedule {
                id,
                teacher_id,
                regular_start_time: offset,
                status: RegularScheduleStatus::Active,
            })
            .await?;

        info!(teacher_id, regular_schedule_id = schedule.id, offset, "Registered regular schedule");
        Ok(schedule)
    }
}
