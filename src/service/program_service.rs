use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::{AssignmentRepository, ProgramRepository, UserRepository},
};

pub struct ProgramService {
    programs: Arc<dyn ProgramRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    users: Arc<dyn UserRepository>,
}

impl ProgramService {
    pub fn new(
        programs: Arc<dyn ProgramRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            programs,
            assignments,
            users,
        }
    }

    pub async fn create_program(&self, actor: &User, request: CreateProgramRequest) -> Result<WorkoutProgram> {
        request.validate()?;
        check_exercises(&request.exercises)?;

        let program = self.programs.create(request, Some(actor.id.clone())).await?;
        tracing::info!("Created workout program {} ({})", program.id, program.name);
        Ok(program)
    }

    pub async fn get_program(&self, id: &str) -> Result<WorkoutProgram> {
        self.programs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Program not found".to_string()))
    }

    pub async fn list_programs(&self) -> Result<Vec<WorkoutProgram>> {
        self.programs.list().await
    }

    pub async fn update_program(&self, id: &str, request: UpdateProgramRequest) -> Result<WorkoutProgram> {
        request.validate()?;
        if let Some(ref exercises) = request.exercises {
            check_exercises(exercises)?;
        }

        self.programs
            .update(id, request)
            .await?
            .ok_or_else(|| AppError::NotFound("Program not found".to_string()))
    }

    pub async fn delete_program(&self, id: &str) -> Result<()> {
        if !self.programs.delete(id).await? {
            return Err(AppError::NotFound("Program not found".to_string()));
        }
        tracing::info!("Deleted workout program {}", id);
        Ok(())
    }

    /// Give a program to each listed client. All clients are checked before
    /// any assignment is written.
    pub async fn assign(&self, actor: &User, request: AssignProgramRequest) -> Result<Vec<Assignment>> {
        let mut client_ids = request.client_ids;
        client_ids.retain(|id| !id.trim().is_empty());
        client_ids.sort();
        client_ids.dedup();
        if client_ids.is_empty() {
            return Err(AppError::Validation("clientIds must name at least one client".to_string()));
        }

        let program = self.get_program(&request.program_id).await?;

        for client_id in &client_ids {
            if self.users.find_by_id(client_id).await?.is_none() {
                return Err(AppError::NotFound(format!("Client {} not found", client_id)));
            }
        }

        let mut created = Vec::with_capacity(client_ids.len());
        for client_id in &client_ids {
            let assignment = self
                .assignments
                .create(&program.id, client_id, Some(actor.id.clone()))
                .await?;
            created.push(assignment);
        }

        tracing::info!("Assigned program {} to {} client(s)", program.id, created.len());
        Ok(created)
    }

    pub async fn update_assignment(&self, id: &str, request: UpdateAssignmentRequest) -> Result<Assignment> {
        self.assignments
            .update(id, request)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))
    }

    pub async fn add_progress(&self, id: &str, request: AddProgressRequest) -> Result<Assignment> {
        let entry = ProgressEntry {
            exercise_name: request.exercise_name,
            date: request.date.unwrap_or_else(Utc::now),
            sets: request.sets,
            reps: request.reps,
            weight: request.weight,
            notes: request.notes,
        };

        if matches!(entry.weight, Some(w) if !w.is_finite() || w < 0.0) {
            return Err(AppError::Validation("weight must be a non-negative number".to_string()));
        }

        self.assignments
            .add_progress(id, entry)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))
    }

    pub async fn delete_assignment(&self, id: &str) -> Result<()> {
        if !self.assignments.delete(id).await? {
            return Err(AppError::NotFound("Assignment not found".to_string()));
        }
        Ok(())
    }

    pub async fn client_assignments(&self, client_id: &str) -> Result<Vec<AssignmentWithProgram>> {
        let assignments = self.assignments.find_by_client(client_id).await?;

        let mut out = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let program = self.programs.find_by_id(&assignment.program_id).await?;
            out.push(AssignmentWithProgram { assignment, program });
        }
        Ok(out)
    }
}

fn check_exercises(exercises: &[Exercise]) -> Result<()> {
    if exercises.iter().any(|e| e.name.trim().is_empty()) {
        return Err(AppError::Validation("Every exercise needs a name".to_string()));
    }
    Ok(())
}
