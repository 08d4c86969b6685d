use async_trait::async_trait;
use crate::domain::*;
use crate::error::Result;

pub mod user_repository;
pub mod payment_repository;
pub mod program_repository;
pub mod assignment_repository;
pub mod price_repository;
pub mod routine_repository;

pub use user_repository::SqliteUserRepository;
pub use payment_repository::SqlitePaymentRepository;
pub use program_repository::SqliteProgramRepository;
pub use assignment_repository::SqliteAssignmentRepository;
pub use price_repository::SqlitePriceRepository;
pub use routine_repository::SqliteRoutineRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: CreateUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>>;
    /// Case-insensitive substring match on name or email, or an exact id.
    async fn search(&self, term: &str) -> Result<Vec<User>>;
    async fn update(&self, id: &str, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: NewPayment) -> Result<Payment>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>>;
    async fn find_by_client(&self, client_id: &str) -> Result<Vec<Payment>>;
    async fn list(&self, query: PaymentQuery) -> Result<Vec<Payment>>;
    async fn update(&self, id: &str, update: UpdatePaymentRequest) -> Result<Option<Payment>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn create(&self, program: CreateProgramRequest, created_by: Option<String>) -> Result<WorkoutProgram>;
    async fn find_by_id(&self, id: &str) -> Result<Option<WorkoutProgram>>;
    async fn list(&self) -> Result<Vec<WorkoutProgram>>;
    async fn update(&self, id: &str, update: UpdateProgramRequest) -> Result<Option<WorkoutProgram>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, program_id: &str, client_id: &str, created_by: Option<String>) -> Result<Assignment>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Assignment>>;
    async fn find_by_client(&self, client_id: &str) -> Result<Vec<Assignment>>;
    async fn update(&self, id: &str, update: UpdateAssignmentRequest) -> Result<Option<Assignment>>;
    async fn add_progress(&self, id: &str, entry: ProgressEntry) -> Result<Option<Assignment>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait PriceRepository: Send + Sync {
    async fn create(&self, price: CreatePriceRequest) -> Result<Price>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Price>>;
    /// Cheapest first.
    async fn list(&self) -> Result<Vec<Price>>;
    async fn update(&self, id: &str, update: UpdatePriceRequest) -> Result<Option<Price>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait RoutineRepository: Send + Sync {
    async fn create(&self, routine: CreateRoutineRequest) -> Result<Routine>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Routine>>;
    async fn list(&self) -> Result<Vec<Routine>>;
    async fn update(&self, id: &str, update: UpdateRoutineRequest) -> Result<Option<Routine>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}
