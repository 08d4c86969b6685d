pub mod catalog_service;
pub mod credential_service;
pub mod payment_service;
pub mod program_service;
pub mod user_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::domain::CredentialSigner;
use crate::repository::*;
use catalog_service::CatalogService;
use credential_service::CredentialService;
use payment_service::PaymentService;
use program_service::ProgramService;
use user_service::UserService;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub program_repo: Arc<dyn ProgramRepository>,
    pub assignment_repo: Arc<dyn AssignmentRepository>,
    pub price_repo: Arc<dyn PriceRepository>,
    pub routine_repo: Arc<dyn RoutineRepository>,
    pub user_service: Arc<UserService>,
    pub payment_service: Arc<PaymentService>,
    pub credential_service: Arc<CredentialService>,
    pub program_service: Arc<ProgramService>,
    pub catalog_service: Arc<CatalogService>,
}

impl ServiceContext {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        program_repo: Arc<dyn ProgramRepository>,
        assignment_repo: Arc<dyn AssignmentRepository>,
        price_repo: Arc<dyn PriceRepository>,
        routine_repo: Arc<dyn RoutineRepository>,
        signer: Option<CredentialSigner>,
    ) -> Self {
        let user_service = Arc::new(UserService::new(user_repo.clone()));
        let payment_service = Arc::new(PaymentService::new(payment_repo.clone(), user_repo.clone()));
        let credential_service = Arc::new(CredentialService::new(
            payment_repo.clone(),
            user_repo.clone(),
            signer,
        ));
        let program_service = Arc::new(ProgramService::new(
            program_repo.clone(),
            assignment_repo.clone(),
            user_repo.clone(),
        ));
        let catalog_service = Arc::new(CatalogService::new(price_repo.clone(), routine_repo.clone()));

        Self {
            user_repo,
            payment_repo,
            program_repo,
            assignment_repo,
            price_repo,
            routine_repo,
            user_service,
            payment_service,
            credential_service,
            program_service,
            catalog_service,
        }
    }

    /// Wire every repository to one SQLite pool.
    pub fn sqlite(pool: SqlitePool, signer: Option<CredentialSigner>) -> Self {
        Self::new(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(SqlitePaymentRepository::new(pool.clone())),
            Arc::new(SqliteProgramRepository::new(pool.clone())),
            Arc::new(SqliteAssignmentRepository::new(pool.clone())),
            Arc::new(SqlitePriceRepository::new(pool.clone())),
            Arc::new(SqliteRoutineRepository::new(pool)),
            signer,
        )
    }
}
