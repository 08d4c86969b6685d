mod common;

use chrono::{NaiveDate, Utc};
use gymdesk::{
    domain::{
        AssignmentStatus, CreatePriceRequest, CreateProgramRequest, CreateRoutineRequest, Exercise,
        NewPayment, PaymentQuery, PlanType, ProgressEntry, Role, UpdateAssignmentRequest,
        UpdatePaymentRequest, UpdatePriceRequest, UpdateProgramRequest, UpdateRoutineRequest,
        UpdateUserRequest,
    },
    repository::{
        AssignmentRepository, PaymentRepository, PriceRepository, ProgramRepository,
        RoutineRepository, SqliteAssignmentRepository, SqlitePaymentRepository,
        SqlitePriceRepository, SqliteProgramRepository, SqliteRoutineRepository,
        SqliteUserRepository, UserRepository,
    },
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_payment(client_id: &str, plan_type: PlanType, date: NaiveDate) -> NewPayment {
    NewPayment {
        client_id: client_id.to_string(),
        user_id: None,
        plan_type,
        amount: 40.0,
        date,
        selected_dates: None,
        duration_days: None,
    }
}

#[tokio::test]
async fn test_user_crud() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUserRepository::new(pool.clone());

    let user = common::create_user(&pool, "Ana Torres", "Ana@Example.com", Role::Client).await?;
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.role, Role::Client);
    assert!(!user.id.is_empty());

    let found = repo.find_by_id(&user.id).await?;
    assert_eq!(found.map(|u| u.name), Some("Ana Torres".to_string()));

    let by_email = repo.find_by_email("ANA@example.com").await?;
    assert!(by_email.is_some());

    common::create_user(&pool, "Bruno Diaz", "bruno@example.com", Role::Admin).await?;
    assert_eq!(repo.list(10, 0).await?.len(), 2);
    assert_eq!(repo.list(1, 1).await?.len(), 1);

    let updated = repo
        .update(
            &user.id,
            UpdateUserRequest {
                phone: Some("555-0100".to_string()),
                ..Default::default()
            },
        )
        .await?
        .expect("user exists");
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    assert_eq!(updated.name, "Ana Torres");

    assert!(repo.update("missing", UpdateUserRequest::default()).await?.is_none());

    assert!(repo.delete(&user.id).await?);
    assert!(!repo.delete(&user.id).await?);
    assert!(repo.find_by_id(&user.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_user_search() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteUserRepository::new(pool.clone());

    let ana = common::create_user(&pool, "Ana Torres", "ana@example.com", Role::Client).await?;
    common::create_user(&pool, "Bruno Diaz", "bruno@gym.test", Role::Client).await?;

    let by_name = repo.search("TORR").await?;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, ana.id);

    let by_domain = repo.search("gym.test").await?;
    assert_eq!(by_domain.len(), 1);

    let by_id = repo.search(&ana.id).await?;
    assert_eq!(by_id.len(), 1);

    assert!(repo.search("nobody").await?.is_empty());

    // LIKE wildcards in the term match themselves
    common::create_user(&pool, "Casey 100% Fit", "casey_fit@example.com", Role::Client).await?;
    assert!(repo.search("a_a").await?.is_empty());
    assert_eq!(repo.search("%").await?.len(), 1);
    assert_eq!(repo.search("_").await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_payment_crud() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqlitePaymentRepository::new(pool.clone());
    let client = common::create_user(&pool, "Ana Torres", "ana@example.com", Role::Client).await?;

    let mut several = new_payment(&client.id, PlanType::PerSeveral, ymd(2025, 3, 1));
    several.selected_dates = Some(vec![ymd(2025, 3, 3), ymd(2025, 3, 10)]);
    let created = repo.create(several).await?;

    let found = repo.find_by_id(&created.id).await?.expect("payment exists");
    assert_eq!(found.plan_type, PlanType::PerSeveral);
    assert_eq!(found.date, ymd(2025, 3, 1));
    assert_eq!(found.selected_dates, Some(vec![ymd(2025, 3, 3), ymd(2025, 3, 10)]));
    assert_eq!(found.end_date(), ymd(2025, 3, 10));
    assert!(found.is_valid_on(ymd(2025, 3, 10)));
    assert!(!found.is_valid_on(ymd(2025, 3, 4)));

    let updated = repo
        .update(
            &created.id,
            UpdatePaymentRequest {
                amount: Some(55.5),
                ..Default::default()
            },
        )
        .await?
        .expect("payment exists");
    assert_eq!(updated.amount, 55.5);
    assert_eq!(updated.client_id, client.id);
    assert_eq!(updated.selected_dates, found.selected_dates);

    assert!(repo.delete(&created.id).await?);
    assert!(repo.find_by_id(&created.id).await?.is_none());
    assert!(!repo.delete(&created.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_unknown_plan_type_loads_and_fails_closed() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqlitePaymentRepository::new(pool.clone());

    // Rows written by older versions may carry any label
    sqlx::query(
        "INSERT INTO payments (id, client_id, plan_type, amount, start_date, created_at, updated_at)
         VALUES ('legacy', 'u1', 'per year', 300, '2025-01-01', ?, ?)",
    )
    .bind(Utc::now().naive_utc())
    .bind(Utc::now().naive_utc())
    .execute(&pool)
    .await?;

    let payment = repo.find_by_id("legacy").await?.expect("row exists");
    assert_eq!(payment.plan_type, PlanType::Unknown("per year".to_string()));
    assert_eq!(payment.end_date(), ymd(2025, 1, 1));
    assert!(!payment.is_valid_on(ymd(2025, 1, 1)));

    Ok(())
}

#[tokio::test]
async fn test_corrupt_payment_rows_load_without_access() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqlitePaymentRepository::new(pool.clone());

    let rows = [
        ("bad-dates", "per several", "2025-06-01", Some(r#"{"oops":1}"#)),
        ("bad-start", "per week", "01/06/2025", None),
        ("mixed-dates", "per several", "2025-06-01", Some(r#"["2025-06-03", 7, "soon"]"#)),
        ("good", "per week", "2025-06-01", None),
    ];
    for (id, plan_type, start_date, selected_dates) in rows {
        sqlx::query(
            "INSERT INTO payments (id, client_id, plan_type, amount, start_date, selected_dates, created_at, updated_at)
             VALUES (?, 'u1', ?, 20, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(plan_type)
        .bind(start_date)
        .bind(selected_dates)
        .bind(Utc::now().naive_utc())
        .bind(Utc::now().naive_utc())
        .execute(&pool)
        .await?;
    }

    let bad_dates = repo.find_by_id("bad-dates").await?.expect("row loads");
    assert_eq!(bad_dates.selected_dates, Some(vec![]));
    assert!(!bad_dates.is_valid_on(ymd(2025, 6, 1)));
    assert_eq!(bad_dates.end_date(), ymd(2025, 6, 1));

    let bad_start = repo.find_by_id("bad-start").await?.expect("row loads");
    assert_eq!(bad_start.plan_type, PlanType::Unknown("per week".to_string()));
    assert!(!bad_start.is_valid_on(bad_start.date));
    assert_eq!(bad_start.end_date(), bad_start.date);

    let mixed = repo.find_by_id("mixed-dates").await?.expect("row loads");
    assert_eq!(mixed.selected_dates, Some(vec![ymd(2025, 6, 3)]));

    // One bad row must not hide the client's other payments
    let all = repo.find_by_client("u1").await?;
    assert_eq!(all.len(), 4);
    let good = all.iter().find(|p| p.id == "good").expect("good payment listed");
    assert!(good.is_valid_on(ymd(2025, 6, 5)));

    let listed = repo
        .list(PaymentQuery {
            limit: 50,
            ..Default::default()
        })
        .await?;
    assert_eq!(listed.len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_payment_list_filters()-> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqlitePaymentRepository::new(pool.clone());
    let ana = common::create_user(&pool, "Ana Torres", "ana@example.com", Role::Client).await?;
    let bruno = common::create_user(&pool, "Bruno Diaz", "bruno@example.com", Role::Client).await?;

    repo.create(new_payment(&ana.id, PlanType::PerDay, ymd(2025, 1, 15))).await?;
    repo.create(new_payment(&ana.id, PlanType::PerWeek, ymd(2025, 2, 3))).await?;
    repo.create(new_payment(&bruno.id, PlanType::PerMonth, ymd(2024, 2, 20))).await?;

    let all = repo
        .list(PaymentQuery {
            limit: 50,
            ..Default::default()
        })
        .await?;
    assert_eq!(all.len(), 3);

    let anas = repo
        .list(PaymentQuery {
            client_ids: Some(vec![ana.id.clone()]),
            limit: 50,
            ..Default::default()
        })
        .await?;
    assert_eq!(anas.len(), 2);
    assert!(anas.iter().all(|p| p.client_id == ana.id));

    let february = repo
        .list(PaymentQuery {
            month: Some(2),
            limit: 50,
            ..Default::default()
        })
        .await?;
    assert_eq!(february.len(), 2);

    let feb_2025 = repo
        .list(PaymentQuery {
            year: Some(2025),
            month: Some(2),
            limit: 50,
            ..Default::default()
        })
        .await?;
    assert_eq!(feb_2025.len(), 1);
    assert_eq!(feb_2025[0].plan_type, PlanType::PerWeek);

    let nobody = repo
        .list(PaymentQuery {
            client_ids: Some(vec![]),
            limit: 50,
            ..Default::default()
        })
        .await?;
    assert!(nobody.is_empty());

    let page = repo
        .list(PaymentQuery {
            limit: 2,
            offset: 2,
            ..Default::default()
        })
        .await?;
    assert_eq!(page.len(), 1);

    assert_eq!(repo.find_by_client(&bruno.id).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_program_and_assignment_lifecycle() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let programs = SqliteProgramRepository::new(pool.clone());
    let assignments = SqliteAssignmentRepository::new(pool.clone());
    let coach = common::create_user(&pool, "Coach", "coach@example.com", Role::Admin).await?;
    let client = common::create_user(&pool, "Ana Torres", "ana@example.com", Role::Client).await?;

    let program = programs
        .create(
            CreateProgramRequest {
                name: "Strength Base".to_string(),
                description: None,
                exercises: vec![Exercise {
                    name: "Deadlift".to_string(),
                    sets: 5,
                    reps: 3,
                    notes: None,
                }],
            },
            Some(coach.id.clone()),
        )
        .await?;
    assert_eq!(program.exercises.len(), 1);
    assert_eq!(program.created_by.as_deref(), Some(coach.id.as_str()));

    let renamed = programs
        .update(
            &program.id,
            UpdateProgramRequest {
                name: Some("Strength Base II".to_string()),
                ..Default::default()
            },
        )
        .await?
        .expect("program exists");
    assert_eq!(renamed.name, "Strength Base II");
    assert_eq!(renamed.exercises, program.exercises);
    assert_eq!(programs.list().await?.len(), 1);

    let assignment = assignments
        .create(&program.id, &client.id, Some(coach.id.clone()))
        .await?;
    assert_eq!(assignment.status, AssignmentStatus::Assigned);
    assert!(assignment.progress.is_empty());

    let logged = assignments
        .add_progress(
            &assignment.id,
            ProgressEntry {
                exercise_name: Some("Deadlift".to_string()),
                date: Utc::now(),
                sets: Some(5),
                reps: Some(3),
                weight: Some(100.0),
                notes: None,
            },
        )
        .await?
        .expect("assignment exists");
    assert_eq!(logged.progress.len(), 1);
    assert_eq!(logged.status, AssignmentStatus::InProgress);

    let done = assignments
        .update(
            &assignment.id,
            UpdateAssignmentRequest {
                status: Some(AssignmentStatus::Completed),
            },
        )
        .await?
        .expect("assignment exists");
    assert_eq!(done.status, AssignmentStatus::Completed);
    assert_eq!(done.progress.len(), 1);

    assert_eq!(assignments.find_by_client(&client.id).await?.len(), 1);
    assert!(assignments.delete(&assignment.id).await?);
    assert!(assignments.find_by_client(&client.id).await?.is_empty());

    assert!(programs.delete(&program.id).await?);
    assert!(programs.find_by_id(&program.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_price_and_routine_catalog() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let prices = SqlitePriceRepository::new(pool.clone());
    let routines = SqliteRoutineRepository::new(pool.clone());

    let monthly = prices
        .create(CreatePriceRequest {
            title: "Monthly".to_string(),
            amount: 30.0,
            features: vec!["Open gym".to_string(), "Locker".to_string()],
        })
        .await?;
    prices
        .create(CreatePriceRequest {
            title: "Day pass".to_string(),
            amount: 5.0,
            features: vec![],
        })
        .await?;

    let listed = prices.list().await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "Day pass");
    assert_eq!(listed[1].features, vec!["Open gym", "Locker"]);

    let updated = prices
        .update(
            &monthly.id,
            UpdatePriceRequest {
                amount: Some(35.0),
                ..Default::default()
            },
        )
        .await?
        .expect("price exists");
    assert_eq!(updated.amount, 35.0);
    assert_eq!(updated.features, monthly.features);

    assert!(prices.delete(&monthly.id).await?);
    assert!(!prices.delete(&monthly.id).await?);
    assert!(prices.update(&monthly.id, UpdatePriceRequest::default()).await?.is_none());

    let routine = routines
        .create(CreateRoutineRequest {
            title: "Push day".to_string(),
            description: "Chest, shoulders, triceps".to_string(),
            image: None,
        })
        .await?;
    assert!(routine.image.is_none());

    let updated = routines
        .update(
            &routine.id,
            UpdateRoutineRequest {
                image: Some("https://example.com/push.jpg".to_string()),
                ..Default::default()
            },
        )
        .await?
        .expect("routine exists");
    assert_eq!(updated.image.as_deref(), Some("https://example.com/push.jpg"));
    assert_eq!(updated.description, "Chest, shoulders, triceps");
    assert_eq!(routines.list().await?.len(), 1);

    assert!(routines.delete(&routine.id).await?);
    assert!(routines.find_by_id(&routine.id).await?.is_none());

    Ok(())
}
