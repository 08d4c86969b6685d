use chrono::{Duration, Utc};
use clap::Parser;
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name, phone_number::en::PhoneNumber},
    Fake,
};
use gymdesk::{
    domain::{
        CreatePriceRequest, CreateProgramRequest, CreateRoutineRequest, CreateUserRequest,
        Exercise, NewPayment, PlanType, ProgressEntry, Role, User,
    },
    repository::{
        AssignmentRepository, PaymentRepository, PriceRepository, ProgramRepository,
        RoutineRepository, SqliteAssignmentRepository, SqlitePaymentRepository,
        SqlitePriceRepository, SqliteProgramRepository, SqliteRoutineRepository,
        SqliteUserRepository, UserRepository,
    },
};
use rand::{seq::SliceRandom, Rng};
use sqlx::sqlite::SqlitePoolOptions;

/// Fill a database with demo clients, payments and a training program.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://gymdesk.db?mode=rwc")]
    database_url: String,

    /// Number of fake clients to create.
    #[arg(long, default_value_t = 12)]
    clients: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let payment_repo = SqlitePaymentRepository::new(db_pool.clone());
    let program_repo = SqliteProgramRepository::new(db_pool.clone());
    let assignment_repo = SqliteAssignmentRepository::new(db_pool.clone());
    let price_repo = SqlitePriceRepository::new(db_pool.clone());
    let routine_repo = SqliteRoutineRepository::new(db_pool.clone());

    println!("👥 Creating users...");

    let admin = match user_repo.find_by_email("admin@gymdesk.local").await? {
        Some(existing) => existing,
        None => {
            user_repo
                .create(CreateUserRequest {
                    name: "Front Desk".to_string(),
                    email: "admin@gymdesk.local".to_string(),
                    phone: None,
                    role: Role::Admin,
                })
                .await?
        }
    };
    println!("  ✅ Admin user {} (send as X-Actor-Id)", admin.id);

    let mut clients: Vec<User> = Vec::with_capacity(args.clients);
    for _ in 0..args.clients {
        let email: String = SafeEmail().fake();
        if user_repo.find_by_email(&email).await?.is_some() {
            continue;
        }
        let client = user_repo
            .create(CreateUserRequest {
                name: Name().fake(),
                email,
                phone: Some(PhoneNumber().fake()),
                role: Role::Client,
            })
            .await?;
        clients.push(client);
    }
    println!("  ✅ Created {} clients", clients.len());

    println!("💳 Recording payments...");

    let today = Utc::now().date_naive();
    let mut rng = rand::thread_rng();
    let plans = [
        PlanType::PerDay,
        PlanType::PerWeek,
        PlanType::PerMonth,
        PlanType::PerSeveral,
    ];

    let mut recorded = 0;
    for (i, client) in clients.iter().enumerate() {
        let plan = plans[i % plans.len()].clone();
        // Mix of current and lapsed payments
        let date = today - Duration::days(rng.gen_range(0..45));

        let (amount, selected_dates) = match plan {
            PlanType::PerDay => (10.0, None),
            PlanType::PerWeek => (35.0, None),
            PlanType::PerMonth => (120.0, None),
            _ => {
                let mut offsets: Vec<i64> = (0..14).collect();
                offsets.shuffle(&mut rng);
                let mut dates: Vec<_> = offsets[..4].iter().map(|d| date + Duration::days(*d)).collect();
                dates.sort();
                (60.0, Some(dates))
            }
        };

        payment_repo
            .create(NewPayment {
                client_id: client.id.clone(),
                user_id: Some(admin.id.clone()),
                plan_type: plan,
                amount,
                date,
                selected_dates,
                duration_days: None,
            })
            .await?;
        recorded += 1;
    }
    println!("  ✅ Recorded {} payments", recorded);

    println!("🏋️ Creating a workout program...");

    let program = program_repo
        .create(
            CreateProgramRequest {
                name: "Beginner Full Body".to_string(),
                description: Some("Three sessions a week, compound lifts first.".to_string()),
                exercises: vec![
                    Exercise { name: "Back Squat".to_string(), sets: 3, reps: 8, notes: None },
                    Exercise { name: "Bench Press".to_string(), sets: 3, reps: 8, notes: None },
                    Exercise {
                        name: "Bent-over Row".to_string(),
                        sets: 3,
                        reps: 10,
                        notes: Some("Keep the back flat".to_string()),
                    },
                ],
            },
            Some(admin.id.clone()),
        )
        .await?;

    if let Some(client) = clients.first() {
        let assignment = assignment_repo
            .create(&program.id, &client.id, Some(admin.id.clone()))
            .await?;
        assignment_repo
            .add_progress(
                &assignment.id,
                ProgressEntry {
                    exercise_name: Some("Back Squat".to_string()),
                    date: Utc::now(),
                    sets: Some(3),
                    reps: Some(8),
                    weight: Some(60.0),
                    notes: None,
                },
            )
            .await?;
        println!("  ✅ Assigned \"{}\" to {}", program.name, client.name);
    }

    println!("🏷️ Filling the public catalog...");

    if price_repo.list().await?.is_empty() {
        let prices = [
            ("Day pass", 5.0, vec!["Open gym"]),
            ("Weekly", 15.0, vec!["Open gym", "Group classes"]),
            ("Monthly", 40.0, vec!["Open gym", "Group classes", "Locker"]),
        ];
        let count = prices.len();
        for (title, amount, features) in prices {
            price_repo
                .create(CreatePriceRequest {
                    title: title.to_string(),
                    amount,
                    features: features.into_iter().map(String::from).collect(),
                })
                .await?;
        }
        println!("  ✅ Created {} prices", count);
    }

    if routine_repo.list().await?.is_empty() {
        routine_repo
            .create(CreateRoutineRequest {
                title: "Push day".to_string(),
                description: "Bench press, overhead press and dips.".to_string(),
                image: None,
            })
            .await?;
        println!("  ✅ Created a routine");
    }

    println!("✨ Seeding complete!");

    Ok(())
}
