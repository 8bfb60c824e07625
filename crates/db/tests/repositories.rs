//! Integration tests for the repository layer against a real database:
//! - Defaults applied on insert
//! - Allocation upsert semantics
//! - Cascade delete behaviour
//! - Filtering, counting and totals
//! - Unique constraint violations

use assert_matches::assert_matches;
use chrono::NaiveDate;
use margin_core::billing::{AllocationUnit, BillingType, EmployeeStatus, ProjectStatus};
use margin_db::models::client::CreateClient;
use margin_db::models::employee::{CreateEmployee, EmployeeFilter};
use margin_db::models::expense::{CreateExpense, ExpenseFilter};
use margin_db::models::expense_category::CreateExpenseCategory;
use margin_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use margin_db::repositories::{
    AllocationRepo, ClientRepo, EmployeeRepo, ExpenseCategoryRepo, ExpenseRepo, ProjectRepo,
};
use rust_decimal_macros::dec;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_client(pool: &PgPool, name: &str) -> i64 {
    ClientRepo::create(
        pool,
        &CreateClient {
            name: name.to_string(),
            industry: Some("Retail".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_project(client_id: i64, name: &str, billing_type: BillingType) -> CreateProject {
    CreateProject {
        client_id,
        name: name.to_string(),
        billing_type,
        status: None,
        revenue_earned: Some(dec!(10000)),
        employee_costs: None,
        start_date: Some(date(2025, 1, 1)),
        deadline: None,
    }
}

fn new_employee(name: &str) -> CreateEmployee {
    CreateEmployee {
        name: name.to_string(),
        role: "Engineer".to_string(),
        status: None,
        specialization: None,
        monthly_salary: Some(dec!(5000)),
        hourly_rate: Some(dec!(100)),
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn project_create_applies_defaults_and_joins_client(pool: PgPool) {
    let client_id = seed_client(&pool, "Acme").await;
    let mut input = new_project(client_id, "Website", BillingType::FixedBid);
    input.revenue_earned = None;
    input.start_date = None;

    let project = ProjectRepo::create(&pool, &input).await.unwrap();

    assert_eq!(project.client_name, "Acme");
    assert_eq!(project.billing_type, BillingType::FixedBid);
    assert_eq!(project.status, ProjectStatus::Active);
    assert_eq!(project.revenue_earned, dec!(0));
    assert_eq!(project.employee_costs, dec!(0));
    assert!(project.deadline.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn employee_create_applies_defaults(pool: PgPool) {
    let mut input = new_employee("Dana");
    input.monthly_salary = None;
    input.hourly_rate = None;

    let employee = EmployeeRepo::create(&pool, &input).await.unwrap();

    assert_eq!(employee.status, EmployeeStatus::Active);
    assert_eq!(employee.specialization, BillingType::FixedBid);
    assert_eq!(employee.monthly_salary, dec!(0));
    assert_eq!(employee.hourly_rate, dec!(0));
}

#[sqlx::test(migrations = "./migrations")]
async fn project_update_only_touches_given_fields(pool: PgPool) {
    let client_id = seed_client(&pool, "Acme").await;
    let project = ProjectRepo::create(&pool, &new_project(client_id, "Old", BillingType::TimeAndMaterials))
        .await
        .unwrap();

    let updated = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            name: Some("New".to_string()),
            status: Some(ProjectStatus::OnHold),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "New");
    assert_eq!(updated.status, ProjectStatus::OnHold);
    assert_eq!(updated.revenue_earned, project.revenue_earned);
    assert_eq!(updated.billing_type, BillingType::TimeAndMaterials);

    let missing = ProjectRepo::update(&pool, 999_999, &UpdateProject::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn project_deadline_can_be_set_kept_and_cleared(pool: PgPool) {
    let client_id = seed_client(&pool, "Acme").await;
    let project = ProjectRepo::create(&pool, &new_project(client_id, "P", BillingType::FixedBid))
        .await
        .unwrap();

    let set = UpdateProject {
        deadline: Some(Some(date(2025, 6, 30))),
        ..Default::default()
    };
    let updated = ProjectRepo::update(&pool, project.id, &set).await.unwrap().unwrap();
    assert_eq!(updated.deadline, Some(date(2025, 6, 30)));

    let rename = UpdateProject {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let updated = ProjectRepo::update(&pool, project.id, &rename).await.unwrap().unwrap();
    assert_eq!(updated.deadline, Some(date(2025, 6, 30)));

    let clear = UpdateProject {
        deadline: Some(None),
        ..Default::default()
    };
    let updated = ProjectRepo::update(&pool, project.id, &clear).await.unwrap().unwrap();
    assert_eq!(updated.deadline, None);
    assert_eq!(updated.name, "Renamed");
}

// ---------------------------------------------------------------------------
// Allocations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn second_allocation_for_same_pair_updates_in_place(pool: PgPool) {
    let client_id = seed_client(&pool, "Acme").await;
    let project = ProjectRepo::create(&pool, &new_project(client_id, "P", BillingType::FixedBid))
        .await
        .unwrap();
    let employee = EmployeeRepo::create(&pool, &new_employee("Eve")).await.unwrap();

    let first = AllocationRepo::upsert(
        &pool,
        project.id,
        employee.id,
        dec!(50),
        AllocationUnit::Percentage,
        None,
        None,
    )
    .await
    .unwrap();
    assert!(first.inserted);

    let second = AllocationRepo::upsert(
        &pool,
        project.id,
        employee.id,
        dec!(75),
        AllocationUnit::Percentage,
        Some(date(2025, 2, 1)),
        None,
    )
    .await
    .unwrap();
    assert!(!second.inserted);
    assert_eq!(second.allocation.id, first.allocation.id);
    assert_eq!(second.allocation.allocation_value, dec!(75));
    assert_eq!(second.allocation.start_date, date(2025, 2, 1));

    let rows = AllocationRepo::list_for_project_with_employees(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].employee_name, "Eve");
    assert_eq!(rows[0].allocation.allocation_unit, AllocationUnit::Percentage);
}

#[sqlx::test(migrations = "./migrations")]
async fn allocation_for_unknown_employee_violates_foreign_key(pool: PgPool) {
    let client_id = seed_client(&pool, "Acme").await;
    let project = ProjectRepo::create(&pool, &new_project(client_id, "P", BillingType::FixedBid))
        .await
        .unwrap();

    let err = AllocationRepo::upsert(
        &pool,
        project.id,
        999_999,
        dec!(10),
        AllocationUnit::Hours,
        None,
        None,
    )
    .await
    .unwrap_err();

    assert_matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"));
}

#[sqlx::test(migrations = "./migrations")]
async fn rates_lookup_skips_unknown_ids(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("Finn")).await.unwrap();

    let rows = EmployeeRepo::rates_for_ids(&pool, &[employee.id, 424_242])
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, employee.id);
    assert_eq!(rows[0].hourly_rate, dec!(100));
}

// ---------------------------------------------------------------------------
// Cascades
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn deleting_project_or_employee_removes_allocations(pool: PgPool) {
    let client_id = seed_client(&pool, "Acme").await;
    let p1 = ProjectRepo::create(&pool, &new_project(client_id, "P1", BillingType::TimeAndMaterials))
        .await
        .unwrap();
    let p2 = ProjectRepo::create(&pool, &new_project(client_id, "P2", BillingType::TimeAndMaterials))
        .await
        .unwrap();
    let e1 = EmployeeRepo::create(&pool, &new_employee("A")).await.unwrap();
    let e2 = EmployeeRepo::create(&pool, &new_employee("B")).await.unwrap();

    for (p, e) in [(p1.id, e1.id), (p2.id, e1.id), (p2.id, e2.id)] {
        AllocationRepo::upsert(&pool, p, e, dec!(8), AllocationUnit::Hours, None, None)
            .await
            .unwrap();
    }

    assert_eq!(AllocationRepo::count_for_project(&pool, p2.id).await.unwrap(), 2);

    assert!(ProjectRepo::delete(&pool, p1.id).await.unwrap());
    let remaining = AllocationRepo::list_for_projects(&pool, &[p1.id, p2.id])
        .await
        .unwrap();
    assert_eq!(remaining.len(), 2);

    assert!(EmployeeRepo::delete(&pool, e2.id).await.unwrap());
    let remaining = AllocationRepo::list_for_projects(&pool, &[p2.id]).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].employee_id, e1.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_client_removes_projects(pool: PgPool) {
    let client_id = seed_client(&pool, "Gone").await;
    let project = ProjectRepo::create(&pool, &new_project(client_id, "P", BillingType::FixedValue))
        .await
        .unwrap();

    assert!(ClientRepo::delete(&pool, client_id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, project.id).await.unwrap().is_none());
    assert!(!ClientRepo::delete(&pool, client_id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn project_filters_and_count_agree(pool: PgPool) {
    let acme = seed_client(&pool, "Acme").await;
    let globex = seed_client(&pool, "Globex").await;

    let mut early = new_project(acme, "Portal", BillingType::TimeAndMaterials);
    early.start_date = Some(date(2024, 6, 1));
    ProjectRepo::create(&pool, &early).await.unwrap();
    ProjectRepo::create(&pool, &new_project(acme, "Mobile app", BillingType::FixedBid))
        .await
        .unwrap();
    ProjectRepo::create(&pool, &new_project(globex, "Data lake", BillingType::FixedBid))
        .await
        .unwrap();

    let by_client = ProjectFilter {
        search: Some("acme".to_string()),
        ..Default::default()
    };
    assert_eq!(ProjectRepo::count_filtered(&pool, &by_client).await.unwrap(), 2);

    let fixed_2025 = ProjectFilter {
        billing_type: Some(BillingType::FixedBid),
        start_from: Some(date(2025, 1, 1)),
        ..Default::default()
    };
    let rows = ProjectRepo::list_filtered(&pool, &fixed_2025, 20, 0).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(ProjectRepo::count_filtered(&pool, &fixed_2025).await.unwrap(), 2);

    let page = ProjectRepo::list_filtered(&pool, &ProjectFilter::default(), 2, 2)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);

    let started = ProjectRepo::list_started_between(&pool, None, Some(date(2024, 12, 31)))
        .await
        .unwrap();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].name, "Portal");
}

#[sqlx::test(migrations = "./migrations")]
async fn employee_list_filters_by_status(pool: PgPool) {
    let mut inactive = new_employee("Zed");
    inactive.status = Some(EmployeeStatus::Inactive);
    EmployeeRepo::create(&pool, &inactive).await.unwrap();
    EmployeeRepo::create(&pool, &new_employee("Amy")).await.unwrap();

    let all = EmployeeRepo::list(&pool, &EmployeeFilter::default()).await.unwrap();
    assert_eq!(all.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), ["Amy", "Zed"]);

    let active = EmployeeRepo::list(
        &pool,
        &EmployeeFilter {
            status: Some(EmployeeStatus::Active),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Amy");
}

#[sqlx::test(migrations = "./migrations")]
async fn expense_total_respects_date_range(pool: PgPool) {
    for (amount, day) in [(dec!(100), date(2025, 1, 5)), (dec!(250.50), date(2025, 2, 5))] {
        ExpenseRepo::create(
            &pool,
            &CreateExpense {
                category: "Travel".to_string(),
                amount,
                date: Some(day),
                description: None,
            },
        )
        .await
        .unwrap();
    }

    let everything = ExpenseRepo::total(&pool, &ExpenseFilter::default()).await.unwrap();
    assert_eq!(everything, dec!(350.50));

    let february = ExpenseFilter {
        from: Some(date(2025, 2, 1)),
        to: Some(date(2025, 2, 28)),
        ..Default::default()
    };
    assert_eq!(ExpenseRepo::total(&pool, &february).await.unwrap(), dec!(250.50));

    let none = ExpenseFilter {
        category: Some("Marketing".to_string()),
        ..Default::default()
    };
    assert_eq!(ExpenseRepo::total(&pool, &none).await.unwrap(), dec!(0));
}

#[sqlx::test(migrations = "./migrations")]
async fn negative_expense_violates_check(pool: PgPool) {
    let result = ExpenseRepo::create(
        &pool,
        &CreateExpense {
            category: "Other".to_string(),
            amount: dec!(-1),
            date: None,
            description: None,
        },
    )
    .await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Expense categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn default_categories_are_seeded_and_protected(pool: PgPool) {
    let categories = ExpenseCategoryRepo::list(&pool).await.unwrap();
    assert_eq!(categories.len(), 7);
    assert!(categories.iter().all(|c| c.is_default));

    let rent = categories.iter().find(|c| c.name == "Rent/Office").unwrap();
    assert!(!ExpenseCategoryRepo::delete_custom(&pool, rent.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn custom_category_unique_and_deletable(pool: PgPool) {
    let input = CreateExpenseCategory {
        name: "Hardware".to_string(),
    };
    let created = ExpenseCategoryRepo::create(&pool, &input).await.unwrap();
    assert!(!created.is_default);

    let err = ExpenseCategoryRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(db) if db.constraint() == Some("uq_expense_categories_name")
    );

    assert!(ExpenseCategoryRepo::delete_custom(&pool, created.id).await.unwrap());
}
