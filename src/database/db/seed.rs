//! One-time CSV bulk load of the student spending dataset.

use anyhow::{Context, Result};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::info;

use crate::database::db::queries;
use crate::database::models::NewStudent;

/// Loads the dataset CSV into the students table unless the table already
/// contains data, making startup idempotent. Returns the number of rows
/// inserted (0 when the import was skipped).
///
/// All rows go in inside a single transaction, so a malformed CSV leaves the
/// table untouched.
pub async fn load_csv_if_empty(pool: &Pool<Sqlite>, csv_path: &Path) -> Result<usize> {
    if queries::count_students(pool).await? > 0 {
        info!("students table already contains data, skipping CSV import");
        return Ok(0);
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open dataset CSV {}", csv_path.display()))?;

    // Header-based deserialization, so the dataset's leading unnamed index
    // column is simply not mapped to any field.
    let mut records = Vec::new();
    for (line, result) in reader.deserialize::<NewStudent>().enumerate() {
        let record = result
            .with_context(|| format!("invalid record on CSV line {}", line + 2))?;
        records.push(record);
    }

    let mut tx = pool.begin().await?;
    for record in &records {
        queries::create_student(&mut *tx, record).await?;
    }
    tx.commit().await?;

    info!(rows = records.len(), "loaded student spending CSV");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::migrate::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    const SAMPLE_CSV: &str = "\
,age,gender,year_in_school,major,monthly_income,financial_aid,tuition,housing,food,transportation,books_supplies,entertainment,personal_care,technology,health_wellness,miscellaneous,preferred_payment_method
0,19,Female,Freshman,Psychology,1020,4500,4800,600,340,90,420,110,60,140,90,70,Credit/Debit Card
1,22,Male,Senior,Computer Science,1180,2000,5200,720,410,130,380,160,40,220,60,110,Mobile Payment App
";

    async fn test_pool() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn loads_rows_and_skips_the_index_column() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("student_spending.csv");
        std::fs::write(&path, SAMPLE_CSV).unwrap();

        let inserted = load_csv_if_empty(&pool, &path).await.unwrap();
        assert_eq!(inserted, 2);

        let students = queries::get_all_students(&pool).await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].age, 19);
        assert_eq!(students[0].major, "Psychology");
        assert_eq!(students[1].monthly_income, 1180);
        assert_eq!(students[1].preferred_payment_method, "Mobile Payment App");
    }

    #[tokio::test]
    async fn second_load_is_a_no_op() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("student_spending.csv");
        std::fs::write(&path, SAMPLE_CSV).unwrap();

        assert_eq!(load_csv_if_empty(&pool, &path).await.unwrap(), 2);
        assert_eq!(load_csv_if_empty(&pool, &path).await.unwrap(), 0);
        assert_eq!(queries::count_students(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn malformed_csv_leaves_the_table_empty() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("student_spending.csv");
        std::fs::write(
            &path,
            ",age,gender,year_in_school,major,monthly_income,financial_aid,tuition,housing,food,transportation,books_supplies,entertainment,personal_care,technology,health_wellness,miscellaneous,preferred_payment_method\n0,not-a-number,Female,Freshman,Psychology,1,2,3,4,5,6,7,8,9,10,11,12,Cash\n",
        )
        .unwrap();

        assert!(load_csv_if_empty(&pool, &path).await.is_err());
        assert_eq!(queries::count_students(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_csv_is_an_error() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();

        assert!(load_csv_if_empty(&pool, &dir.path().join("missing.csv"))
            .await
            .is_err());
    }
}
