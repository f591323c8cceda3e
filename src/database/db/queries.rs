use sqlx::{Pool, Row, Sqlite};
use std::collections::BTreeMap;

use crate::database::models::{NewStudent, Student};

/*
This file contains the specific SQL query,
CRUD (Create, Read, Update, Delete) logic
and is responsible for interacting with the database.
 */

/// Monetary columns averaged for the all-users comparison chart.
pub const MONETARY_COLUMNS: [&str; 12] = [
    "monthly_income",
    "financial_aid",
    "tuition",
    "housing",
    "food",
    "transportation",
    "books_supplies",
    "entertainment",
    "personal_care",
    "technology",
    "health_wellness",
    "miscellaneous",
];

const STUDENT_COLUMNS: &str = "id, age, gender, year_in_school, major, monthly_income, \
    financial_aid, tuition, housing, food, transportation, books_supplies, entertainment, \
    personal_care, technology, health_wellness, miscellaneous, preferred_payment_method";

/*==========Student Queries===========*/

// Create student (also used row-by-row by the CSV seed, inside a transaction)
pub async fn create_student<'e, E>(executor: E, student: &NewStudent) -> Result<i64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        INSERT INTO students (
            age, gender, year_in_school, major, monthly_income, financial_aid, tuition,
            housing, food, transportation, books_supplies, entertainment, personal_care,
            technology, health_wellness, miscellaneous, preferred_payment_method
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(student.age)
    .bind(&student.gender)
    .bind(&student.year_in_school)
    .bind(&student.major)
    .bind(student.monthly_income)
    .bind(student.financial_aid)
    .bind(student.tuition)
    .bind(student.housing)
    .bind(student.food)
    .bind(student.transportation)
    .bind(student.books_supplies)
    .bind(student.entertainment)
    .bind(student.personal_care)
    .bind(student.technology)
    .bind(student.health_wellness)
    .bind(student.miscellaneous)
    .bind(&student.preferred_payment_method)
    .fetch_one(executor)
    .await?;

    row.try_get("id")
}

// Get student by id
pub async fn get_student_by_id(
    pool: &Pool<Sqlite>,
    id: i64,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

// Get all students
pub async fn get_all_students(pool: &Pool<Sqlite>) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id ASC"
    ))
    .fetch_all(pool)
    .await
}

// Update student
pub async fn update_student(
    pool: &Pool<Sqlite>,
    id: i64,
    student: &NewStudent,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET age = ?, gender = ?, year_in_school = ?, major = ?, monthly_income = ?,
            financial_aid = ?, tuition = ?, housing = ?, food = ?, transportation = ?,
            books_supplies = ?, entertainment = ?, personal_care = ?, technology = ?,
            health_wellness = ?, miscellaneous = ?, preferred_payment_method = ?
        WHERE id = ?
        "#,
    )
    .bind(student.age)
    .bind(&student.gender)
    .bind(&student.year_in_school)
    .bind(&student.major)
    .bind(student.monthly_income)
    .bind(student.financial_aid)
    .bind(student.tuition)
    .bind(student.housing)
    .bind(student.food)
    .bind(student.transportation)
    .bind(student.books_supplies)
    .bind(student.entertainment)
    .bind(student.personal_care)
    .bind(student.technology)
    .bind(student.health_wellness)
    .bind(student.miscellaneous)
    .bind(&student.preferred_payment_method)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Delete student
pub async fn delete_student(pool: &Pool<Sqlite>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_students(pool: &Pool<Sqlite>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(pool)
        .await
}

/*==========Aggregate Queries===========*/

// Dataset-wide mean of every monetary column. Empty table yields zeros.
pub async fn field_averages(pool: &Pool<Sqlite>) -> Result<BTreeMap<String, f64>, sqlx::Error> {
    let select = MONETARY_COLUMNS
        .iter()
        .map(|column| format!("AVG({column}) AS {column}"))
        .collect::<Vec<_>>()
        .join(", ");

    let row = sqlx::query(&format!("SELECT {select} FROM students"))
        .fetch_one(pool)
        .await?;

    let mut averages = BTreeMap::new();
    for column in MONETARY_COLUMNS {
        let value: Option<f64> = row.try_get(column)?;
        averages.insert(column.to_string(), value.unwrap_or(0.0));
    }
    Ok(averages)
}
