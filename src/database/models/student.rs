use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::analysis::metrics::SpendingProfile;

/// One row of the student spending dataset.
#[derive(FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub age: i64,
    pub gender: String,
    pub year_in_school: String, // freshman/sophomore/junior/senior
    pub major: String,
    pub monthly_income: i64,
    pub financial_aid: i64, // per semester
    pub tuition: i64,       // per semester
    pub housing: i64,
    pub food: i64,
    pub transportation: i64,
    pub books_supplies: i64, // per semester
    pub entertainment: i64,
    pub personal_care: i64,
    pub technology: i64,
    pub health_wellness: i64,
    pub miscellaneous: i64,
    pub preferred_payment_method: String,
}

/// Insert/update payload; also the shape of one CSV row (the dataset's
/// leading unnamed index column is ignored during deserialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub age: i64,
    pub gender: String,
    pub year_in_school: String,
    pub major: String,
    pub monthly_income: i64,
    pub financial_aid: i64,
    pub tuition: i64,
    pub housing: i64,
    pub food: i64,
    pub transportation: i64,
    pub books_supplies: i64,
    pub entertainment: i64,
    pub personal_care: i64,
    pub technology: i64,
    pub health_wellness: i64,
    pub miscellaneous: i64,
    pub preferred_payment_method: String,
}

impl From<&Student> for SpendingProfile {
    fn from(student: &Student) -> Self {
        SpendingProfile {
            monthly_income: student.monthly_income as f64,
            financial_aid: student.financial_aid as f64,
            tuition: student.tuition as f64,
            housing: student.housing as f64,
            food: student.food as f64,
            transportation: student.transportation as f64,
            books_supplies: student.books_supplies as f64,
            entertainment: student.entertainment as f64,
            personal_care: student.personal_care as f64,
            technology: student.technology as f64,
            health_wellness: student.health_wellness as f64,
            miscellaneous: student.miscellaneous as f64,
        }
    }
}
