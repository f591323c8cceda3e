//! Converts a raw spending profile into monthly-equivalent figures.
//!
//! Tuition, financial aid and books/supplies are billed per semester, so they
//! are divided by a caller-chosen divisor before entering the monthly totals.
//! Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which scalar feeds the classifier's x-axis.
///
/// `Margin` is monthly spending minus monthly income (signed dollars);
/// `Ratio` is spending divided by income (unit-less). Callers pick one
/// explicitly rather than relying on a hidden default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Margin,
    Ratio,
}

impl FromStr for ScalarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "margin" => Ok(ScalarKind::Margin),
            "ratio" => Ok(ScalarKind::Ratio),
            other => Err(format!(
                "unknown scalar kind '{other}', expected 'margin' or 'ratio'"
            )),
        }
    }
}

/// Monetary portion of a student record, as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingProfile {
    pub monthly_income: f64,
    pub financial_aid: f64,
    pub tuition: f64,
    pub housing: f64,
    pub food: f64,
    pub transportation: f64,
    pub books_supplies: f64,
    pub entertainment: f64,
    pub personal_care: f64,
    pub technology: f64,
    pub health_wellness: f64,
    pub miscellaneous: f64,
}

impl SpendingProfile {
    /// Field name / value pairs, used for request validation.
    pub fn monetary_fields(&self) -> [(&'static str, f64); 12] {
        [
            ("monthly_income", self.monthly_income),
            ("financial_aid", self.financial_aid),
            ("tuition", self.tuition),
            ("housing", self.housing),
            ("food", self.food),
            ("transportation", self.transportation),
            ("books_supplies", self.books_supplies),
            ("entertainment", self.entertainment),
            ("personal_care", self.personal_care),
            ("technology", self.technology),
            ("health_wellness", self.health_wellness),
            ("miscellaneous", self.miscellaneous),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub monthly_income: f64,
    pub monthly_spending: f64,
    pub budget_margin: f64,
    pub savings_amount: f64,
    pub savings_rate: f64,
    pub user_point_x: f64,
    pub user_point_y: f64,
}

/// Derives monthly income, spending, margin and savings figures from a raw
/// profile. `divisor` converts the semester-billed fields to the reporting
/// period and must be positive; `scalar` picks the x coordinate of the
/// plotting point.
pub fn normalize(profile: &SpendingProfile, divisor: f64, scalar: ScalarKind) -> NormalizedMetrics {
    let adjusted_financial_aid = profile.financial_aid / divisor;
    let adjusted_tuition = profile.tuition / divisor;
    let adjusted_books_supplies = profile.books_supplies / divisor;

    let monthly_income = profile.monthly_income + adjusted_financial_aid;

    // Every monetary field except income and aid, with the semester-billed
    // ones period-adjusted.
    let monthly_spending = adjusted_tuition
        + profile.housing
        + profile.food
        + profile.transportation
        + adjusted_books_supplies
        + profile.entertainment
        + profile.personal_care
        + profile.technology
        + profile.health_wellness
        + profile.miscellaneous;

    let savings_amount = monthly_income - monthly_spending;
    let budget_margin = savings_amount;

    // Defined as 0 for zero income rather than dividing by zero.
    let savings_rate = if monthly_income == 0.0 {
        0.0
    } else {
        savings_amount / monthly_income * 100.0
    };

    let user_point_x = match scalar {
        ScalarKind::Margin => monthly_spending - monthly_income,
        ScalarKind::Ratio => {
            if monthly_income == 0.0 {
                0.0
            } else {
                monthly_spending / monthly_income
            }
        }
    };

    NormalizedMetrics {
        monthly_income,
        monthly_spending,
        budget_margin,
        savings_amount,
        savings_rate,
        user_point_x,
        user_point_y: monthly_spending,
    }
}
