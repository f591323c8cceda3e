// src/backend/handlers.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::classifier::{self, BoundaryCoordinates, Category};
use crate::analysis::metrics::{self, NormalizedMetrics, SpendingProfile};
use crate::backend::{AppError, AppState};
use crate::database::db::queries;
use crate::database::models::{NewStudent, Student};

/// Number of x samples used to draw each decision boundary.
const BOUNDARY_SAMPLES: usize = 100;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub metrics: NormalizedMetrics,
    pub all_users_average: BTreeMap<String, f64>,
    pub current_user: SpendingProfile,
}

#[derive(Debug, Serialize)]
pub struct InitialDataResponse {
    /// [label, x, y] for the submitted profile.
    pub category: (Category, f64, f64),
    pub boundary_coordinates: BoundaryCoordinates,
    /// Every stored record classified into [label, x, y].
    pub dataset_points: Vec<(Category, f64, f64)>,
    pub all_users_average: BTreeMap<String, f64>,
}

/*==========Student CRUD===========*/

pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(queries::get_all_students(&state.db).await?))
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<NewStudent>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = queries::create_student(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Student>, AppError> {
    queries::get_student_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("student {id} not found")))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewStudent>,
) -> Result<Json<MessageResponse>, AppError> {
    if !queries::update_student(&state.db, id, &payload).await? {
        return Err(AppError::NotFound(format!("student {id} not found")));
    }
    Ok(Json(MessageResponse {
        message: format!("student {id} updated"),
    }))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !queries::delete_student(&state.db, id).await? {
        return Err(AppError::NotFound(format!("student {id} not found")));
    }
    Ok(Json(MessageResponse {
        message: format!("student {id} deleted"),
    }))
}

/*==========Analysis Endpoints===========*/

// Monthly metrics for a submitted profile, semester fields divided by the
// metrics divisor, plus dataset-wide averages for the comparison chart.
pub async fn calculate_financial_metrics(
    State(state): State<AppState>,
    Json(profile): Json<SpendingProfile>,
) -> Result<Json<MetricsResponse>, AppError> {
    validate_profile(&profile)?;

    let metrics = metrics::normalize(
        &profile,
        state.settings.metrics_divisor,
        metrics::ScalarKind::Margin,
    );
    let all_users_average = queries::field_averages(&state.db).await?;

    Ok(Json(MetricsResponse {
        metrics,
        all_users_average,
        current_user: profile,
    }))
}

// Classifies the submitted profile and the whole stored dataset, and returns
// the boundary geometry needed to plot them.
pub async fn initial_data(
    State(state): State<AppState>,
    Json(profile): Json<SpendingProfile>,
) -> Result<Json<InitialDataResponse>, AppError> {
    validate_profile(&profile)?;

    let model = state.models.get().await?;
    let divisor = state.settings.classify_divisor;
    let scalar = state.settings.classify_scalar;

    let user = metrics::normalize(&profile, divisor, scalar);
    let user_category = classifier::classify(&model, user.user_point_x, user.user_point_y);

    let students = queries::get_all_students(&state.db).await?;
    let mut dataset_points = Vec::with_capacity(students.len());
    for student in &students {
        let point = metrics::normalize(&SpendingProfile::from(student), divisor, scalar);
        let label = classifier::classify(&model, point.user_point_x, point.user_point_y);
        dataset_points.push((label, point.user_point_x, point.user_point_y));
    }

    let xs = sample_xs(user.user_point_x, dataset_points.iter().map(|p| p.1));
    let boundary_coordinates = classifier::boundary_lines(&model, &xs)?;

    let all_users_average = queries::field_averages(&state.db).await?;

    Ok(Json(InitialDataResponse {
        category: (user_category, user.user_point_x, user.user_point_y),
        boundary_coordinates,
        dataset_points,
        all_users_average,
    }))
}

// Evenly spaced x samples spanning the user point and the dataset.
fn sample_xs(user_x: f64, dataset_xs: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut min_x = user_x;
    let mut max_x = user_x;
    for x in dataset_xs {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if max_x - min_x < f64::EPSILON {
        min_x -= 1.0;
        max_x += 1.0;
    }

    let span = max_x - min_x;
    (0..BOUNDARY_SAMPLES)
        .map(|i| min_x + span * (i as f64 / (BOUNDARY_SAMPLES - 1) as f64))
        .collect()
}

// Every monetary field must be a non-negative, finite number before the
// normalizer sees it.
fn validate_profile(profile: &SpendingProfile) -> Result<(), AppError> {
    for (name, value) in profile.monetary_fields() {
        if !value.is_finite() {
            return Err(AppError::Validation(format!(
                "field '{name}' must be a finite number"
            )));
        }
        if value < 0.0 {
            return Err(AppError::Validation(format!(
                "field '{name}' must be non-negative"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_xs_span_the_dataset_and_user() {
        let xs = sample_xs(0.0, [-500.0, 250.0].into_iter());
        assert_eq!(xs.len(), BOUNDARY_SAMPLES);
        assert_eq!(xs[0], -500.0);
        assert_eq!(*xs.last().unwrap(), 250.0);
    }

    #[test]
    fn sample_xs_widen_a_degenerate_range() {
        let xs = sample_xs(10.0, std::iter::empty());
        assert_eq!(xs.len(), BOUNDARY_SAMPLES);
        assert_eq!(xs[0], 9.0);
        assert_eq!(*xs.last().unwrap(), 11.0);
    }

    #[test]
    fn validation_rejects_negative_and_non_finite_fields() {
        let mut profile = SpendingProfile {
            monthly_income: 1000.0,
            financial_aid: 0.0,
            tuition: 0.0,
            housing: 0.0,
            food: 0.0,
            transportation: 0.0,
            books_supplies: 0.0,
            entertainment: 0.0,
            personal_care: 0.0,
            technology: 0.0,
            health_wellness: 0.0,
            miscellaneous: 0.0,
        };
        assert!(validate_profile(&profile).is_ok());

        profile.food = -1.0;
        assert!(validate_profile(&profile).is_err());

        profile.food = f64::NAN;
        assert!(validate_profile(&profile).is_err());
    }
}
