//! Environment-variable configuration, loaded once at startup.

use anyhow::{ensure, Context, Result};
use std::env;
use std::path::PathBuf;

use crate::analysis::metrics::ScalarKind;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub port: u16,
    pub csv_path: PathBuf,
    pub model_path: PathBuf,
    /// Semester-to-monthly divisor used by the metrics endpoint
    /// (historically 4).
    pub metrics_divisor: f64,
    /// Semester-to-monthly divisor used by the classification endpoint
    /// (historically 6).
    pub classify_divisor: f64,
    /// Which scalar feeds the classifier's x-axis.
    pub classify_scalar: ScalarKind,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let port = env_or("PORT", "8000")
            .parse()
            .context("PORT must be a port number")?;
        let csv_path = PathBuf::from(env_or("CSV_PATH", "./student_spending.csv"));
        let model_path = PathBuf::from(env_or("MODEL_PATH", "./boundary_model.json"));
        let metrics_divisor = parse_divisor("METRICS_SEMESTER_DIVISOR", "4")?;
        let classify_divisor = parse_divisor("CLASSIFY_SEMESTER_DIVISOR", "6")?;
        let classify_scalar = env_or("CLASSIFY_SCALAR", "margin")
            .parse::<ScalarKind>()
            .map_err(anyhow::Error::msg)?;

        Ok(Settings {
            database_url,
            port,
            csv_path,
            model_path,
            metrics_divisor,
            classify_divisor,
            classify_scalar,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_divisor(key: &str, default: &str) -> Result<f64> {
    let value: f64 = env_or(key, default)
        .parse()
        .with_context(|| format!("{key} must be a number"))?;
    ensure!(
        value.is_finite() && value > 0.0,
        "{key} must be a positive number"
    );
    Ok(value)
}
