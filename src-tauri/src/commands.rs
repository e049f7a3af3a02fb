use crate::charts::all_charts;
use crate::errors::{AppError, AppResult};
use crate::models::{CalculatorSnapshot, ChartBundle, UpdateQuotaPayload, UpdateRatePayload};
use crate::state::CalculatorState;
use crate::telemetry::{init_tracing, LogOptions};
use anyhow::Context;
use std::sync::Mutex;
use tauri::Manager;

#[derive(Default)]
struct AppState {
    calculator: Mutex<CalculatorState>,
}

impl AppState {
    fn with_calculator<T>(&self, f: impl FnOnce(&mut CalculatorState) -> T) -> AppResult<T> {
        let mut calculator = self
            .calculator
            .lock()
            .map_err(|_| AppError::Internal("calculator state lock poisoned".to_string()))?;
        Ok(f(&mut calculator))
    }
}

#[tauri::command]
fn get_snapshot(state: tauri::State<'_, AppState>) -> Result<CalculatorSnapshot, String> {
    state
        .with_calculator(|calculator| calculator.snapshot())
        .map_err(to_client_error)
}

#[tauri::command]
fn update_quota(state: tauri::State<'_, AppState>, payload: UpdateQuotaPayload) -> Result<CalculatorSnapshot, String> {
    state
        .with_calculator(|calculator| {
            calculator.set_quota(payload.field, &payload.value);
            calculator.snapshot()
        })
        .map_err(to_client_error)
}

#[tauri::command]
fn update_rate(state: tauri::State<'_, AppState>, payload: UpdateRatePayload) -> Result<CalculatorSnapshot, String> {
    state
        .with_calculator(|calculator| {
            calculator.set_rate(payload.field, &payload.value);
            calculator.snapshot()
        })
        .map_err(to_client_error)
}

#[tauri::command]
fn reset_inputs(state: tauri::State<'_, AppState>) -> Result<CalculatorSnapshot, String> {
    state
        .with_calculator(|calculator| {
            calculator.reset();
            calculator.snapshot()
        })
        .map_err(to_client_error)
}

#[tauri::command]
fn get_charts(state: tauri::State<'_, AppState>) -> Result<ChartBundle, String> {
    state
        .with_calculator(|calculator| all_charts(&calculator.snapshot()))
        .map_err(to_client_error)
}

pub fn run_desktop(log_options: LogOptions) -> AppResult<()> {
    tauri::Builder::default()
        .setup(move |app| {
            let log_dir = match log_options.log_dir.clone() {
                Some(dir) => dir,
                None => app.path().app_data_dir()?.join("logs"),
            };
            init_tracing(&LogOptions {
                default_filter: "info",
                log_dir: Some(log_dir),
                ..log_options.clone()
            })?;
            tracing::info!("desktop shell started");
            Ok(())
        })
        .manage(AppState::default())
        .invoke_handler(tauri::generate_handler![
            get_snapshot,
            update_quota,
            update_rate,
            reset_inputs,
            get_charts
        ])
        .run(tauri::generate_context!())
        .context("failed to run desktop shell")?;
    Ok(())
}

fn to_client_error(error: impl std::fmt::Display) -> String {
    error.to_string()
}
