//! Числовые выражения в полях свойств ("100 + 80 * 2", "PI / 2").

use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Value};
use thiserror::Error;

/// Ошибки вычисления выражения
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("evaluation error: {0}")]
    Evaluation(String),
    #[error("expected a number, got {0}")]
    NotANumber(String),
}

/// Вычислить выражение в число с плавающей точкой.
///
/// Доступны константы `PI` и `E`. Нечисловые результаты и NaN/inf отклоняются.
pub fn eval_number(expression: &str) -> Result<f64, ExprError> {
    let trimmed = expression.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return Ok(v);
        }
    }

    let mut context = HashMapContext::new();
    context
        .set_value("PI".to_string(), Value::Float(std::f64::consts::PI))
        .ok();
    context
        .set_value("E".to_string(), Value::Float(std::f64::consts::E))
        .ok();

    let tree = build_operator_tree(trimmed).map_err(|e| ExprError::Parse(e.to_string()))?;
    let value = tree
        .eval_with_context(&context)
        .map_err(|e| ExprError::Evaluation(e.to_string()))?;

    let number = match value {
        Value::Float(f) => f,
        Value::Int(i) => i as f64,
        other => return Err(ExprError::NotANumber(format!("{:?}", other))),
    };
    if number.is_finite() {
        Ok(number)
    } else {
        Err(ExprError::NotANumber(number.to_string()))
    }
}
