use crate::config::BindingRules;
use crate::table::CellValue;

/// Maps a raw cell value to a color or text through a rule set.
pub trait BindingEvaluator {
    /// `None` when the rules yield nothing to show.
    fn evaluate(&self, value: &CellValue, rules: &BindingRules) -> Option<String>;
}

/// Exact value bindings win, then the highest numeric threshold not above
/// the value, then the unbounded default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEvaluator;

impl BindingEvaluator for ThresholdEvaluator {
    fn evaluate(&self, value: &CellValue, rules: &BindingRules) -> Option<String> {
        let text = value.to_string();
        let result = if let Some(b) = rules.bindings.iter().find(|b| b.value == text) {
            &b.result
        } else if let Some(v) = value.as_f64()
            && let Some(t) = rules
                .thresholds
                .iter()
                .filter(|t| t.value <= v)
                .max_by(|a, b| a.value.total_cmp(&b.value))
        {
            &t.result
        } else {
            &rules.unbounded
        };

        if result.is_empty() {
            None
        } else {
            Some(result.clone())
        }
    }
}
