use super::sanitize::sanitize_metric_name;
use super::{operation_status, Bucket, MetricOperation, TOTAL_BUCKET};

/// Dot-delimited name builder for statsd-style backends.
///
/// Produces names of the form:
/// - `metric()` -> `<section>.<op0>.<op1>.<op2>`
/// - `metric_with_suffix()` -> `<section>-ok|fail.<op0>.<op1>.<op2>`
/// - `metric_total()` -> `total.<section>`
/// - `metric_total_with_suffix()` -> `total.<section>-ok|fail`
///
/// Placeholder slots are preserved in the join, keeping the name arity
/// fixed. Section and every slot pass through [`sanitize_metric_name`].
pub struct Plain {
    section: String,
    operation: String,
    success: bool,
}

impl Plain {
    pub fn new(section: &str, operation: &MetricOperation, success: bool, uni_decode: bool) -> Self {
        let sanitized: Vec<String> = operation
            .parts()
            .iter()
            .map(|part| sanitize_metric_name(part, uni_decode))
            .collect();
        Plain {
            section: sanitize_metric_name(section, uni_decode),
            operation: sanitized.join("."),
            success,
        }
    }
}

impl Bucket for Plain {
    fn metric(&self) -> String {
        format!("{}.{}", self.section, self.operation)
    }

    fn metric_with_suffix(&self) -> String {
        format!(
            "{}-{}.{}",
            self.section,
            operation_status(self.success),
            self.operation
        )
    }

    fn metric_total(&self) -> String {
        format!("{}.{}", TOTAL_BUCKET, self.section)
    }

    fn metric_total_with_suffix(&self) -> String {
        format!(
            "{}.{}-{}",
            TOTAL_BUCKET,
            self.section,
            operation_status(self.success)
        )
    }
}
