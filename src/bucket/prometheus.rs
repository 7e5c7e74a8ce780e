use super::sanitize::transliterate;
use super::{operation_status, Bucket, MetricOperation, TOTAL_BUCKET};

/// Underscore-delimited name builder for the Prometheus backend.
///
/// Produces names of the form:
/// - `metric()` -> `<section>_<op0>_<op1>_<op2>`
/// - `metric_with_suffix()` -> `<section>-ok|fail_<op0>_<op1>_<op2>`
/// - `metric_total()` -> `total_<section>`
/// - `metric_total_with_suffix()` -> `total_<section>-ok|fail`
///
/// Slots that sanitize to the empty string are dropped from the join;
/// Prometheus forbids trailing underscores in metric names.
pub struct Prometheus {
    section: String,
    operation: String,
    success: bool,
}

impl Prometheus {
    pub fn new(section: &str, operation: &MetricOperation, success: bool, uni_decode: bool) -> Self {
        let sanitized: Vec<String> = operation
            .parts()
            .iter()
            .map(|part| sanitize_prometheus_metric_name(part, uni_decode))
            .filter(|part| !part.is_empty())
            .collect();
        Prometheus {
            section: sanitize_prometheus_metric_name(section, uni_decode),
            operation: sanitized.join("_"),
            success,
        }
    }
}

impl Bucket for Prometheus {
    fn metric(&self) -> String {
        format!("{}_{}", self.section, self.operation)
    }

    fn metric_with_suffix(&self) -> String {
        format!(
            "{}-{}_{}",
            self.section,
            operation_status(self.success),
            self.operation
        )
    }

    fn metric_total(&self) -> String {
        format!("{}_{}", TOTAL_BUCKET, self.section)
    }

    fn metric_total_with_suffix(&self) -> String {
        format!(
            "{}_{}-{}",
            TOTAL_BUCKET,
            self.section,
            operation_status(self.success)
        )
    }
}

/// Normalizes a raw name segment into a Prometheus-safe token.
///
/// Unlike the statsd policy, separators that Prometheus cannot carry are
/// stripped rather than escaped: hyphens and underscores are removed and
/// dots become single underscores. Empty input stays empty so the caller
/// can drop the token from the join. The empty-placeholder slot `"-"`
/// reduces to the empty string here, which is how placeholders disappear
/// from Prometheus names.
pub fn sanitize_prometheus_metric_name(metric: &str, uni_decode: bool) -> String {
    if metric.is_empty() {
        return String::new();
    }

    transliterate(metric, uni_decode)
        .replace('-', "")
        .replace('_', "")
        .replace('.', "_")
}

#[cfg(test)]
mod tests {
    use super::{sanitize_prometheus_metric_name, Prometheus};
    use crate::bucket::{Bucket, MetricOperation, METRIC_EMPTY_PLACEHOLDER};

    fn bucket(section: &str, parts: [&str; 3], success: bool) -> Prometheus {
        Prometheus::new(section, &MetricOperation::new(parts), success, true)
    }

    #[test]
    fn metric() {
        let cases = [
            ("foo", ["bar", "baz", "qaz"], "foo_bar_baz_qaz"),
            ("foo", ["bar", "baz", METRIC_EMPTY_PLACEHOLDER], "foo_bar_baz"),
            ("foo", ["bar", "dot.baz", METRIC_EMPTY_PLACEHOLDER], "foo_bar_dot_baz"),
            (
                "foo",
                ["bar", "underscore_baz", METRIC_EMPTY_PLACEHOLDER],
                "foo_bar_underscorebaz",
            ),
            (
                "foo.foo",
                ["bar", "underscore_baz", METRIC_EMPTY_PLACEHOLDER],
                "foo_foo_bar_underscorebaz",
            ),
        ];
        for (section, parts, expected) in cases {
            assert_eq!(expected, bucket(section, parts, true).metric());
        }
    }

    #[test]
    fn metric_with_suffix() {
        let b = bucket("foo", ["bar", "baz", METRIC_EMPTY_PLACEHOLDER], true);
        assert_eq!("foo-ok_bar_baz", b.metric_with_suffix());
        let b = bucket("foo", ["bar", "baz", METRIC_EMPTY_PLACEHOLDER], false);
        assert_eq!("foo-fail_bar_baz", b.metric_with_suffix());
    }

    #[test]
    fn metric_total() {
        for success in [true, false] {
            assert_eq!("total_foo", bucket("foo", ["bar", "baz", "qaz"], success).metric_total());
        }
    }

    #[test]
    fn metric_total_with_suffix() {
        let b = bucket("foo", ["bar", "baz", "qaz"], true);
        assert_eq!("total_foo-ok", b.metric_total_with_suffix());
        let b = bucket("foo", ["bar", "baz", "qaz"], false);
        assert_eq!("total_foo-fail", b.metric_total_with_suffix());
    }

    #[test]
    fn sanitize_strips_instead_of_escaping() {
        assert_eq!("", sanitize_prometheus_metric_name("", true));
        assert_eq!("", sanitize_prometheus_metric_name("-", true));
        assert_eq!("id", sanitize_prometheus_metric_name("-id-", true));
        assert_eq!("underscorebaz", sanitize_prometheus_metric_name("underscore_baz", true));
        assert_eq!("dot_baz", sanitize_prometheus_metric_name("dot.baz", true));
    }

    #[test]
    fn transliteration_marker_loses_its_hyphens() {
        // The "-u-" marker is applied before hyphen stripping.
        assert_eq!("uiunikod", sanitize_prometheus_metric_name("юникод", true));
    }
}
