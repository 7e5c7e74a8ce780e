use deunicode::deunicode;

use super::{METRIC_EMPTY_PLACEHOLDER, PREFIX_UNICODE};

/// Normalizes a raw name segment into a statsd-safe token.
///
/// Dots are the statsd hierarchy separator, so literal underscores are
/// doubled *first* and literal dots then become single underscores; an
/// original dot can never collide with a doubled underscore. The doubling
/// is intentionally not idempotent: re-sanitizing `"a__b"` yields
/// `"a____b"`.
///
/// With `uni_decode` set, non-ASCII input is transliterated to its
/// closest ASCII approximation and prefixed with `"-u-"` whenever the
/// transliteration is lossy.
pub fn sanitize_metric_name(metric: &str, uni_decode: bool) -> String {
    if metric.is_empty() {
        return METRIC_EMPTY_PLACEHOLDER.to_string();
    }

    transliterate(metric, uni_decode)
        .replace('_', "__")
        .replace('.', "_")
}

pub(super) fn transliterate(metric: &str, uni_decode: bool) -> String {
    if uni_decode {
        let ascii = deunicode(metric);
        if ascii != metric {
            return format!("{}{}", PREFIX_UNICODE, ascii);
        }
    }
    metric.to_string()
}

#[cfg(test)]
mod tests {
    use super::sanitize_metric_name;

    #[test]
    fn empty_maps_to_placeholder() {
        assert_eq!("-", sanitize_metric_name("", false));
    }

    #[test]
    fn unicode_is_transliterated_and_marked() {
        assert_eq!("-u-iunikod", sanitize_metric_name("юникод", true));
        assert_eq!("-u-Apollon", sanitize_metric_name("Ἀπόλλων", true));
        assert_eq!("-u-acougue", sanitize_metric_name("açougue", true));
    }

    #[test]
    fn unicode_passes_through_when_disabled() {
        assert_eq!("юникод", sanitize_metric_name("юникод", false));
        assert_eq!("Ἀπόλλων", sanitize_metric_name("Ἀπόλλων", false));
        assert_eq!("açougue", sanitize_metric_name("açougue", false));
    }

    #[test]
    fn escapes_dots_and_underscores() {
        assert_eq!("metric", sanitize_metric_name("metric", true));
        assert_eq!("metric_with_dots", sanitize_metric_name("metric.with.dots", true));
        assert_eq!(
            "metric__with__underscores",
            sanitize_metric_name("metric_with_underscores", true)
        );
        assert_eq!(
            "metric_with_dots__and__underscores",
            sanitize_metric_name("metric.with.dots_and_underscores", true)
        );
    }

    #[test]
    fn transliterated_name_is_escaped_too() {
        assert_eq!("-u-iunikod_metrika", sanitize_metric_name("юникод.метрика", true));
    }

    #[test]
    fn doubling_is_not_idempotent() {
        assert_eq!("a____b", sanitize_metric_name("a__b", false));
    }
}
