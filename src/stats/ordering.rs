//! Total orders over samples. Dictionary-backed fields compare by reference.
use std::cmp::Ordering;

use crate::codec::Sample;

/// Shortest first; ties broken by the remaining fields.
#[must_use]
pub fn by_duration(left: &Sample, right: &Sample) -> Ordering {
    left.duration_millis
        .cmp(&right.duration_millis)
        .then_with(|| left.offset_millis.cmp(&right.offset_millis))
        .then_with(|| left.label_ref.cmp(&right.label_ref))
        .then_with(|| rest(left, right))
}

/// Earliest first.
#[must_use]
pub fn by_offset(left: &Sample, right: &Sample) -> Ordering {
    left.offset_millis
        .cmp(&right.offset_millis)
        .then_with(|| left.duration_millis.cmp(&right.duration_millis))
        .then_with(|| left.label_ref.cmp(&right.label_ref))
        .then_with(|| rest(left, right))
}

/// Grouped by label, earliest first within a label.
#[must_use]
pub fn by_label_offset(left: &Sample, right: &Sample) -> Ordering {
    left.label_ref
        .cmp(&right.label_ref)
        .then_with(|| left.offset_millis.cmp(&right.offset_millis))
        .then_with(|| left.duration_millis.cmp(&right.duration_millis))
        .then_with(|| rest(left, right))
}

fn rest(left: &Sample, right: &Sample) -> Ordering {
    left.thread_name_ref
        .cmp(&right.thread_name_ref)
        .then_with(|| left.response_bytes.cmp(&right.response_bytes))
        .then_with(|| left.status_ref.cmp(&right.status_ref))
        // Successes sort ahead of failures.
        .then_with(|| right.success.cmp(&left.success))
        .then_with(|| left.total_threads.cmp(&right.total_threads))
        .then_with(|| left.url_ref.cmp(&right.url_ref))
}
