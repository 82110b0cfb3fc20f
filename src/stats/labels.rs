use super::ordering::by_label_offset;
use crate::codec::Sample;

/// Sort `samples` by label then offset and return each label's run.
///
/// Runs come out in label-reference order; samples without a label (ref 0)
/// form the first run when present.
pub fn sort_and_split_by_label(samples: &mut [Sample]) -> Vec<(u32, &[Sample])> {
    samples.sort_by(by_label_offset);
    samples
        .chunk_by(|left, right| left.label_ref == right.label_ref)
        .filter_map(|run| run.first().map(|first| (first.label_ref, run)))
        .collect()
}
