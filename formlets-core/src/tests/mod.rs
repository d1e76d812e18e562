mod formlet_tests;
mod render_dict_tests;

use crate::collector::Submission;

pub(crate) fn submission(pairs: &[(&str, &str)]) -> Submission {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
