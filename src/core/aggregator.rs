use std::collections::BTreeMap;
use crate::models::{Answer, DomainScoreMap, Respondent};

/// Reduce one respondent's answers to a mean weight per domain
///
/// Every answer counts, including repeated submissions for the same
/// question. Weights are taken as-is; range checks belong to whoever builds
/// the answers. Domains with no answers are left out of the map.
pub fn aggregate<'a, I>(answers: I) -> DomainScoreMap
where
    I: IntoIterator<Item = &'a Answer>,
{
    // (sum, count) per domain
    let mut totals: BTreeMap<_, (f64, u32)> = BTreeMap::new();

    for answer in answers {
        let entry = totals.entry(answer.domain).or_insert((0.0, 0));
        entry.0 += answer.weight as f64;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(domain, (sum, count))| (domain, sum / count as f64))
        .collect()
}

/// Split a pairing's answers by respondent and aggregate each side
pub fn aggregate_pair(answers: &[Answer]) -> (DomainScoreMap, DomainScoreMap) {
    let first = aggregate(answers.iter().filter(|a| a.respondent == Respondent::First));
    let second = aggregate(answers.iter().filter(|a| a.respondent == Respondent::Second));
    (first, second)
}
