use crate::domain::model::{CostRecord, CostSummary};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

pub const DEFAULT_TOP_N: usize = 5;
pub const TAX_SERVICE: &str = "Tax";

/// Reduces a per-service breakdown to the top N plus an aggregated remainder.
///
/// Services listed as *unranked* never take a top slot; their spend is folded
/// into `other_amount` and still counted in `total_amount`.
#[derive(Debug, Clone)]
pub struct ServiceRanker {
    top_n: usize,
    unranked: BTreeSet<String>,
}

impl Default for ServiceRanker {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            unranked: BTreeSet::new(),
        }
    }
}

impl ServiceRanker {
    /// 未勾選 include_tax 時，稅金不列入排名
    pub fn for_report(include_tax: bool) -> Self {
        if include_tax {
            Self::default()
        } else {
            Self::default().with_unranked(TAX_SERVICE)
        }
    }

    pub fn with_unranked(mut self, service_name: impl Into<String>) -> Self {
        self.unranked.insert(service_name.into());
        self
    }

    pub fn rank(&self, records: Vec<CostRecord>) -> CostSummary {
        let total_amount: Decimal = records.iter().map(|r| r.amount).sum();

        let (mut candidates, unranked): (Vec<CostRecord>, Vec<CostRecord>) = records
            .into_iter()
            .partition(|r| !self.unranked.contains(&r.service_name));

        candidates.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.service_name.cmp(&b.service_name))
        });

        let remainder = if candidates.len() > self.top_n {
            candidates.split_off(self.top_n)
        } else {
            Vec::new()
        };

        let other_amount: Decimal = remainder
            .iter()
            .chain(unranked.iter())
            .map(|r| r.amount)
            .sum();

        tracing::debug!(
            "Ranked {} services into top {} (other: {})",
            candidates.len() + remainder.len() + unranked.len(),
            candidates.len(),
            other_amount
        );

        CostSummary {
            total_amount,
            top_services: candidates,
            other_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn records(amounts: &[(&str, Decimal)]) -> Vec<CostRecord> {
        amounts
            .iter()
            .map(|(name, amount)| CostRecord::usd(*name, *amount))
            .collect()
    }

    fn assert_summary_invariants(summary: &CostSummary) {
        assert!(summary.top_services.len() <= DEFAULT_TOP_N);
        assert!(summary.other_amount >= Decimal::ZERO);
        let top_sum: Decimal = summary.top_services.iter().map(|r| r.amount).sum();
        assert_eq!(summary.other_amount, summary.total_amount - top_sum);
        for pair in summary.top_services.windows(2) {
            assert!(
                pair[0].amount > pair[1].amount
                    || (pair[0].amount == pair[1].amount
                        && pair[0].service_name < pair[1].service_name)
            );
        }
    }

    #[test]
    fn test_seven_services_keep_top_five() {
        let input = records(&[
            ("E", dec!(60)),
            ("A", dec!(100)),
            ("G", dec!(40)),
            ("C", dec!(80)),
            ("B", dec!(90)),
            ("F", dec!(50)),
            ("D", dec!(70)),
        ]);

        let summary = ServiceRanker::default().rank(input);

        let names: Vec<&str> = summary
            .top_services
            .iter()
            .map(|r| r.service_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(summary.other_amount, dec!(90));
        assert_eq!(summary.total_amount, dec!(490));
        assert_summary_invariants(&summary);
    }

    #[test]
    fn test_ties_break_by_ascending_name() {
        let input = records(&[
            ("Amazon S3", dec!(10)),
            ("AWS Lambda", dec!(10)),
            ("Amazon EC2", dec!(10)),
        ]);

        let summary = ServiceRanker::default().rank(input);

        let names: Vec<&str> = summary
            .top_services
            .iter()
            .map(|r| r.service_name.as_str())
            .collect();
        assert_eq!(names, vec!["AWS Lambda", "Amazon EC2", "Amazon S3"]);
        assert_summary_invariants(&summary);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let summary = ServiceRanker::default().rank(Vec::new());
        assert!(summary.top_services.is_empty());
        assert_eq!(summary.other_amount, Decimal::ZERO);
        assert_eq!(summary.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_fewer_than_five_services_have_no_remainder() {
        let summary =
            ServiceRanker::default().rank(records(&[("A", dec!(1.25)), ("B", dec!(3.5))]));
        assert_eq!(summary.top_services.len(), 2);
        assert_eq!(summary.other_amount, Decimal::ZERO);
        assert_eq!(summary.total_amount, dec!(4.75));
        assert_summary_invariants(&summary);
    }

    #[test]
    fn test_unranked_tax_is_folded_into_other() {
        let input = records(&[
            ("Tax", dec!(500)),
            ("Amazon EC2", dec!(100)),
            ("Amazon S3", dec!(20)),
        ]);

        let summary = ServiceRanker::for_report(false).rank(input.clone());
        assert!(summary.top_services.iter().all(|r| r.service_name != "Tax"));
        assert_eq!(summary.other_amount, dec!(500));
        assert_eq!(summary.total_amount, dec!(620));
        assert_summary_invariants(&summary);

        let with_tax = ServiceRanker::for_report(true).rank(input);
        assert_eq!(with_tax.top_services[0].service_name, "Tax");
        assert_eq!(with_tax.other_amount, Decimal::ZERO);
    }

    #[test]
    fn test_invariants_hold_for_many_shapes() {
        for n in 0..12u32 {
            let input: Vec<CostRecord> = (0..n)
                .map(|i| CostRecord::usd(format!("svc-{:02}", i), Decimal::from((i * 7) % 5)))
                .collect();
            assert_summary_invariants(&ServiceRanker::default().rank(input));
        }
    }
}
