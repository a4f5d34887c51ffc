use super::model::{Amount, DrugRecord};

/// Totals shown on the summary cards above the drug table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryAggregate {
    pub count: usize,
    pub total_cost: f64,
    pub total_members: i64,
    /// Mean of `avg_age` over all records; zero for an empty selection.
    pub avg_age: f64,
}

impl SummaryAggregate {
    /// Reduce the records in a single pass.
    ///
    /// Costs and member counts that cannot be parsed contribute zero. Records
    /// without an age still count toward the divisor.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DrugRecord>,
    {
        let mut count = 0usize;
        let mut total_cost = 0.0;
        let mut total_members = 0i64;
        let mut age_sum = 0.0;

        for drug in records {
            count += 1;
            total_cost += normalized(drug, "total_drug_cost", &drug.total_drug_cost, Amount::as_cost)
                .unwrap_or(0.0);
            total_members = total_members.saturating_add(
                normalized(drug, "member_count", &drug.member_count, Amount::as_count).unwrap_or(0),
            );
            age_sum += drug.avg_age.filter(|a| a.is_finite()).unwrap_or(0.0);
        }

        let avg_age = if count == 0 { 0.0 } else { age_sum / count as f64 };

        SummaryAggregate {
            count,
            total_cost,
            total_members,
            avg_age,
        }
    }

    /// Mean age rounded to whole years for display.
    pub fn rounded_avg_age(&self) -> i64 {
        self.avg_age.round() as i64
    }
}

fn normalized<T>(
    drug: &DrugRecord,
    field: &str,
    value: &Option<Amount>,
    parse: impl Fn(&Amount) -> Option<T>,
) -> Option<T> {
    let Some(amount) = value else {
        log::debug!("{} ({}): {field} missing, counted as zero", drug.ndc, drug.drug_name);
        return None;
    };
    let parsed = parse(amount);
    if parsed.is_none() {
        log::warn!(
            "{} ({}): {field} value {amount:?} is not numeric, counted as zero",
            drug.ndc,
            drug.drug_name
        );
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drug(ndc: &str, cost: Option<Amount>, members: Option<Amount>, age: Option<f64>) -> DrugRecord {
        DrugRecord {
            ndc: ndc.to_string(),
            total_drug_cost: cost,
            member_count: members,
            avg_age: age,
            ..Default::default()
        }
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let s = SummaryAggregate::from_records(std::iter::empty());
        assert_eq!(s, SummaryAggregate::default());
        assert_eq!(s.avg_age, 0.0);
        assert!(!s.avg_age.is_nan());
    }

    #[test]
    fn mixed_text_and_numeric_costs() {
        let records = vec![
            drug("1", Some("$1,200".into()), Some("1,000".into()), Some(60.0)),
            drug("2", Some(1800.0.into()), Some(500.0.into()), Some(40.0)),
        ];
        let s = SummaryAggregate::from_records(&records);
        assert_eq!(s.count, 2);
        assert_eq!(s.total_cost, 3000.0);
        assert_eq!(s.total_members, 1500);
        assert_eq!(s.avg_age, 50.0);
    }

    #[test]
    fn malformed_values_count_as_zero() {
        let records = vec![
            drug("1", Some("pending".into()), Some("unknown".into()), None),
            drug("2", None, None, Some(30.0)),
            drug("3", Some(250.5.into()), Some("12".into()), Some(33.0)),
        ];
        let s = SummaryAggregate::from_records(&records);
        assert_eq!(s.count, 3);
        assert_eq!(s.total_cost, 250.5);
        assert_eq!(s.total_members, 12);
        assert_eq!(s.avg_age, 21.0);
    }

    #[test]
    fn rounded_age() {
        let records = vec![
            drug("1", None, None, Some(62.4)),
            drug("2", None, None, Some(63.0)),
        ];
        assert_eq!(SummaryAggregate::from_records(&records).rounded_avg_age(), 63);
    }

    #[test]
    fn out_of_range_member_counts_count_as_zero() {
        let records = vec![
            drug("1", None, Some("1e20".into()), None),
            drug("2", None, Some("1e20".into()), None),
            drug("3", None, Some("7".into()), None),
        ];
        let s = SummaryAggregate::from_records(&records);
        assert_eq!(s.count, 3);
        assert_eq!(s.total_members, 7);
    }

    #[test]
    fn member_total_saturates() {
        let big = (i64::MAX / 2 + 1).to_string();
        let records = vec![
            drug("1", None, Some(big.as_str().into()), None),
            drug("2", None, Some(big.as_str().into()), None),
        ];
        assert_eq!(SummaryAggregate::from_records(&records).total_members, i64::MAX);
    }
}
