use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::error::DataError;
use super::model::{Dataset, Dimension, Transaction};

// ---------------------------------------------------------------------------
// DateRange – inclusive calendar interval
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` date interval. Only constructible with
/// `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DataError> {
        if start > end {
            return Err(DataError::InvalidDateRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Build from possibly-missing endpoints. A single-ended interval is
    /// rejected rather than widened.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, DataError> {
        match (start, end) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => Err(DataError::IncompleteDateRange),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – what the user picked in the side panel
// ---------------------------------------------------------------------------

/// Date interval plus one inclusion set per filterable dimension.
///
/// An empty inclusion set selects nothing; it never means "no filter".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub date_range: DateRange,
    pub categories: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub channels: BTreeSet<String>,
}

impl FilterSelection {
    /// Select the whole dataset: full date span and every known value.
    pub fn all(dataset: &Dataset) -> Result<Self, DataError> {
        let (start, end) = dataset.date_bounds().ok_or(DataError::EmptyDataset)?;
        Ok(FilterSelection {
            date_range: DateRange::new(start, end)?,
            categories: dataset.values(Dimension::Category),
            regions: dataset.values(Dimension::Region),
            channels: dataset.values(Dimension::Channel),
        })
    }

    /// Inclusion set for a filterable dimension, `None` for the others.
    pub fn selected(&self, dim: Dimension) -> Option<&BTreeSet<String>> {
        match dim {
            Dimension::Category => Some(&self.categories),
            Dimension::Region => Some(&self.regions),
            Dimension::Channel => Some(&self.channels),
            Dimension::PaymentMethod | Dimension::CustomerSegment => None,
        }
    }

    pub fn selected_mut(&mut self, dim: Dimension) -> Option<&mut BTreeSet<String>> {
        match dim {
            Dimension::Category => Some(&mut self.categories),
            Dimension::Region => Some(&mut self.regions),
            Dimension::Channel => Some(&mut self.channels),
            Dimension::PaymentMethod | Dimension::CustomerSegment => None,
        }
    }

    /// All four predicates, conjunctively.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.date_range.contains(tx.date)
            && self.categories.contains(&tx.category)
            && self.regions.contains(&tx.region)
            && self.channels.contains(&tx.channel)
    }
}

// ---------------------------------------------------------------------------
// FilteredDataset – borrowed view of the rows that passed
// ---------------------------------------------------------------------------

/// The rows of a [`Dataset`] that pass a selection, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredDataset<'a> {
    source: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredDataset<'a> {
    /// Every row of the dataset, unfiltered.
    pub fn everything(source: &'a Dataset) -> Self {
        FilteredDataset {
            source,
            indices: (0..source.len()).collect(),
        }
    }

    pub fn source(&self) -> &'a Dataset {
        self.source
    }

    /// Positions of the retained rows within the source dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn get(&self, i: usize) -> Option<&'a Transaction> {
        self.indices.get(i).map(|&idx| &self.source.rows[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        let rows = &self.source.rows;
        self.indices.iter().map(move |&idx| &rows[idx])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Earliest and latest date among the retained rows.
    ///
    /// Fails with [`DataError::EmptyDataset`] when nothing passed the filter.
    pub fn date_span(&self) -> Result<(NaiveDate, NaiveDate), DataError> {
        let min = self.iter().map(|t| t.date).min().ok_or(DataError::EmptyDataset)?;
        let max = self.iter().map(|t| t.date).max().ok_or(DataError::EmptyDataset)?;
        Ok((min, max))
    }
}

/// Return the rows of `dataset` that satisfy every predicate in `selection`.
pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredDataset<'a> {
    let indices = dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, tx)| selection.matches(tx))
        .map(|(i, _)| i)
        .collect();

    FilteredDataset {
        source: dataset,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::three_rows;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateRange::new(date("2024-02-01"), date("2024-01-01")).unwrap_err();
        assert!(matches!(err, DataError::InvalidDateRange { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn single_ended_range_is_rejected() {
        assert!(matches!(
            DateRange::from_bounds(Some(date("2024-01-01")), None),
            Err(DataError::IncompleteDateRange)
        ));
        assert!(matches!(
            DateRange::from_bounds(None, Some(date("2024-01-01"))),
            Err(DataError::IncompleteDateRange)
        ));
        assert!(DateRange::from_bounds(Some(date("2024-01-01")), Some(date("2024-01-01"))).is_ok());
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let r = DateRange::new(date("2024-01-01"), date("2024-01-31")).unwrap();
        assert!(r.contains(date("2024-01-01")));
        assert!(r.contains(date("2024-01-31")));
        assert!(!r.contains(date("2023-12-31")));
        assert!(!r.contains(date("2024-02-01")));
    }

    #[test]
    fn default_selection_keeps_every_row() {
        let ds = three_rows();
        let sel = FilterSelection::all(&ds).unwrap();
        assert_eq!(apply(&ds, &sel).len(), ds.len());
    }

    #[test]
    fn default_selection_needs_rows() {
        let ds = crate::data::model::fixtures::dataset(Vec::new());
        assert!(matches!(FilterSelection::all(&ds), Err(DataError::EmptyDataset)));
    }

    #[test]
    fn predicates_compose_conjunctively() {
        let ds = three_rows();
        let mut sel = FilterSelection::all(&ds).unwrap();
        sel.categories = BTreeSet::from(["A".to_string()]);
        sel.date_range = DateRange::new(date("2024-01-01"), date("2024-01-31")).unwrap();

        let filtered = apply(&ds, &sel);
        assert_eq!(filtered.indices(), &[0]);
        assert_eq!(filtered.get(0).unwrap().transaction_id, "1");
    }

    #[test]
    fn empty_inclusion_set_selects_nothing() {
        let ds = three_rows();
        for dim in Dimension::FILTERABLE {
            let mut sel = FilterSelection::all(&ds).unwrap();
            sel.selected_mut(dim).unwrap().clear();
            let filtered = apply(&ds, &sel);
            assert!(filtered.is_empty(), "{dim} with empty set kept rows");
            assert!(matches!(filtered.date_span(), Err(DataError::EmptyDataset)));
        }
    }

    #[test]
    fn retained_rows_satisfy_every_predicate() {
        let ds = three_rows();
        let mut sel = FilterSelection::all(&ds).unwrap();
        sel.regions = BTreeSet::from(["North".to_string()]);
        sel.date_range = DateRange::new(date("2024-01-01"), date("2024-01-15")).unwrap();

        let filtered = apply(&ds, &sel);
        for (tx, &idx) in filtered.iter().zip(filtered.indices()) {
            assert_eq!(tx, &ds.rows[idx]);
            assert!(sel.date_range.contains(tx.date));
            assert!(sel.categories.contains(&tx.category));
            assert!(sel.regions.contains(&tx.region));
            assert!(sel.channels.contains(&tx.channel));
        }
        assert_eq!(filtered.len(), 1);
    }

    /// Every subset of `values`, by bitmask.
    fn subsets(values: &BTreeSet<String>) -> Vec<BTreeSet<String>> {
        let values: Vec<&String> = values.iter().collect();
        (0..1u32 << values.len())
            .map(|mask| {
                values
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, v)| (*v).clone())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn every_selection_keeps_exactly_the_matching_rows() {
        let ds = three_rows();
        let windows = [
            ("2024-01-01", "2024-02-01"),
            ("2024-01-01", "2024-01-01"),
            ("2024-01-02", "2024-01-31"),
            ("2024-02-01", "2024-12-31"),
            ("2023-01-01", "2023-12-31"),
        ];

        for (start, end) in windows {
            let date_range = DateRange::new(date(start), date(end)).unwrap();
            for categories in subsets(&ds.values(Dimension::Category)) {
                for regions in subsets(&ds.values(Dimension::Region)) {
                    for channels in subsets(&ds.values(Dimension::Channel)) {
                        let sel = FilterSelection {
                            date_range,
                            categories: categories.clone(),
                            regions: regions.clone(),
                            channels,
                        };
                        let filtered = apply(&ds, &sel);

                        let expected: Vec<usize> = (0..ds.len())
                            .filter(|&i| {
                                let tx = &ds.rows[i];
                                date_range.contains(tx.date)
                                    && sel.categories.contains(&tx.category)
                                    && sel.regions.contains(&tx.region)
                                    && sel.channels.contains(&tx.channel)
                            })
                            .collect();
                        assert_eq!(filtered.indices(), expected.as_slice(), "{sel:?}");

                        for (tx, &idx) in filtered.iter().zip(filtered.indices()) {
                            assert_eq!(tx, &ds.rows[idx]);
                            assert!(sel.matches(tx));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn non_filterable_dimensions_have_no_selection() {
        let ds = three_rows();
        let sel = FilterSelection::all(&ds).unwrap();
        assert!(sel.selected(Dimension::PaymentMethod).is_none());
        assert_eq!(sel.selected(Dimension::Region).unwrap().len(), 2);
    }
}
