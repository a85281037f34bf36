use crate::classes::{display_label, tier_rank};
use crate::dataset::RawPassenger;
use serde::{Deserialize, Serialize};

/// A passenger with every field the charts need present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub survived: u8,
    pub pclass: u8,
    pub sex: String,
    pub age: f64,
    pub fare: f64,
    pub sibsp: u32,
    pub parch: u32,
    /// Display label produced by [`display_label`].
    pub class: String,
    pub embark_town: Option<String>,
}

/// The prepared, read-only record set shared by all charts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PassengerSet {
    records: Vec<Passenger>,
}

impl PassengerSet {
    /// Drop rows without `age` or `fare` and relabel their class.
    pub fn prepare(raw: Vec<RawPassenger>) -> Self {
        let total = raw.len();
        let records: Vec<Passenger> = raw
            .into_iter()
            .filter_map(|r| {
                let (age, fare) = (r.age?, r.fare?);
                Some(Passenger {
                    survived: r.survived,
                    pclass: r.pclass,
                    sex: r.sex,
                    age,
                    fare,
                    sibsp: r.sibsp,
                    parch: r.parch,
                    class: display_label(&r.class),
                    embark_town: r.embark_town,
                })
            })
            .collect();
        log::info!(
            "Prepared {} of {} records ({} missing age or fare)",
            records.len(),
            total,
            total - records.len()
        );
        Self { records }
    }

    pub fn records(&self) -> &[Passenger] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct class labels: known tiers first, the rest by first appearance.
    pub fn class_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for r in &self.records {
            if !groups.contains(&r.class) {
                groups.push(r.class.clone());
            }
        }
        // Stable sort keeps appearance order among unknown labels.
        groups.sort_by_key(|g| tier_rank(g).unwrap_or(usize::MAX));
        groups
    }

    /// Pair every class group with the values `field` extracts for it.
    pub fn values_by_class(&self, field: impl Fn(&Passenger) -> f64) -> Vec<(String, Vec<f64>)> {
        self.class_groups()
            .into_iter()
            .map(|g| {
                let values = self
                    .records
                    .iter()
                    .filter(|r| r.class == g)
                    .map(&field)
                    .collect();
                (g, values)
            })
            .collect()
    }
}

/// Frequency counts over equal-width bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bin `values` into `bins` equal-width bins spanning their own range.
///
/// The last bin is closed on both sides. A range of zero width is widened to
/// half a unit on each side. Returns `None` when there are no values.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let (mut lo, mut hi) = min_max(values)?;
    if bins == 0 {
        return None;
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins)
        .map(|i| lo + (hi - lo) * i as f64 / bins as f64)
        .collect();
    edges[bins] = hi;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

/// Per-class age histograms with 15 bins each.
pub fn age_histograms(set: &PassengerSet) -> Vec<(String, Histogram)> {
    set.values_by_class(|p| p.age)
        .into_iter()
        .filter_map(|(g, ages)| histogram(&ages, 15).map(|h| (g, h)))
        .collect()
}

/// A labelled pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    /// Share of the total in percent.
    pub percent: f64,
}

impl Slice {
    /// Percentage text with one decimal, e.g. `33.3%`.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

pub const DIED_LABEL: &str = "Погибшие";
pub const SURVIVED_LABEL: &str = "Выжившие";

/// Deaths and survivors as pie slices; empty categories are left out.
pub fn survival_slices(set: &PassengerSet) -> Vec<Slice> {
    let survived = set.records().iter().filter(|r| r.survived != 0).count();
    let died = set.len() - survived;
    slices(&[(DIED_LABEL.to_string(), died), (SURVIVED_LABEL.to_string(), survived)])
}

fn slices(counts: &[(String, usize)]) -> Vec<Slice> {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    counts
        .iter()
        .filter(|(_, c)| *c > 0)
        .map(|(label, c)| Slice {
            label: label.clone(),
            count: *c,
            percent: *c as f64 * 100.0 / total as f64,
        })
        .collect()
}

/// Mean fare within one age interval.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeGroupFare {
    /// Interval text such as `(0.34, 16.336]`.
    pub label: String,
    /// `None` when no passenger falls into the interval.
    pub mean_fare: Option<f64>,
}

/// Edges of `bins` equal-width, right-closed intervals covering `values`.
///
/// The lowest edge is pushed down by 0.1% of the range so the minimum falls
/// inside the first interval. A zero-width range is widened by 0.1% of its
/// magnitude (or 0.001 at zero) on both sides instead.
pub fn cut_edges(values: &[f64], bins: usize) -> Option<Vec<f64>> {
    let (mut lo, mut hi) = min_max(values)?;
    if bins == 0 {
        return None;
    }
    let widened = lo == hi;
    if widened {
        let pad = if lo == 0.0 { 0.001 } else { 0.001 * lo.abs() };
        lo -= pad;
        hi += pad;
    }
    let mut edges: Vec<f64> = (0..=bins)
        .map(|i| lo + (hi - lo) * i as f64 / bins as f64)
        .collect();
    edges[bins] = hi;
    if !widened {
        edges[0] -= (hi - lo) * 0.001;
    }
    Some(edges)
}

/// Round `x` for display: `precision` decimals, or `precision` significant
/// digits of the fraction when there is no whole part.
fn round_frac(x: f64, precision: i32) -> f64 {
    let frac = x.fract();
    if frac == 0.0 || !x.is_finite() {
        return x;
    }
    let digits = if x.trunc() == 0.0 {
        precision - frac.abs().log10().floor() as i32 - 1
    } else {
        precision
    };
    let scale = 10f64.powi(digits);
    (x * scale).round() / scale
}

/// Interval label in the `(lo, hi]` form.
pub fn interval_label(lo: f64, hi: f64) -> String {
    format!("({:?}, {:?}]", round_frac(lo, 3), round_frac(hi, 3))
}

/// Mean fare over five equal-width age groups.
pub fn fare_by_age_group(set: &PassengerSet) -> Vec<AgeGroupFare> {
    const GROUPS: usize = 5;
    let ages: Vec<f64> = set.records().iter().map(|r| r.age).collect();
    let Some(edges) = cut_edges(&ages, GROUPS) else {
        return Vec::new();
    };
    let mut sums = [(0.0f64, 0usize); GROUPS];
    for r in set.records() {
        let idx = edges[1..]
            .iter()
            .position(|e| r.age <= *e)
            .unwrap_or(GROUPS - 1);
        sums[idx].0 += r.fare;
        sums[idx].1 += 1;
    }
    edges
        .windows(2)
        .zip(sums)
        .map(|(w, (sum, n))| AgeGroupFare {
            label: interval_label(w[0], w[1]),
            mean_fare: (n > 0).then(|| sum / n as f64),
        })
        .collect()
}

pub const CORRELATION_FIELDS: [&str; 4] = ["age", "fare", "sibsp", "parch"];

/// Pairwise Pearson coefficients over [`CORRELATION_FIELDS`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    /// `None` where a coefficient is undefined (constant column or < 2 rows).
    pub values: [[Option<f64>; 4]; 4],
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values[i][j]
    }
}

/// Pearson correlation of two equally long samples.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mx = xs[..n].iter().sum::<f64>() / n as f64;
    let my = ys[..n].iter().sum::<f64>() / n as f64;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Correlation heatmap values. The diagonal is always 1.
pub fn correlation_matrix(set: &PassengerSet) -> CorrelationMatrix {
    let columns: [Vec<f64>; 4] = [
        set.records().iter().map(|r| r.age).collect(),
        set.records().iter().map(|r| r.fare).collect(),
        set.records().iter().map(|r| r.sibsp as f64).collect(),
        set.records().iter().map(|r| r.parch as f64).collect(),
    ];
    let mut values = [[None; 4]; 4];
    for i in 0..4 {
        values[i][i] = Some(1.0);
        for j in (i + 1)..4 {
            let c = pearson(&columns[i], &columns[j]);
            values[i][j] = c;
            values[j][i] = c;
        }
    }
    CorrelationMatrix { values }
}

/// Gaussian kernel density estimate with Scott's bandwidth.
///
/// The curve spans three bandwidths beyond the data on each side and is
/// scaled by `weight`. Returns `None` for fewer than two values or zero
/// variance.
pub fn kde(values: &[f64], grid_points: usize, weight: f64) -> Option<Vec<[f64; 2]>> {
    let n = values.len();
    if n < 2 || grid_points < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    if var <= 0.0 {
        return None;
    }
    let bw = (n as f64).powf(-0.2) * var.sqrt();
    let (lo, hi) = min_max(values)?;
    let (lo, hi) = (lo - 3.0 * bw, hi + 3.0 * bw);
    let step = (hi - lo) / (grid_points - 1) as f64;
    let norm = weight / (n as f64 * bw * (2.0 * std::f64::consts::PI).sqrt());
    Some(
        (0..grid_points)
            .map(|i| {
                let x = lo + step * i as f64;
                let sum: f64 = values
                    .iter()
                    .map(|v| (-0.5 * ((x - v) / bw).powi(2)).exp())
                    .sum();
                [x, sum * norm]
            })
            .collect(),
    )
}

/// Fare densities per class, normalized so all curves together integrate to 1.
pub fn fare_densities(set: &PassengerSet) -> Vec<(String, Vec<[f64; 2]>)> {
    let total = set.len() as f64;
    set.values_by_class(|p| p.fare)
        .into_iter()
        .filter_map(|(g, fares)| {
            let weight = fares.len() as f64 / total;
            kde(&fares, 200, weight).map(|curve| (g, curve))
        })
        .collect()
}

/// Five-number summary used for box plots.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest value within 1.5 IQR below `q1`.
    pub whisker_low: f64,
    /// Highest value within 1.5 IQR above `q3`.
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Linearly interpolated percentile of sorted values, `p` in `[0, 1]`.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = percentile(&sorted, 0.25);
    let median = percentile(&sorted, 0.5);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= lo_fence && *v <= hi_fence)
        .collect();
    let whisker_low = inside.iter().copied().fold(q1, f64::min);
    let whisker_high = inside.iter().copied().fold(q3, f64::max);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();
    Some(BoxStats {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

/// Box plot statistics of fare per class.
pub fn fare_boxes(set: &PassengerSet) -> Vec<(String, BoxStats)> {
    set.values_by_class(|p| p.fare)
        .into_iter()
        .filter_map(|(g, fares)| box_stats(&fares).map(|b| (g, b)))
        .collect()
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            }),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw(class: &str, age: Option<f64>, fare: Option<f64>, survived: u8) -> RawPassenger {
        RawPassenger {
            survived,
            pclass: match class {
                "First" => 1,
                "Second" => 2,
                _ => 3,
            },
            sex: if survived == 1 { "female" } else { "male" }.into(),
            age,
            fare,
            sibsp: 0,
            parch: 0,
            class: class.into(),
            embark_town: Some("Southampton".into()),
            ..RawPassenger::default()
        }
    }

    pub(crate) fn sample_set() -> PassengerSet {
        PassengerSet::prepare(vec![
            raw("First", Some(22.0), Some(71.28), 0),
            raw("First", Some(38.0), Some(53.1), 1),
            raw("Second", Some(26.0), Some(13.0), 1),
        ])
    }

    #[test]
    fn prepare_drops_missing_age_or_fare() {
        let set = PassengerSet::prepare(vec![
            raw("Third", Some(22.0), Some(7.25), 0),
            raw("Third", None, Some(8.05), 0),
            raw("First", Some(40.0), None, 1),
            raw("First", None, None, 1),
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.records()[0].age, 22.0);
        assert_eq!(set.records()[0].class, "Пассажиры третьего класса");
    }

    #[test]
    fn prepare_keeps_unmapped_classes() {
        let set = PassengerSet::prepare(vec![raw("Crew", Some(30.0), Some(0.0), 0)]);
        assert_eq!(set.records()[0].class, "Crew");
    }

    #[test]
    fn class_groups_follow_tier_order() {
        let set = PassengerSet::prepare(vec![
            raw("Crew", Some(30.0), Some(0.0), 0),
            raw("Third", Some(20.0), Some(7.0), 0),
            raw("First", Some(50.0), Some(90.0), 1),
            raw("Third", Some(21.0), Some(8.0), 1),
        ]);
        assert_eq!(
            set.class_groups(),
            vec![
                "Пассажиры первого класса".to_string(),
                "Пассажиры третьего класса".to_string(),
                "Crew".to_string(),
            ]
        );
    }

    #[test]
    fn age_histogram_overlays_one_series_per_class() {
        let hists = age_histograms(&sample_set());
        assert_eq!(hists.len(), 2);
        let (first, h) = &hists[0];
        assert_eq!(first, "Пассажиры первого класса");
        assert_eq!(h.counts.len(), 15);
        assert_eq!(h.edges.len(), 16);
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[14], 1);
        // A single age widens to a one-year bin range.
        let (_, h) = &hists[1];
        assert_eq!(h.edges[0], 25.5);
        assert_eq!(h.edges[15], 26.5);
        assert_eq!(h.counts.iter().sum::<usize>(), 1);
    }

    #[test]
    fn survival_pie_percentages() {
        let slices = survival_slices(&sample_set());
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, DIED_LABEL);
        assert_eq!(slices[0].percent_label(), "33.3%");
        assert_eq!(slices[1].label, SURVIVED_LABEL);
        assert_eq!(slices[1].percent_label(), "66.7%");
    }

    #[test]
    fn survival_pie_single_outcome() {
        let set = PassengerSet::prepare(vec![raw("Third", Some(20.0), Some(7.0), 0)]);
        let slices = survival_slices(&set);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].percent_label(), "100.0%");
        assert!(survival_slices(&PassengerSet::default()).is_empty());
    }

    #[test]
    fn cut_edges_match_interval_labels() {
        let ages = [0.42, 80.0, 30.0];
        let edges = cut_edges(&ages, 5).unwrap();
        assert_eq!(edges.len(), 6);
        assert_eq!(interval_label(edges[0], edges[1]), "(0.34, 16.336]");
        assert_eq!(interval_label(edges[4], edges[5]), "(64.084, 80.0]");
    }

    #[test]
    fn interval_labels_round_whole_numbers_to_decimals() {
        let edges = cut_edges(&[10.0, 60.0005], 5).unwrap();
        assert_eq!(interval_label(edges[0], edges[1]), "(9.95, 20.0]");
        assert_eq!(interval_label(edges[1], edges[2]), "(20.0, 30.0]");
        assert_eq!(round_frac(0.000123456, 3), 0.000123);
        assert_eq!(round_frac(-3.14159, 3), -3.142);
    }

    #[test]
    fn fare_by_age_group_means_and_gaps() {
        let groups = fare_by_age_group(&sample_set());
        assert_eq!(groups.len(), 5);
        // Ages 22, 26 and 38 over (21.984, 38]: 22 in the first bin,
        // 26 in the second and 38 in the last.
        assert_eq!(groups[0].mean_fare, Some(71.28));
        assert_eq!(groups[1].mean_fare, Some(13.0));
        assert_eq!(groups[2].mean_fare, None);
        assert_eq!(groups[4].mean_fare, Some(53.1));
        assert!(fare_by_age_group(&PassengerSet::default()).is_empty());
    }

    #[test]
    fn fare_by_age_group_single_age() {
        let set = PassengerSet::prepare(vec![
            raw("Third", Some(30.0), Some(10.0), 0),
            raw("Third", Some(30.0), Some(20.0), 0),
        ]);
        let groups = fare_by_age_group(&set);
        assert_eq!(groups.len(), 5);
        let filled: Vec<f64> = groups.iter().filter_map(|g| g.mean_fare).collect();
        assert_eq!(filled, vec![15.0]);
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let mut rows = Vec::new();
        for i in 0..20 {
            let mut r = raw("Third", Some(20.0 + i as f64), Some(5.0 + (i * i) as f64), 0);
            r.sibsp = (i % 3) as u32;
            r.parch = (i % 4) as u32;
            rows.push(r);
        }
        let m = correlation_matrix(&PassengerSet::prepare(rows));
        for i in 0..4 {
            assert!((m.get(i, i).unwrap() - 1.0).abs() < 1e-12);
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert!(m.get(0, 1).unwrap() > 0.9);
    }

    #[test]
    fn correlation_of_constant_column_is_undefined() {
        let m = correlation_matrix(&sample_set());
        // sibsp and parch are all zero in the sample.
        assert_eq!(m.get(2, 3), None);
        assert_eq!(m.get(2, 2), Some(1.0));
        let empty = correlation_matrix(&PassengerSet::default());
        assert_eq!(empty.get(0, 1), None);
    }

    #[test]
    fn pearson_perfect_correlation() {
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn kde_integrates_to_weight() {
        let values = [1.0, 2.0, 2.5, 3.0, 7.0];
        let curve = kde(&values, 200, 0.5).unwrap();
        assert_eq!(curve.len(), 200);
        let dx = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * dx).sum();
        assert!((area - 0.5).abs() < 0.01, "area {area}");
        assert!(kde(&[1.0], 200, 1.0).is_none());
        assert!(kde(&[2.0, 2.0], 200, 1.0).is_none());
    }

    #[test]
    fn fare_densities_skip_degenerate_groups() {
        let dens = fare_densities(&sample_set());
        // Second class has a single passenger and no density.
        assert_eq!(dens.len(), 1);
        assert_eq!(dens[0].0, "Пассажиры первого класса");
        assert!(fare_densities(&PassengerSet::default()).is_empty());
    }

    #[test]
    fn box_stats_whiskers_and_outliers() {
        let b = box_stats(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.whisker_low, 1.0);
        assert_eq!(b.whisker_high, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert!(box_stats(&[]).is_none());
    }

    #[test]
    fn fare_boxes_per_class() {
        let boxes = fare_boxes(&sample_set());
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[1].1.median, 13.0);
        assert_eq!(boxes[1].1.whisker_low, 13.0);
    }
}
