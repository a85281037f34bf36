use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};

use crate::analysis::{
    AgeGroupFare, BoxStats, CORRELATION_FIELDS, CorrelationMatrix, Histogram, PassengerSet, Slice,
    age_histograms, correlation_matrix, fare_boxes, fare_by_age_group, fare_densities,
    survival_slices,
};
use crate::report::InteractiveChart;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// Pixel size of every static chart.
pub const CHART_SIZE: (u32, u32) = (600, 400);

const FONT: &str = "sans-serif";
const NO_DATA: &str = "Нет данных";

/// Matplotlib's default category colors.
const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const SALMON: RGBColor = RGBColor(250, 128, 114);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);

fn series_color(idx: usize) -> RGBColor {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

/// The precomputed charts shown in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaticChart {
    AgeHistogram,
    SurvivalPie,
    FareByAgeGroup,
    CorrelationHeatmap,
    FareDensity,
    FareBoxplot,
}

pub const ALL_STATIC_CHARTS: [StaticChart; 6] = [
    StaticChart::AgeHistogram,
    StaticChart::SurvivalPie,
    StaticChart::FareByAgeGroup,
    StaticChart::CorrelationHeatmap,
    StaticChart::FareDensity,
    StaticChart::FareBoxplot,
];

impl StaticChart {
    pub fn title(self) -> &'static str {
        match self {
            StaticChart::AgeHistogram => "Распределение возрастов по классам",
            StaticChart::SurvivalPie => "Распределение выживших и погибших",
            StaticChart::FareByAgeGroup => "Средняя стоимость билета по возрастным группам",
            StaticChart::CorrelationHeatmap => "Корреляционная тепловая карта",
            StaticChart::FareDensity => "Распределение стоимости билетов по классам",
            StaticChart::FareBoxplot => "Стоимость билетов по классам",
        }
    }

    /// File name stem used when saving the chart as an image.
    pub fn file_stem(self) -> &'static str {
        match self {
            StaticChart::AgeHistogram => "age_histogram",
            StaticChart::SurvivalPie => "survival_pie",
            StaticChart::FareByAgeGroup => "fare_by_age_group",
            StaticChart::CorrelationHeatmap => "correlation_heatmap",
            StaticChart::FareDensity => "fare_density",
            StaticChart::FareBoxplot => "fare_boxplot",
        }
    }

    /// Compute the data this chart displays.
    pub fn build(self, set: &PassengerSet) -> ChartData {
        match self {
            StaticChart::AgeHistogram => ChartData::AgeHistogram(age_histograms(set)),
            StaticChart::SurvivalPie => ChartData::SurvivalPie(survival_slices(set)),
            StaticChart::FareByAgeGroup => ChartData::FareByAgeGroup(fare_by_age_group(set)),
            StaticChart::CorrelationHeatmap => {
                ChartData::CorrelationHeatmap(correlation_matrix(set))
            }
            StaticChart::FareDensity => ChartData::FareDensity(fare_densities(set)),
            StaticChart::FareBoxplot => ChartData::FareBoxplot(fare_boxes(set)),
        }
    }
}

/// Computed chart contents, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    AgeHistogram(Vec<(String, Histogram)>),
    SurvivalPie(Vec<Slice>),
    FareByAgeGroup(Vec<AgeGroupFare>),
    CorrelationHeatmap(CorrelationMatrix),
    FareDensity(Vec<(String, Vec<[f64; 2]>)>),
    FareBoxplot(Vec<(String, BoxStats)>),
}

impl ChartData {
    /// Number of legend entries or categories drawn.
    pub fn series_count(&self) -> usize {
        match self {
            ChartData::AgeHistogram(s) => s.len(),
            ChartData::SurvivalPie(s) => s.len(),
            ChartData::FareByAgeGroup(g) => g.iter().filter(|g| g.mean_fare.is_some()).count(),
            ChartData::CorrelationHeatmap(_) => CORRELATION_FIELDS.len(),
            ChartData::FareDensity(s) => s.len(),
            ChartData::FareBoxplot(s) => s.len(),
        }
    }
}

/// Which charts appear in the window and how an interactive chart is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartLayout {
    /// All six charts in three columns with a chart dropdown.
    #[default]
    SixGrid,
    /// Age histogram and survival pie with a single launch button.
    TwoGrid,
}

pub const ALL_LAYOUTS: [ChartLayout; 2] = [ChartLayout::SixGrid, ChartLayout::TwoGrid];

/// UI control offered for launching interactive charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchControl {
    Dropdown,
    Button(InteractiveChart),
}

impl ChartLayout {
    pub fn charts(self) -> &'static [StaticChart] {
        match self {
            ChartLayout::SixGrid => &ALL_STATIC_CHARTS,
            ChartLayout::TwoGrid => &ALL_STATIC_CHARTS[..2],
        }
    }

    pub fn columns(self) -> usize {
        match self {
            ChartLayout::SixGrid => 3,
            ChartLayout::TwoGrid => 2,
        }
    }

    pub fn control(self) -> LaunchControl {
        match self {
            ChartLayout::SixGrid => LaunchControl::Dropdown,
            ChartLayout::TwoGrid => LaunchControl::Button(InteractiveChart::Scatter),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartLayout::SixGrid => "Шесть графиков",
            ChartLayout::TwoGrid => "Два графика",
        }
    }
}

/// An RGB raster of a drawn chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    /// Width and height in pixels.
    pub size: [usize; 2],
    /// Row-major RGB bytes, three per pixel.
    pub rgb: Vec<u8>,
}

/// Draw `chart` for `set` into a [`CHART_SIZE`] raster.
pub fn render_chart(
    chart: StaticChart,
    set: &PassengerSet,
) -> Result<RenderedChart, Box<dyn std::error::Error>> {
    let data = chart.build(set);
    let (w, h) = CHART_SIZE;
    let mut rgb = vec![0u8; (w * h * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (w, h)).into_drawing_area();
        root.fill(&WHITE)?;
        draw_chart(&root, chart.title(), &data)?;
        root.present()?;
    }
    Ok(RenderedChart {
        size: [w as usize, h as usize],
        rgb,
    })
}

fn draw_chart(root: &Area, title: &str, data: &ChartData) -> DrawResult {
    if data.series_count() == 0 {
        return draw_empty(root, title);
    }
    match data {
        ChartData::AgeHistogram(series) => draw_age_histogram(root, title, series),
        ChartData::SurvivalPie(slices) => draw_pie(root, title, slices),
        ChartData::FareByAgeGroup(groups) => draw_age_group_line(root, title, groups),
        ChartData::CorrelationHeatmap(matrix) => draw_heatmap(root, title, matrix),
        ChartData::FareDensity(curves) => draw_densities(root, title, curves),
        ChartData::FareBoxplot(boxes) => draw_boxplot(root, title, boxes),
    }
}

fn centered(size: f64) -> TextStyle<'static> {
    (FONT, size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

fn draw_empty(root: &Area, title: &str) -> DrawResult {
    let area = root.titled(title, (FONT, 20).into_font())?;
    let (w, h) = area.dim_in_pixel();
    area.draw(&Text::new(NO_DATA, (w as i32 / 2, h as i32 / 2), centered(16.0)))?;
    Ok(())
}

fn draw_age_histogram(root: &Area, title: &str, series: &[(String, Histogram)]) -> DrawResult {
    let lo = series
        .iter()
        .filter_map(|(_, h)| h.edges.first().copied())
        .fold(f64::INFINITY, f64::min);
    let hi = series
        .iter()
        .filter_map(|(_, h)| h.edges.last().copied())
        .fold(f64::NEG_INFINITY, f64::max);
    let top = series
        .iter()
        .flat_map(|(_, h)| h.counts.iter().copied())
        .max()
        .unwrap_or(1)
        .max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(lo..hi, 0f64..top * 1.1)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Возраст")
        .y_desc("Частота")
        .draw()?;

    for (idx, (label, hist)) in series.iter().enumerate() {
        let color = series_color(idx);
        chart
            .draw_series(hist.counts.iter().zip(hist.edges.windows(2)).map(move |(c, w)| {
                Rectangle::new([(w[0], 0.0), (w[1], *c as f64)], color.mix(0.6).filled())
            }))?
            .label(label.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.mix(0.6).filled())
            });
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_pie(root: &Area, title: &str, slices: &[Slice]) -> DrawResult {
    let area = root.titled(title, (FONT, 20).into_font())?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = w.min(h) as f64 * 0.38;
    let at = |deg: f64, r: f64| {
        let a = deg.to_radians();
        (
            center.0 + (r * a.cos()).round() as i32,
            center.1 - (r * a.sin()).round() as i32,
        )
    };

    // Counter-clockwise from twelve o'clock.
    let mut start = 90.0f64;
    for (idx, slice) in slices.iter().enumerate() {
        let sweep = slice.percent * 3.6;
        let color = if idx % 2 == 0 { SALMON } else { LIGHT_GREEN };
        let steps = (sweep.ceil() as usize).max(2);
        let mut points = vec![center];
        points.extend((0..=steps).map(|k| at(start + sweep * k as f64 / steps as f64, radius)));
        area.draw(&Polygon::new(points, color.filled()))?;

        let mid = start + sweep / 2.0;
        area.draw(&Text::new(slice.label.clone(), at(mid, radius * 1.18), centered(14.0)))?;
        area.draw(&Text::new(slice.percent_label(), at(mid, radius * 0.6), centered(14.0)))?;
        start += sweep;
    }
    Ok(())
}

fn draw_age_group_line(root: &Area, title: &str, groups: &[AgeGroupFare]) -> DrawResult {
    let top = groups
        .iter()
        .filter_map(|g| g.mean_fare)
        .fold(0.0f64, f64::max)
        .max(1.0);
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..groups.len() as u32).into_segmented(), 0f64..top * 1.1)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(groups.len() + 1)
        .x_label_style((FONT, 11))
        .x_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|l| l.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Возрастная группа")
        .y_desc("Средняя стоимость билета")
        .draw()?;

    // Empty groups break the line.
    let mut runs: Vec<Vec<(SegmentValue<u32>, f64)>> = vec![Vec::new()];
    for (i, g) in groups.iter().enumerate() {
        match g.mean_fare {
            Some(v) => {
                if let Some(run) = runs.last_mut() {
                    run.push((SegmentValue::CenterOf(i as u32), v));
                }
            }
            None => runs.push(Vec::new()),
        }
    }
    for run in runs.iter().filter(|r| !r.is_empty()) {
        chart.draw_series(LineSeries::new(run.iter().cloned(), BLUE.stroke_width(2)))?;
        chart.draw_series(run.iter().map(|p| Circle::new(p.clone(), 4, BLUE.filled())))?;
    }
    Ok(())
}

/// Diverging blue-white-red scale over `[-1, 1]`.
pub fn coolwarm(value: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 { (MID, COLD, -v) } else { (MID, WARM, v) };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

fn draw_heatmap(root: &Area, title: &str, matrix: &CorrelationMatrix) -> DrawResult {
    let area = root.titled(title, (FONT, 20).into_font())?;
    let (w, h) = area.dim_in_pixel();
    let n = CORRELATION_FIELDS.len() as i32;
    let (left, top, bottom, right) = (70, 10, 35, 90);
    let cell = ((w as i32 - left - right).min(h as i32 - top - bottom) / n).max(1);
    let grid = cell * n;

    for i in 0..n {
        for j in 0..n {
            let x0 = left + j * cell;
            let y0 = top + i * cell;
            let value = matrix.get(i as usize, j as usize);
            let fill = value.map_or(RGBColor(200, 200, 200), coolwarm);
            area.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], fill.filled()))?;
            let text = value.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"));
            let ink = if value.is_some_and(|v| v.abs() > 0.6) { WHITE } else { BLACK };
            let style = (FONT, 14.0)
                .into_font()
                .color(&ink)
                .pos(Pos::new(HPos::Center, VPos::Center));
            area.draw(&Text::new(text, (x0 + cell / 2, y0 + cell / 2), style))?;
        }
    }

    let row_style = (FONT, 13.0)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for (k, field) in CORRELATION_FIELDS.iter().enumerate() {
        let offset = k as i32 * cell + cell / 2;
        area.draw(&Text::new(*field, (left - 8, top + offset), row_style.clone()))?;
        area.draw(&Text::new(*field, (left + offset, top + grid + 15), centered(13.0)))?;
    }

    // Color bar from -1 at the bottom to 1 at the top.
    let bar_x = left + grid + 20;
    let steps = 100;
    for s in 0..steps {
        let v = -1.0 + 2.0 * (s as f64 + 0.5) / steps as f64;
        let y1 = top + grid - grid * s / steps;
        let y0 = top + grid - grid * (s + 1) / steps;
        area.draw(&Rectangle::new([(bar_x, y0), (bar_x + 18, y1)], coolwarm(v).filled()))?;
    }
    let tick_style = (FONT, 12.0)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for tick in [-1.0f64, -0.5, 0.0, 0.5, 1.0] {
        let y = top + grid - ((tick + 1.0) / 2.0 * grid as f64).round() as i32;
        area.draw(&Text::new(format!("{tick:.1}"), (bar_x + 24, y), tick_style.clone()))?;
    }
    Ok(())
}

fn draw_densities(root: &Area, title: &str, curves: &[(String, Vec<[f64; 2]>)]) -> DrawResult {
    let points = move || curves.iter().flat_map(|(_, c)| c.iter());
    let lo = points().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let hi = points().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
    let top = points().map(|p| p[1]).fold(0.0f64, f64::max);
    let top = if top > 0.0 { top * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..top)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("fare")
        .y_desc("Density")
        .y_label_formatter(&|v: &f64| format!("{v:.3}"))
        .draw()?;

    for (idx, (label, curve)) in curves.iter().enumerate() {
        let color = series_color(idx);
        chart
            .draw_series(
                AreaSeries::new(curve.iter().map(|p| (p[0], p[1])), 0.0, color.mix(0.35))
                    .border_style(color),
            )?
            .label(label.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.mix(0.6).filled())
            });
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_boxplot(root: &Area, title: &str, boxes: &[(String, BoxStats)]) -> DrawResult {
    let low = boxes
        .iter()
        .flat_map(|(_, b)| b.outliers.iter().copied().chain([b.whisker_low]))
        .fold(f64::INFINITY, f64::min);
    let high = boxes
        .iter()
        .flat_map(|(_, b)| b.outliers.iter().copied().chain([b.whisker_high]))
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = ((high - low) * 0.05).max(0.5);
    let labels: Vec<&str> = boxes.iter().map(|(l, _)| l.as_str()).collect();
    let n = boxes.len() as u32;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..n).into_segmented(), (low - pad)..(high + pad))?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(boxes.len() + 1)
        .x_label_style((FONT, 11))
        .x_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|l| l.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Класс")
        .y_desc("Стоимость билета")
        .draw()?;

    let (plot_w, _) = chart.plotting_area().dim_in_pixel();
    let half = ((plot_w as f64 / n as f64) * 0.3) as i32;
    for (idx, (_, b)) in boxes.iter().enumerate() {
        let color = series_color(idx);
        let px = |y: f64| chart.backend_coord(&(SegmentValue::CenterOf(idx as u32), y));
        let (cx, y_q1) = px(b.q1);
        let (_, y_q3) = px(b.q3);
        let (_, y_med) = px(b.median);
        let (_, y_low) = px(b.whisker_low);
        let (_, y_high) = px(b.whisker_high);

        for (from, to) in [(y_q1, y_low), (y_q3, y_high)] {
            root.draw(&PathElement::new(vec![(cx, from), (cx, to)], BLACK.stroke_width(1)))?;
            root.draw(&PathElement::new(
                vec![(cx - half / 2, to), (cx + half / 2, to)],
                BLACK.stroke_width(1),
            ))?;
        }
        root.draw(&Rectangle::new([(cx - half, y_q3), (cx + half, y_q1)], color.mix(0.8).filled()))?;
        root.draw(&Rectangle::new([(cx - half, y_q3), (cx + half, y_q1)], BLACK.stroke_width(1)))?;
        root.draw(&PathElement::new(
            vec![(cx - half, y_med), (cx + half, y_med)],
            BLACK.stroke_width(2),
        ))?;
        for o in &b.outliers {
            let (_, y) = px(*o);
            root.draw(&Circle::new((cx, y), 3, BLACK.stroke_width(1)))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::{raw, sample_set};

    fn single_class_set() -> PassengerSet {
        PassengerSet::prepare(vec![
            raw("Third", Some(20.0), Some(7.25), 0),
            raw("Third", Some(31.0), Some(8.05), 0),
        ])
    }

    #[test]
    fn layouts_select_charts_and_controls() {
        assert_eq!(ChartLayout::SixGrid.charts().len(), 6);
        assert_eq!(ChartLayout::SixGrid.columns(), 3);
        assert_eq!(ChartLayout::SixGrid.control(), LaunchControl::Dropdown);
        assert_eq!(
            ChartLayout::TwoGrid.charts(),
            &[StaticChart::AgeHistogram, StaticChart::SurvivalPie]
        );
        assert_eq!(
            ChartLayout::TwoGrid.control(),
            LaunchControl::Button(InteractiveChart::Scatter)
        );
        assert_eq!(ChartLayout::default(), ChartLayout::SixGrid);
        assert_eq!(ChartLayout::SixGrid.label(), "Шесть графиков");
        assert_eq!(ChartLayout::TwoGrid.label(), "Два графика");
    }

    #[test]
    fn every_chart_builds_for_zero_one_and_many_classes() {
        for set in [PassengerSet::default(), single_class_set(), sample_set()] {
            for chart in ALL_STATIC_CHARTS {
                let data = chart.build(&set);
                if set.is_empty() && chart != StaticChart::CorrelationHeatmap {
                    assert_eq!(data.series_count(), 0, "{chart:?}");
                }
            }
        }
    }

    #[test]
    fn every_chart_renders_for_zero_one_and_many_classes() {
        let (w, h) = CHART_SIZE;
        for set in [PassengerSet::default(), single_class_set(), sample_set()] {
            for chart in ALL_STATIC_CHARTS {
                let rendered = render_chart(chart, &set)
                    .unwrap_or_else(|e| panic!("{chart:?} over {} records: {e}", set.len()));
                assert_eq!(rendered.size, [w as usize, h as usize]);
                assert_eq!(rendered.rgb.len(), (w * h * 3) as usize);
                // Something besides the white background was drawn.
                assert!(rendered.rgb.iter().any(|b| *b != 255), "{chart:?}");
            }
        }
    }

    #[test]
    fn histogram_example_has_two_series() {
        match StaticChart::AgeHistogram.build(&sample_set()) {
            ChartData::AgeHistogram(series) => assert_eq!(series.len(), 2),
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn single_class_yields_single_series() {
        let set = single_class_set();
        assert_eq!(StaticChart::AgeHistogram.build(&set).series_count(), 1);
        assert_eq!(StaticChart::FareBoxplot.build(&set).series_count(), 1);
        assert_eq!(StaticChart::SurvivalPie.build(&set).series_count(), 1);
    }

    #[test]
    fn coolwarm_is_centered_at_zero() {
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(5.0), coolwarm(1.0));
    }

    #[test]
    fn file_stems_are_unique() {
        let mut stems: Vec<&str> = ALL_STATIC_CHARTS.iter().map(|c| c.file_stem()).collect();
        stems.sort();
        stems.dedup();
        assert_eq!(stems.len(), ALL_STATIC_CHARTS.len());
    }
}
