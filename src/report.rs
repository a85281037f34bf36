use crate::analysis::{Passenger, PassengerSet};
use plotly::color::NamedColor;
use plotly::common::{Marker, Mode};
use plotly::layout::{Axis, LayoutScene, Legend};
use plotly::{Layout, Pie, Plot, Scatter, Scatter3D};
use serde::{Deserialize, Serialize};

/// Largest marker diameter in the scatter chart, in pixels.
const MAX_MARKER_SIZE: f64 = 20.0;

const AGE_LABEL: &str = "Возраст";
const FARE_LABEL: &str = "Стоимость билета";

/// Interactive charts that can be opened in the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractiveChart {
    #[serde(rename = "scatter")]
    Scatter,
    #[serde(rename = "pie")]
    Pie,
    #[serde(rename = "3d_scatter")]
    Scatter3d,
}

pub const ALL_INTERACTIVE_CHARTS: [InteractiveChart; 3] = [
    InteractiveChart::Scatter,
    InteractiveChart::Pie,
    InteractiveChart::Scatter3d,
];

/// Builds the plot for one interactive chart.
pub type PlotBuilder = fn(&PassengerSet) -> Plot;

impl InteractiveChart {
    /// Selection key, e.g. `3d_scatter`.
    pub fn key(self) -> &'static str {
        match self {
            InteractiveChart::Scatter => "scatter",
            InteractiveChart::Pie => "pie",
            InteractiveChart::Scatter3d => "3d_scatter",
        }
    }

    /// Text shown in the chart dropdown.
    pub fn label(self) -> &'static str {
        match self {
            InteractiveChart::Scatter => "Scatter Plot",
            InteractiveChart::Pie => "Pie Chart",
            InteractiveChart::Scatter3d => "3D Scatter Plot",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            InteractiveChart::Scatter => "Интерактивный график: Возраст vs. Стоимость билета",
            InteractiveChart::Pie => "Распределение пассажиров по полу",
            InteractiveChart::Scatter3d => "Трехмерный график: Возраст, Стоимость билета и Класс",
        }
    }

    pub fn builder(self) -> PlotBuilder {
        match self {
            InteractiveChart::Scatter => scatter_plot,
            InteractiveChart::Pie => pie_plot,
            InteractiveChart::Scatter3d => scatter_3d_plot,
        }
    }

    pub fn build(self, set: &PassengerSet) -> Plot {
        (self.builder())(set)
    }
}

fn class_rows<'a>(set: &'a PassengerSet, class: &str) -> Vec<&'a Passenger> {
    set.records().iter().filter(|r| r.class == class).collect()
}

/// Marker diameters whose area is proportional to the fare.
fn marker_sizes(rows: &[&Passenger], max_fare: f64) -> Vec<usize> {
    rows.iter()
        .map(|r| {
            let size = if max_fare > 0.0 {
                ((r.fare.max(0.0) / max_fare).sqrt() * MAX_MARKER_SIZE).round() as usize
            } else {
                0
            };
            size.max(1)
        })
        .collect()
}

fn scatter_plot(set: &PassengerSet) -> Plot {
    let max_fare = set.records().iter().map(|r| r.fare).fold(0.0f64, f64::max);
    let mut plot = Plot::new();
    for class in set.class_groups() {
        let rows = class_rows(set, &class);
        let hover: Vec<String> = rows
            .iter()
            .map(|r| {
                format!(
                    "sex={}<br>embark_town={}",
                    r.sex,
                    r.embark_town.as_deref().unwrap_or("")
                )
            })
            .collect();
        let trace = Scatter::new(
            rows.iter().map(|r| r.age).collect::<Vec<f64>>(),
            rows.iter().map(|r| r.fare).collect::<Vec<f64>>(),
        )
        .name(&class)
        .legend_group(&class)
        .mode(Mode::Markers)
        .marker(Marker::new().size_array(marker_sizes(&rows, max_fare)))
        .hover_text_array(hover)
        .hover_template(&format!(
            "class={class}<br>{AGE_LABEL}=%{{x}}<br>{FARE_LABEL}=%{{y}}<br>%{{hovertext}}<extra></extra>"
        ));
        plot.add_trace(trace);
    }
    plot.set_layout(
        Layout::new()
            .title(InteractiveChart::Scatter.title())
            .x_axis(Axis::new().title(AGE_LABEL))
            .y_axis(Axis::new().title(FARE_LABEL))
            .legend(Legend::new().title("class")),
    );
    plot
}

fn pie_plot(set: &PassengerSet) -> Plot {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for r in set.records() {
        match counts.iter_mut().find(|(s, _)| *s == r.sex) {
            Some((_, c)) => *c += 1,
            None => counts.push((r.sex.clone(), 1)),
        }
    }
    let (labels, values): (Vec<String>, Vec<usize>) = counts.into_iter().unzip();
    let mut plot = Plot::new();
    if !values.is_empty() {
        let trace = Pie::new(values)
            .labels(labels.iter().map(String::as_str).collect())
            .marker(Marker::new().color_array(vec![NamedColor::Blue, NamedColor::Pink]))
            .hover_template("sex=%{label}<br>count=%{value}<extra></extra>");
        plot.add_trace(trace);
    }
    plot.set_layout(Layout::new().title(InteractiveChart::Pie.title()));
    plot
}

fn scatter_3d_plot(set: &PassengerSet) -> Plot {
    let mut plot = Plot::new();
    for class in set.class_groups() {
        let rows = class_rows(set, &class);
        let trace = Scatter3D::new(
            rows.iter().map(|r| r.age).collect::<Vec<f64>>(),
            rows.iter().map(|r| r.fare).collect::<Vec<f64>>(),
            rows.iter().map(|r| r.pclass).collect::<Vec<u8>>(),
        )
        .name(&class)
        .mode(Mode::Markers)
        .hover_template(&format!(
            "class={class}<br>age=%{{x}}<br>fare=%{{y}}<br>pclass=%{{z}}<extra></extra>"
        ));
        plot.add_trace(trace);
    }
    plot.set_layout(
        Layout::new()
            .title(InteractiveChart::Scatter3d.title())
            .scene(
                LayoutScene::new()
                    .x_axis(Axis::new().title("age"))
                    .y_axis(Axis::new().title("fare"))
                    .z_axis(Axis::new().title("pclass")),
            )
            .legend(Legend::new().title("class")),
    );
    plot
}

/// Standalone HTML document for `chart` with plotly.js inlined.
pub fn render_document(chart: InteractiveChart, set: &PassengerSet) -> String {
    chart.build(set).to_html()
}
