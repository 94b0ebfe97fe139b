//! Filters summary tables down to a neighborhood selection and packages the
//! result as Plotly figure JSON.
//!
//! Everything here is a pure function of `(selection, table, palette)`; the
//! browser does the drawing.

use crate::aggregate::{MonthlyRow, RaceRow, SummaryTable, TimeOfDayRow};
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BACKGROUND: &str = "#F4F4F8";
const MOVING_AVERAGE_LINE_WIDTH: u32 = 4;

/// The three charts on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Monthly,
    Race,
    TimeOfDay,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Monthly, ChartKind::Race, ChartKind::TimeOfDay];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Monthly => "monthly",
            ChartKind::Race => "race",
            ChartKind::TimeOfDay => "time-of-day",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Monthly => "Total Stop and Frisk by Month within Neighborhood",
            ChartKind::Race => "Total Stop and Frisk by Race/Ethnicity within Neighborhood",
            ChartKind::TimeOfDay => "Total Stop and Frisk by Hour within Neighborhood",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown chart '{}'", s))
    }
}

/// Plotly figure: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceType {
    Scatter,
    Bar,
}

/// An x-axis value: a category label or an hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Label(String),
    Hour(u32),
}

/// One series on a chart. Missing y values serialise as `null`, which
/// Plotly draws as a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    pub name: String,
    pub x: Vec<AxisValue>,
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    pub marker: Marker,
}

impl Trace {
    fn new(trace_type: TraceType, name: &str, color: &str) -> Self {
        Trace {
            trace_type,
            name: name.to_string(),
            x: Vec::new(),
            y: Vec::new(),
            mode: None,
            line: None,
            marker: Marker {
                color: color.to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<AxisLayout>,
}

impl Layout {
    fn for_chart(kind: ChartKind) -> Self {
        Layout {
            title: kind.title().to_string(),
            paper_bgcolor: BACKGROUND,
            plot_bgcolor: BACKGROUND,
            showlegend: false,
            yaxis: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisLayout {
    pub tickformat: &'static str,
}

/// Monthly counts as markers plus the moving average as a thick line, two
/// traces per selected neighborhood.
///
/// The average trace leaves `mode` unset so Plotly picks it from the point
/// count: lines with markers for short series, plain lines otherwise.
pub fn monthly_figure<S: AsRef<str>>(
    selection: &[S],
    table: &SummaryTable<MonthlyRow>,
    palette: &Palette,
) -> Figure {
    let mut data = Vec::with_capacity(selection.len() * 2);

    for picked in table.select(selection) {
        let color = palette.color_for(picked.neighborhood);

        let mut counts = Trace::new(TraceType::Scatter, picked.neighborhood, color);
        counts.mode = Some("markers");
        let mut average = Trace::new(TraceType::Scatter, picked.neighborhood, color);
        average.line = Some(Line {
            width: MOVING_AVERAGE_LINE_WIDTH,
        });

        for row in picked.rows {
            let month = AxisValue::Label(row.year_month.to_string());
            counts.x.push(month.clone());
            counts.y.push(Some(row.count as f64));
            average.x.push(month);
            average.y.push(row.moving_average);
        }

        data.push(counts);
        data.push(average);
    }

    Figure {
        data,
        layout: Layout::for_chart(ChartKind::Monthly),
    }
}

/// Incident counts by race/ethnicity, one bar trace per neighborhood.
pub fn race_figure<S: AsRef<str>>(
    selection: &[S],
    table: &SummaryTable<RaceRow>,
    palette: &Palette,
) -> Figure {
    let data = table
        .select(selection)
        .into_iter()
        .map(|picked| {
            let color = palette.color_for(picked.neighborhood);
            let mut trace = Trace::new(TraceType::Bar, picked.neighborhood, color);
            for row in picked.rows {
                trace.x.push(AxisValue::Label(row.race.label().to_string()));
                trace.y.push(Some(row.count as f64));
            }
            trace
        })
        .collect();

    Figure {
        data,
        layout: Layout::for_chart(ChartKind::Race),
    }
}

/// Share of incidents per hour of day, one bar trace per neighborhood, with
/// the y axis formatted as a percentage.
pub fn time_of_day_figure<S: AsRef<str>>(
    selection: &[S],
    table: &SummaryTable<TimeOfDayRow>,
    palette: &Palette,
) -> Figure {
    let data = table
        .select(selection)
        .into_iter()
        .map(|picked| {
            let color = palette.color_for(picked.neighborhood);
            let mut trace = Trace::new(TraceType::Bar, picked.neighborhood, color);
            for row in picked.rows {
                trace.x.push(AxisValue::Hour(row.hour));
                trace.y.push(Some(row.fraction));
            }
            trace
        })
        .collect();

    let mut layout = Layout::for_chart(ChartKind::TimeOfDay);
    layout.yaxis = Some(AxisLayout { tickformat: ".0%" });

    Figure { data, layout }
}
