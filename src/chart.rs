// =============================================================================
// Chart Assembly — typed traces and a fixed three-panel layout
// =============================================================================
//
// The figure serialises to Plotly's JSON figure shape so the page can hand
// `data` and `layout` straight to the renderer, but nothing here depends on
// Plotly: traces are a closed set of typed variants.
//
// Panels (fractions of chart height, independent of the selection):
//   y  (price + Bollinger)   [0.50, 1.00]
//   y2 (volume)              [0.25, 0.50]
//   y3 (stochastic %K / %D)  [0.00, 0.25]
//
// Undefined indicator values serialise as `null`, which the renderer draws
// as a gap. Points are never dropped, so x and y always have equal length.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::error::DashboardError;
use crate::indicators::{
    bollinger_bands, stochastic_oscillator, volume_trace, IndicatorParams, Point,
};
use crate::types::{Indicator, IndicatorSet, Series};

const INCREASING_COLOR: &str = "#00CC94";
const DECREASING_COLOR: &str = "#F50030";
const BOLLINGER_GROUP: &str = "Bollinger Bands";
const STOCH_GROUP: &str = "Stochastic Oscillator";

// =============================================================================
// Traces
// =============================================================================

/// Which vertical panel a trace is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    #[serde(rename = "y")]
    Price,
    #[serde(rename = "y2")]
    Volume,
    #[serde(rename = "y3")]
    Oscillator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineColor {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleStyle {
    pub line: LineColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickTrace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub increasing: CandleStyle,
    pub decreasing: CandleStyle,
    pub yaxis: Axis,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<u64>,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<NaiveDate>,
    pub y: Vec<Option<f64>>,
    pub mode: &'static str,
    pub line: LineStyle,
    pub legendgroup: &'static str,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<LineColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<&'static str>,
    pub yaxis: Axis,
}

impl LineTrace {
    fn from_points(points: &[Point], legendgroup: &'static str, yaxis: Axis) -> Self {
        Self {
            name: None,
            x: points.iter().map(|p| p.date).collect(),
            y: points.iter().map(|p| p.value).collect(),
            mode: "lines",
            line: LineStyle { width: 1 },
            legendgroup,
            showlegend: false,
            marker: None,
            hoverinfo: None,
            yaxis,
        }
    }

    fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self.showlegend = true;
        self
    }

    fn colored(mut self, color: &'static str) -> Self {
        self.marker = Some(LineColor { color });
        self
    }

    fn without_hover(mut self) -> Self {
        self.hoverinfo = Some("none");
        self
    }
}

/// One drawable element of the figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick(CandlestickTrace),
    Bar(BarTrace),
    #[serde(rename = "scatter")]
    Line(LineTrace),
}

#[cfg(test)]
impl Trace {
    pub fn axis(&self) -> Axis {
        match self {
            Self::Candlestick(t) => t.yaxis,
            Self::Bar(t) => t.yaxis,
            Self::Line(t) => t.yaxis,
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct XAxis {
    pub rangeslider: RangeSlider,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub family: &'static str,
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub bgcolor: &'static str,
    pub bordercolor: &'static str,
    pub borderwidth: u32,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct YAxis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
    pub domain: [f64; 2],
    pub side: &'static str,
    pub showticklabels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: XAxis,
    pub legend: Legend,
    pub yaxis: YAxis,
    pub yaxis2: YAxis,
    pub yaxis3: YAxis,
}

impl Layout {
    /// Static three-panel layout; only the title depends on the request.
    pub fn for_ticker(ticker: &str) -> Self {
        Self {
            title: format!("Chart for {ticker}"),
            xaxis: XAxis {
                rangeslider: RangeSlider { visible: false },
            },
            legend: Legend {
                x: 0.0,
                y: 1.0,
                bgcolor: "#E2E2E2",
                bordercolor: "#FFFFFF",
                borderwidth: 2,
                font: Font {
                    family: "sans-serif",
                    size: 8,
                    color: "#000",
                },
            },
            yaxis: YAxis {
                title: Some("Stock price"),
                domain: [0.5, 1.0],
                side: "left",
                showticklabels: true,
                showgrid: None,
            },
            yaxis2: YAxis {
                title: None,
                domain: [0.25, 0.5],
                side: "right",
                showticklabels: false,
                showgrid: Some(false),
            },
            yaxis3: YAxis {
                title: None,
                domain: [0.0, 0.25],
                side: "left",
                showticklabels: true,
                showgrid: None,
            },
        }
    }
}

// =============================================================================
// Figure
// =============================================================================

/// A selected indicator that could not produce a single defined value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub indicator: Indicator,
    pub required: usize,
    pub available: usize,
}

/// Traces, layout and any history shortfalls for one chart request.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub notices: Vec<Notice>,
}

/// Sessions needed before an indicator yields its first fully defined output.
pub fn required_history(indicator: Indicator, params: &IndicatorParams) -> usize {
    match indicator {
        Indicator::Volume => 0,
        Indicator::Bollinger => params.bollinger_window.max(2),
        Indicator::Stoch => params.stoch_k_window + params.stoch_d_window.saturating_sub(1),
    }
}

/// Assemble the figure for `series` with the selected overlays.
///
/// With `strict_history` a selected window indicator that lacks enough rows
/// fails the request; otherwise it is drawn as all-gap lines and reported in
/// `notices`.
pub fn assemble_chart(
    series: &Series,
    selection: &IndicatorSet,
    params: &IndicatorParams,
    strict_history: bool,
) -> Result<ChartData, DashboardError> {
    let mut notices = Vec::new();
    for indicator in [Indicator::Bollinger, Indicator::Stoch] {
        if !selection.contains(indicator) {
            continue;
        }
        let required = required_history(indicator, params);
        if series.len() < required {
            if strict_history {
                return Err(DashboardError::InsufficientHistory {
                    indicator,
                    required,
                    available: series.len(),
                });
            }
            warn!(
                ticker = %series.ticker,
                %indicator,
                required,
                available = series.len(),
                "insufficient history for indicator"
            );
            notices.push(Notice {
                indicator,
                required,
                available: series.len(),
            });
        }
    }

    let dates = series.dates();
    let rows = series.rows();
    let mut data = vec![Trace::Candlestick(CandlestickTrace {
        name: series.ticker.clone(),
        x: dates.clone(),
        open: rows.iter().map(|r| r.open).collect(),
        high: series.highs(),
        low: series.lows(),
        close: series.closes(),
        increasing: CandleStyle {
            line: LineColor {
                color: INCREASING_COLOR,
            },
        },
        decreasing: CandleStyle {
            line: LineColor {
                color: DECREASING_COLOR,
            },
        },
        yaxis: Axis::Price,
        showlegend: false,
    })];

    if selection.contains(Indicator::Volume) {
        let volume = volume_trace(series);
        data.push(Trace::Bar(BarTrace {
            name: Indicator::Volume.label().to_string(),
            x: volume.iter().map(|v| v.date).collect(),
            y: volume.iter().map(|v| v.volume).collect(),
            yaxis: Axis::Volume,
        }));
    }

    if selection.contains(Indicator::Bollinger) {
        let bb = bollinger_bands(series, params.bollinger_window, params.bollinger_num_std);
        data.push(Trace::Line(
            LineTrace::from_points(&bb.upper, BOLLINGER_GROUP, Axis::Price)
                .named(Indicator::Bollinger.label())
                .colored("green")
                .without_hover(),
        ));
        data.push(Trace::Line(
            LineTrace::from_points(&bb.lower, BOLLINGER_GROUP, Axis::Price)
                .colored("green")
                .without_hover(),
        ));
        data.push(Trace::Line(
            LineTrace::from_points(&bb.middle, BOLLINGER_GROUP, Axis::Price)
                .colored("yellow")
                .without_hover(),
        ));
    }

    if selection.contains(Indicator::Stoch) {
        let st = stochastic_oscillator(series, params.stoch_k_window, params.stoch_d_window);
        data.push(Trace::Line(
            LineTrace::from_points(&st.percent_k, STOCH_GROUP, Axis::Oscillator)
                .named(Indicator::Stoch.label()),
        ));
        data.push(Trace::Line(LineTrace::from_points(
            &st.percent_d,
            STOCH_GROUP,
            Axis::Oscillator,
        )));
    }

    Ok(ChartData {
        data,
        layout: Layout::for_ticker(&series.ticker),
        notices,
    })
}
